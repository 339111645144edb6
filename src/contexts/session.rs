use crate::contexts::exporter::{self, ExportFormat};
use crate::contexts::generation::{GenerateError, generate};
use crate::contexts::history_store::HistoryStore;
use crate::contexts::llm_gateway::LlmGateway;
use crate::data::{GenerationRequest, GenerationResult, SpecDraft, SpecRecord, Storage};

/// Application state owned by the front end: the history plus the spec
/// currently being viewed or edited.
///
/// Edits go to the in-memory record only; [`save`](Self::save) writes them back.
pub struct SpecSession<S: Storage> {
    history: HistoryStore<S>,
    current: Option<SpecRecord>,
}

impl<S: Storage> SpecSession<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            history,
            current: None,
        }
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Generates a spec, persists it and makes it current.
    pub async fn generate(
        &mut self,
        gateway: &LlmGateway,
        request: GenerationRequest,
    ) -> Result<&SpecRecord, GenerateError> {
        let data = generate(gateway, &request).await?;
        Ok(self.adopt(SpecDraft::new(request, data)))
    }

    /// Persists a draft and makes the stored record current.
    pub fn adopt(&mut self, draft: SpecDraft) -> &SpecRecord {
        let (record, _) = self.history.save_record(draft);
        self.current.insert(record)
    }

    /// Loads a stored record as the current spec.
    pub fn open(&mut self, id: i64) -> Option<&SpecRecord> {
        let record = self.history.get(id)?;
        Some(&*self.current.insert(record))
    }

    pub fn current(&self) -> Option<&SpecRecord> {
        self.current.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut GenerationResult> {
        self.current.as_mut().map(SpecRecord::data_mut)
    }

    /// Writes the current record back to the history.
    pub fn save(&mut self) -> Option<Vec<SpecRecord>> {
        let record = self.current.as_ref()?.clone();
        let specs = self.history.update(record);
        if let Some(stored) = self
            .current
            .as_ref()
            .and_then(|current| specs.iter().find(|spec| spec.id == current.id))
        {
            self.current = Some(stored.clone());
        }
        Some(specs)
    }

    pub fn export(&self, format: ExportFormat) -> Option<String> {
        self.current
            .as_ref()
            .map(|record| exporter::export(record, format))
    }

    pub fn close(&mut self) -> Option<SpecRecord> {
        self.current.take()
    }
}
