use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use clap::Subcommand;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod summary;

use taskgen::contexts::exporter::{self, ExportFormat};
use taskgen::contexts::health;
use taskgen::contexts::{
    Direction, EditableCollection, EntryDraft, EntryField, EntryInput, FileStorage, GroupFilter,
    HealthPoller, HistoryStore, LlmGateway, SpecSession,
};
use taskgen::data::{GenerationRequest, KNOWN_TEMPLATES, SpecRecord};
use taskgen::registries::FileProviderRegistry;
use taskgen::server::{self, AppState};

#[derive(Clone)]
pub struct Config {
    pub verbose: bool,
    pub data_dir: Option<PathBuf>,
    pub providers: Option<PathBuf>,
}

impl Config {
    fn history(&self) -> HistoryStore<FileStorage> {
        HistoryStore::new(FileStorage::new(self.data_dir.clone()))
    }

    fn session(&self) -> SpecSession<FileStorage> {
        SpecSession::new(self.history())
    }

    fn gateway(&self) -> Result<LlmGateway> {
        let settings = FileProviderRegistry::new(self.providers.clone())
            .from_env()
            .context("Failed to resolve LLM provider settings")?;
        if self.verbose {
            println!("Using {} ({})", settings.kind, settings.model);
        }
        Ok(LlmGateway::new(settings))
    }
}

/// A change to one entry of a stored spec.
#[derive(Subcommand)]
pub enum EditAction {
    #[command(about = "Replace one field of an entry")]
    Set {
        collection: EditableCollection,
        entry_id: String,
        field: EntryField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    #[command(about = "Remove an entry")]
    Remove {
        collection: EditableCollection,
        entry_id: String,
    },

    #[command(about = "Swap an entry with its neighbour")]
    Move {
        collection: EditableCollection,
        index: usize,
        direction: Direction,
    },

    #[command(about = "Append a new entry")]
    Add {
        collection: EditableCollection,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        hours: Option<String>,
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },
}

pub async fn serve(addr: SocketAddr, config: &Config) -> Result<()> {
    let gateway = config.gateway()?;
    println!("Serving on http://{}", addr);
    server::start(addr, AppState::new(gateway)).await
}

pub async fn generate(request: GenerationRequest, config: &Config) -> Result<()> {
    // Fail on blank fields before touching provider configuration.
    request.validate()?;
    if let Some(template) = request.template() {
        if !KNOWN_TEMPLATES.iter().any(|(key, _)| *key == template) {
            tracing::warn!(template, "unrecognised project template, sending it as-is");
        }
    }
    let gateway = config.gateway()?;
    let mut session = config.session();

    println!("Generating tasks for: {}", request.goal.trim());
    match session.generate(&gateway, request).await {
        Ok(record) => {
            println!("✓ Saved spec {}", record.id);
            summary::print_record(record);
            Ok(())
        }
        Err(e) => Err(anyhow!("{} (status {})", e.user_message(), e.status())),
    }
}

pub fn history_list(config: &Config) -> Result<()> {
    let history = config.history();
    summary::print_history(&history.list(), history.capacity());
    Ok(())
}

fn find_record(history: &HistoryStore<FileStorage>, id: i64) -> Result<SpecRecord> {
    history
        .get(id)
        .with_context(|| format!("No saved spec with id {}", id))
}

pub fn history_show(id: i64, config: &Config) -> Result<()> {
    let record = find_record(&config.history(), id)?;
    summary::print_record(&record);
    Ok(())
}

pub fn history_delete(id: i64, config: &Config) -> Result<()> {
    let history = config.history();
    find_record(&history, id)?;

    let remaining = history.delete(id);
    if remaining.iter().any(|spec| spec.id == id) {
        bail!("Failed to delete spec {}; see the log for details", id);
    }
    println!("✓ Deleted spec {} ({} remaining)", id, remaining.len());
    Ok(())
}

pub fn edit(id: i64, action: EditAction, config: &Config) -> Result<()> {
    let mut session = config.session();
    if session.open(id).is_none() {
        bail!("No saved spec with id {}", id);
    }
    let data = session
        .data_mut()
        .context("Spec was not opened for editing")?;

    match action {
        EditAction::Set {
            collection,
            entry_id,
            field,
            value,
        } => {
            if !data.edit_field(collection, &entry_id, field, &value)? {
                bail!("No entry {} in {}", entry_id, collection);
            }
            println!("✓ Updated {} of {}", field, entry_id);
        }
        EditAction::Remove {
            collection,
            entry_id,
        } => {
            if !data.delete_entry(collection, &entry_id) {
                bail!("No entry {} in {}", entry_id, collection);
            }
            println!("✓ Removed {}", entry_id);
        }
        EditAction::Move {
            collection,
            index,
            direction,
        } => {
            if !data.reorder(collection, index, direction) {
                println!(
                    "Nothing to move: entry {} is already at the edge of {}",
                    index, collection
                );
                return Ok(());
            }
            println!("✓ Moved entry {} {:?}", index, direction);
        }
        EditAction::Add {
            collection,
            title,
            description,
            priority,
            group,
            hours,
            depends_on,
        } => {
            let draft = EntryDraft::parse(
                collection,
                EntryInput {
                    title: &title,
                    description: &description,
                    priority: priority.as_deref(),
                    group: group.as_deref(),
                    estimated_hours: hours.as_deref(),
                    dependencies: &depends_on,
                },
            )?;
            let entry_id = data.append(collection, draft);
            println!("✓ Added {}", entry_id);
        }
    }

    let edited = session.current().map(|record| record.data().clone());
    let saved = session.save().context("No spec open to save")?;
    let stored = saved.iter().find(|spec| spec.id == id).map(|spec| spec.data());
    if stored != edited.as_ref() {
        bail!("Failed to save spec {}; see the log for details", id);
    }
    Ok(())
}

pub fn groups(id: i64, config: &Config) -> Result<()> {
    let record = find_record(&config.history(), id)?;
    let groups = record.data().groups();
    if groups.is_empty() {
        println!("No groups in spec {}", id);
    } else {
        for group in groups {
            println!("{}", group);
        }
    }
    Ok(())
}

pub fn filter(id: i64, collection: EditableCollection, group: &str, config: &Config) -> Result<()> {
    let record = find_record(&config.history(), id)?;
    let entries = record
        .data()
        .filter_by_group(collection, &GroupFilter::parse(group));
    summary::print_entries(&entries);
    Ok(())
}

pub fn export(
    id: i64,
    format: ExportFormat,
    out: Option<PathBuf>,
    stdout: bool,
    config: &Config,
) -> Result<()> {
    let record = find_record(&config.history(), id)?;
    let content = exporter::export(&record, format);

    if stdout {
        print!("{}", content);
        return Ok(());
    }

    let dir = out.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(exporter::export_file_name(format, Utc::now()));
    fs::write(&path, content)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    println!("✓ Exported spec {} to {}", id, path.display());
    Ok(())
}

pub async fn status(watch: bool, interval: u64, config: &Config) -> Result<()> {
    let gateway = config.gateway()?;

    if !watch {
        summary::print_report(&health::check(&gateway).await);
        return Ok(());
    }

    let poller = HealthPoller::for_gateway(Arc::new(gateway), Duration::from_secs(interval));
    let mut updates = poller.subscribe();
    println!("Polling every {}s, Ctrl-C to stop", interval);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(report) = updates.borrow_and_update().clone() {
                    summary::print_report(&report);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.cancel();
    Ok(())
}
