pub mod exporter;
mod file_storage;
pub mod generation;
pub mod health;
pub mod history_store;
pub mod llm_gateway;
pub mod prompt_builder;
pub mod sanitizer;
mod session;
pub mod spec_editor;

pub use exporter::ExportFormat;
pub use file_storage::FileStorage;
pub use generation::{GenerateError, generate};
pub use health::{HealthPoller, HealthReport};
pub use history_store::HistoryStore;
pub use llm_gateway::{GatewayError, LlmGateway, LlmStatus};
pub use sanitizer::MalformedResponseError;
pub use session::SpecSession;
pub use spec_editor::{
    Direction, EditError, EditableCollection, Entry, EntryDraft, EntryField, EntryInput,
    GroupFilter,
};
