mod spec;
mod storage;

pub use spec::{
    EngineeringTask, GenerationRequest, GenerationResult, KNOWN_TEMPLATES, Priority, Risk,
    Severity, SpecDraft, SpecRecord, UserStory, ValidationError,
};
pub use storage::{MemoryStorage, Storage, StorageError};
