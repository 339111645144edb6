mod provider_registry;

pub use provider_registry::{
    FileProviderRegistry, PROVIDER_VAR, ProviderKind, ProviderOverride, ProviderSettings,
    RegistryError, UnknownProvider,
};
