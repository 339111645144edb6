use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment switch selecting the provider.
pub const PROVIDER_VAR: &str = "LLM_PROVIDER";

/// The two supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    #[default]
    Groq,
    OpenAi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Groq, ProviderKind::OpenAi];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Variable holding the provider's credential.
    pub fn credential_var(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Variable overriding the provider's default model.
    pub fn model_var(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_MODEL",
            ProviderKind::OpenAi => "OPENAI_MODEL",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "mixtral-8x7b-32768",
            ProviderKind::OpenAi => "gpt-3.5-turbo",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provider names other than the two supported ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown LLM provider '{0}' (expected 'groq' or 'openai')")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Everything the gateway needs to reach the selected provider.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Chat-completions endpoint
    pub completions_url: String,
    /// Model-listing endpoint, used for health checks
    pub models_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl ProviderSettings {
    pub fn credential_var(&self) -> &'static str {
        self.kind.credential_var()
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("completions_url", &self.completions_url)
            .field("models_url", &self.models_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-provider overrides from the registry file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProviderOverride {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Errors raised while resolving provider settings
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    UnknownProvider(#[from] UnknownProvider),
    #[error("failed to read provider registry {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid provider registry YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// File-based provider registry
///
/// Built-in defaults for both providers can be overridden per provider by a
/// YAML file shaped like:
///
/// ```yaml
/// groq:
///   base_url: http://localhost:8080/v1
///   model: llama3-70b-8192
/// ```
///
/// Model precedence is environment variable, then file, then built-in default.
#[derive(Clone)]
pub struct FileProviderRegistry {
    registry_path: PathBuf,
}

impl FileProviderRegistry {
    /// Creates a new FileProviderRegistry
    ///
    /// # Arguments
    /// * `registry_path` - Optional path to registry file (defaults to "providers.yml")
    pub fn new(registry_path: Option<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.unwrap_or_else(|| PathBuf::from("providers.yml")),
        }
    }

    /// Loads the overrides from the file. A missing file means no overrides.
    fn load_registry(&self) -> Result<HashMap<ProviderKind, ProviderOverride>, RegistryError> {
        if !self.registry_path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.registry_path).map_err(|e| RegistryError::Read {
            path: self.registry_path.display().to_string(),
            source: e,
        })?;

        parse_registry(&content)
    }

    /// Resolves the provider selected by `LLM_PROVIDER` from the process environment.
    pub fn from_env(&self) -> Result<ProviderSettings, RegistryError> {
        self.resolve(|name| std::env::var(name).ok())
    }

    /// Resolves provider settings against an arbitrary variable lookup.
    pub fn resolve<F>(&self, lookup: F) -> Result<ProviderSettings, RegistryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = self.load_registry()?;
        settings_for(&overrides, lookup)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn settings_for<F>(
    overrides: &HashMap<ProviderKind, ProviderOverride>,
    lookup: F,
) -> Result<ProviderSettings, RegistryError>
where
    F: Fn(&str) -> Option<String>,
{
    let kind = match non_blank(lookup(PROVIDER_VAR)) {
        Some(name) => name.parse::<ProviderKind>()?,
        None => ProviderKind::default(),
    };
    let file = overrides.get(&kind).cloned().unwrap_or_default();

    let base_url = non_blank(file.base_url)
        .unwrap_or_else(|| kind.default_base_url().to_string());
    let base_url = base_url.trim_end_matches('/');

    let model = non_blank(lookup(kind.model_var()))
        .or_else(|| non_blank(file.model))
        .unwrap_or_else(|| kind.default_model().to_string());

    Ok(ProviderSettings {
        kind,
        completions_url: format!("{}/chat/completions", base_url),
        models_url: format!("{}/models", base_url),
        model,
        api_key: non_blank(lookup(kind.credential_var())),
    })
}

/// Parses the YAML registry file. Unknown provider names are ignored.
fn parse_registry(
    yaml_content: &str,
) -> Result<HashMap<ProviderKind, ProviderOverride>, RegistryError> {
    if yaml_content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let raw: HashMap<String, ProviderOverride> = serde_yaml::from_str(yaml_content)?;
    let mut registry = HashMap::new();

    for (name, entry) in raw {
        match name.parse::<ProviderKind>() {
            Ok(kind) => {
                registry.insert(kind, entry);
            }
            Err(e) => tracing::warn!(error = %e, "ignoring provider registry entry"),
        }
    }

    Ok(registry)
}
