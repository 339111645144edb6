//! Spec records and the generation result they carry.
//!
//! The generation result arrives from an untrusted model reply, so the
//! `from_json` constructors map loosely shaped JSON into typed entries,
//! defaulting each field rather than rejecting the whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Priority of a story or task, also used as the severity of a risk.
///
/// Anything the model sends outside of high/medium/low becomes
/// `Unspecified`, which renders as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    Unspecified,
}

pub type Severity = Priority;

impl Priority {
    /// Case-insensitive parse; unknown labels map to `Unspecified`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unspecified => "",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Priority::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineeringTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Risk {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub mitigation: String,
}

/// The three collections produced by one generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationResult {
    pub user_stories: Vec<UserStory>,
    pub engineering_tasks: Vec<EngineeringTask>,
    pub risks: Vec<Risk>,
}

impl GenerationResult {
    /// Maps a parsed model reply into typed collections.
    ///
    /// Returns `None` when the top-level value is not an object. Missing
    /// collections become empty and non-object entries are skipped.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        Some(Self {
            user_stories: entries(object.get("userStories"), "userStories", UserStory::from_json),
            engineering_tasks: entries(
                object.get("engineeringTasks"),
                "engineeringTasks",
                EngineeringTask::from_json,
            ),
            risks: entries(object.get("risks"), "risks", Risk::from_json),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.user_stories.is_empty() && self.engineering_tasks.is_empty() && self.risks.is_empty()
    }
}

impl UserStory {
    pub fn from_json(value: &Value) -> Self {
        Self {
            id: text(value, "id"),
            title: text(value, "title"),
            description: text(value, "description"),
            priority: level(value, "priority"),
            group: label(value, "group"),
        }
    }
}

impl EngineeringTask {
    pub fn from_json(value: &Value) -> Self {
        Self {
            id: text(value, "id"),
            title: text(value, "title"),
            description: text(value, "description"),
            priority: level(value, "priority"),
            group: label(value, "group"),
            estimated_hours: hours(value.get("estimatedHours")),
            dependencies: id_list(value.get("dependencies")),
        }
    }
}

impl Risk {
    pub fn from_json(value: &Value) -> Self {
        Self {
            id: text(value, "id"),
            title: text(value, "title"),
            description: text(value, "description"),
            severity: level(value, "severity"),
            mitigation: text(value, "mitigation"),
        }
    }
}

fn entries<T>(value: Option<&Value>, collection: &str, map: fn(&Value) -> T) -> Vec<T> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| {
            let keep = item.is_object();
            if !keep {
                tracing::warn!(
                    collection,
                    entry = %item,
                    "skipping non-object entry in model reply"
                );
            }
            keep
        })
        .map(map)
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(value: &Value, key: &str) -> String {
    value.get(key).and_then(scalar).unwrap_or_default()
}

fn label(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(scalar)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn level(value: &Value, key: &str) -> Priority {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(Priority::parse)
        .unwrap_or_default()
}

fn hours(value: Option<&Value>) -> Option<f64> {
    let hours = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (hours.is_finite() && hours >= 0.0).then_some(hours)
}

fn id_list(value: Option<&Value>) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(scalar)
    {
        let id = id.trim().to_string();
        if !id.is_empty() && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Missing required request fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// A feature description submitted for generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "nullable_text")]
    pub goal: String,
    #[serde(default, alias = "targetUsers", deserialize_with = "nullable_text")]
    pub users: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub constraints: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl GenerationRequest {
    pub fn new(
        goal: impl Into<String>,
        users: impl Into<String>,
        constraints: impl Into<String>,
        template: Option<String>,
    ) -> Self {
        Self {
            goal: goal.into(),
            users: users.into(),
            constraints: constraints.into(),
            template,
        }
    }

    /// Rejects requests whose goal, users or constraints are blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("goal", &self.goal),
            ("users", &self.users),
            ("constraints", &self.constraints),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// The advisory project template, if one was chosen.
    pub fn template(&self) -> Option<&str> {
        self.template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Project templates offered to users. Advisory only.
pub const KNOWN_TEMPLATES: &[(&str, &str)] = &[
    ("mobile_app", "Mobile App"),
    ("web_app", "Web App"),
    ("internal_tool", "Internal Tool"),
    ("api", "API / Backend"),
];

/// An unsaved spec: the request fields plus what the model generated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDraft {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub users: String,
    #[serde(default)]
    pub constraints: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub data: GenerationResult,
}

impl SpecDraft {
    pub fn new(request: GenerationRequest, data: GenerationResult) -> Self {
        Self {
            goal: request.goal.trim().to_string(),
            users: request.users.trim().to_string(),
            constraints: request.constraints.trim().to_string(),
            template: request.template().map(str::to_string),
            data,
        }
    }
}

/// A persisted spec. `id` is assigned once, when the draft is first saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecRecord {
    pub id: i64,
    #[serde(flatten)]
    pub spec: SpecDraft,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpecRecord {
    pub fn data(&self) -> &GenerationResult {
        &self.spec.data
    }

    pub fn data_mut(&mut self) -> &mut GenerationResult {
        &mut self.spec.data
    }
}
