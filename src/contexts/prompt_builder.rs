use crate::data::GenerationRequest;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Fixed system message sent ahead of every generation prompt.
pub const SYSTEM_MESSAGE: &str = "You are a helpful AI that generates product requirements and engineering tasks in valid JSON format. Always respond with valid JSON only, no additional text.";

/// Requested volume of user stories, inclusive.
pub const USER_STORY_RANGE: (usize, usize) = (5, 10);
/// Requested volume of engineering tasks, inclusive.
pub const ENGINEERING_TASK_RANGE: (usize, usize) = (8, 15);

const PROMPT_TEMPLATE: &str = r#"You are a product management and engineering expert. Generate a comprehensive list of user stories and engineering tasks for the following feature:

Goal: {{input.goal}}
Target Users: {{input.users}}
Constraints: {{input.constraints}}
{{input.project_type?}}

Generate the response in the following JSON format:
{
  "userStories": [
    {
      "id": "US-001",
      "title": "User story title",
      "description": "As a [type of user], I want [what], so that [benefit]",
      "priority": "high|medium|low",
      "group": "group_name"
    }
  ],
  "engineeringTasks": [
    {
      "id": "TASK-001",
      "title": "Technical task title",
      "description": "What needs to be implemented",
      "priority": "high|medium|low",
      "group": "group_name",
      "estimatedHours": 4,
      "dependencies": ["TASK-XXX"]
    }
  ],
  "risks": [
    {
      "id": "R-001",
      "title": "Potential risk",
      "description": "Description of the risk",
      "severity": "high|medium|low",
      "mitigation": "How to mitigate this risk"
    }
  ]
}

Ensure the response is valid JSON and includes {{input.min_stories}}-{{input.max_stories}} user stories and {{input.min_tasks}}-{{input.max_tasks}} engineering tasks organized into logical groups."#;

/// Errors raised while filling a prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    MissingMandatoryPlaceholder(String),
    InvalidPlaceholderPath(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TemplateError::MissingMandatoryPlaceholder(ph) => {
                write!(f, "Required placeholder '{}' could not be resolved", ph)
            }
            TemplateError::InvalidPlaceholderPath(path) => {
                write!(f, "Invalid path '{}' in placeholder", path)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Values substituted into the prompt template
#[derive(Serialize)]
struct PromptInput<'a> {
    goal: &'a str,
    users: &'a str,
    constraints: &'a str,
    project_type: Option<String>,
    min_stories: usize,
    max_stories: usize,
    min_tasks: usize,
    max_tasks: usize,
}

/// Builds the generation instruction for a validated request.
///
/// The request must already have passed [`GenerationRequest::validate`].
pub fn build_prompt(request: &GenerationRequest) -> String {
    let input = PromptInput {
        goal: request.goal.trim(),
        users: request.users.trim(),
        constraints: request.constraints.trim(),
        project_type: request.template().map(|t| format!("Project Type: {}", t)),
        min_stories: USER_STORY_RANGE.0,
        max_stories: USER_STORY_RANGE.1,
        min_tasks: ENGINEERING_TASK_RANGE.0,
        max_tasks: ENGINEERING_TASK_RANGE.1,
    };

    let values = serde_json::to_value(&input).unwrap_or(Value::Null);
    render(PROMPT_TEMPLATE, &values).expect("prompt template placeholders all resolve")
}

/// Replace placeholders in a template
///
/// Supports:
/// - Mandatory: {{input.prop_name}}
/// - Optional: {{input.prop_name?}}
/// - Nested: {{input.prop1.prop2}}
///
/// Substituted text is never rescanned, so values containing braces are
/// inserted verbatim.
pub fn render(template: &str, input: &Value) -> Result<String, TemplateError> {
    let mut result = template.to_string();
    let mut offset = 0;

    while let Some(start) = result[offset..].find("{{") {
        let start = offset + start;
        let Some(end_pos) = result[start..].find("}}") else {
            break;
        };
        let end = start + end_pos;

        let placeholder = &result[start + 2..end];
        let (path, is_optional) = match placeholder.strip_suffix('?') {
            Some(path) => (path, true),
            None => (placeholder, false),
        };

        let replacement = match resolve_path(input, path)? {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
            None if is_optional => String::new(),
            None => return Err(TemplateError::MissingMandatoryPlaceholder(path.to_string())),
        };

        result.replace_range(start..end + 2, &replacement);
        offset = start + replacement.len();
    }

    Ok(result)
}

/// Resolve a dotted path such as "input.prop1.prop2" in a JSON value
fn resolve_path<'a>(value: &'a Value, path: &str) -> Result<Option<&'a Value>, TemplateError> {
    let mut parts = path.split('.');

    if parts.next() != Some("input") {
        return Err(TemplateError::InvalidPlaceholderPath(path.to_string()));
    }

    let mut current = value;
    for part in parts {
        match current.get(part) {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }

    Ok(Some(current))
}
