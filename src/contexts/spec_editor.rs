//! In-place edits to the collections of a generation result.
//!
//! Only user stories and engineering tasks are editable; risks are shown
//! exactly as generated, which [`EditableCollection`] enforces by omission.

use crate::data::{EngineeringTask, GenerationResult, Priority, UserStory};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("field '{field}' does not apply to {collection}")]
    FieldNotApplicable {
        field: EntryField,
        collection: EditableCollection,
    },
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { field: EntryField, value: String },
    #[error("unknown {kind} '{value}'")]
    Unknown { kind: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableCollection {
    UserStories,
    EngineeringTasks,
}

impl EditableCollection {
    /// Prefix used for ids of appended entries.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EditableCollection::UserStories => "US-",
            EditableCollection::EngineeringTasks => "TASK-",
        }
    }
}

impl fmt::Display for EditableCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EditableCollection::UserStories => write!(f, "user stories"),
            EditableCollection::EngineeringTasks => write!(f, "engineering tasks"),
        }
    }
}

impl FromStr for EditableCollection {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stories" | "story" | "userstories" | "user-stories" => Ok(Self::UserStories),
            "tasks" | "task" | "engineeringtasks" | "engineering-tasks" => {
                Ok(Self::EngineeringTasks)
            }
            _ => Err(EditError::Unknown {
                kind: "collection",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Title,
    Description,
    Priority,
    Group,
    EstimatedHours,
    Dependencies,
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EntryField::Title => "title",
            EntryField::Description => "description",
            EntryField::Priority => "priority",
            EntryField::Group => "group",
            EntryField::EstimatedHours => "estimatedHours",
            EntryField::Dependencies => "dependencies",
        };
        f.write_str(name)
    }
}

impl FromStr for EntryField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "priority" => Ok(Self::Priority),
            "group" => Ok(Self::Group),
            "estimatedhours" | "estimated-hours" | "hours" => Ok(Self::EstimatedHours),
            "dependencies" | "depends-on" => Ok(Self::Dependencies),
            _ => Err(EditError::Unknown {
                kind: "field",
                value: s.to_string(),
            }),
        }
    }
}

/// A parsed replacement value for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Title(String),
    Description(String),
    Priority(Priority),
    Group(Option<String>),
    EstimatedHours(Option<f64>),
    Dependencies(Vec<String>),
}

fn invalid(field: EntryField, raw: &str) -> EditError {
    EditError::InvalidValue {
        field,
        value: raw.to_string(),
    }
}

/// Blank means unspecified; anything but high/medium/low is rejected.
fn parse_priority(raw: &str) -> Result<Priority, EditError> {
    let trimmed = raw.trim();
    let priority = Priority::parse(trimmed);
    if priority == Priority::Unspecified && !trimmed.is_empty() {
        return Err(invalid(EntryField::Priority, raw));
    }
    Ok(priority)
}

fn parse_group(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Finite and non-negative; blank clears the estimate.
fn parse_hours(raw: &str) -> Result<Option<f64>, EditError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let hours: f64 = trimmed
        .parse()
        .map_err(|_| invalid(EntryField::EstimatedHours, raw))?;
    if !hours.is_finite() || hours < 0.0 {
        return Err(invalid(EntryField::EstimatedHours, raw));
    }
    Ok(Some(hours))
}

/// Comma-separated ids, trimmed, blanks dropped, first occurrence kept.
fn parse_dependencies<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw
        .into_iter()
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

impl FieldValue {
    /// Parses user input for `field`. Blank input clears optional fields.
    pub fn parse(field: EntryField, raw: &str) -> Result<Self, EditError> {
        Ok(match field {
            EntryField::Title => FieldValue::Title(raw.to_string()),
            EntryField::Description => FieldValue::Description(raw.to_string()),
            EntryField::Priority => FieldValue::Priority(parse_priority(raw)?),
            EntryField::Group => FieldValue::Group(parse_group(raw)),
            EntryField::EstimatedHours => FieldValue::EstimatedHours(parse_hours(raw)?),
            EntryField::Dependencies => FieldValue::Dependencies(parse_dependencies([raw])),
        })
    }

    pub fn field(&self) -> EntryField {
        match self {
            FieldValue::Title(_) => EntryField::Title,
            FieldValue::Description(_) => EntryField::Description,
            FieldValue::Priority(_) => EntryField::Priority,
            FieldValue::Group(_) => EntryField::Group,
            FieldValue::EstimatedHours(_) => EntryField::EstimatedHours,
            FieldValue::Dependencies(_) => EntryField::Dependencies,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(EditError::Unknown {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Group selector for the read-side filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFilter {
    All,
    Group(String),
}

impl GroupFilter {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            GroupFilter::All
        } else {
            GroupFilter::Group(raw.to_string())
        }
    }

    fn matches(&self, group: Option<&str>) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Group(wanted) => group == Some(wanted.as_str()),
        }
    }
}

/// Content for a new entry; the id is assigned on append.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub group: Option<String>,
    pub estimated_hours: Option<f64>,
    pub dependencies: Vec<String>,
}

/// Raw user input for a new entry, before validation.
#[derive(Debug, Clone, Default)]
pub struct EntryInput<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub priority: Option<&'a str>,
    pub group: Option<&'a str>,
    pub estimated_hours: Option<&'a str>,
    pub dependencies: &'a [String],
}

impl EntryDraft {
    /// Validates raw input for `collection` with the same rules as field edits.
    ///
    /// Task-only fields are rejected for user stories.
    pub fn parse(
        collection: EditableCollection,
        input: EntryInput<'_>,
    ) -> Result<Self, EditError> {
        let estimated_hours = input.estimated_hours.map(parse_hours).transpose()?.flatten();
        let dependencies = parse_dependencies(input.dependencies.iter().map(String::as_str));

        if collection == EditableCollection::UserStories {
            let task_only = if estimated_hours.is_some() {
                Some(EntryField::EstimatedHours)
            } else if !dependencies.is_empty() {
                Some(EntryField::Dependencies)
            } else {
                None
            };
            if let Some(field) = task_only {
                return Err(EditError::FieldNotApplicable { field, collection });
            }
        }

        Ok(Self {
            title: input.title.to_string(),
            description: input.description.to_string(),
            priority: input.priority.map(parse_priority).transpose()?.unwrap_or_default(),
            group: input.group.and_then(parse_group),
            estimated_hours,
            dependencies,
        })
    }
}

/// Common view over editable entries.
pub trait Entry {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn priority(&self) -> Priority;
    fn group(&self) -> Option<&str>;

    /// Replaces one field, rejecting fields the entry does not carry.
    fn apply(&mut self, value: FieldValue) -> Result<(), EditError>;

    fn from_draft(id: String, draft: EntryDraft) -> Self
    where
        Self: Sized;
}

impl Entry for UserStory {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn apply(&mut self, value: FieldValue) -> Result<(), EditError> {
        match value {
            FieldValue::Title(title) => self.title = title,
            FieldValue::Description(description) => self.description = description,
            FieldValue::Priority(priority) => self.priority = priority,
            FieldValue::Group(group) => self.group = group,
            other => {
                return Err(EditError::FieldNotApplicable {
                    field: other.field(),
                    collection: EditableCollection::UserStories,
                });
            }
        }
        Ok(())
    }

    fn from_draft(id: String, draft: EntryDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            group: draft.group,
        }
    }
}

impl Entry for EngineeringTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn apply(&mut self, value: FieldValue) -> Result<(), EditError> {
        match value {
            FieldValue::Title(title) => self.title = title,
            FieldValue::Description(description) => self.description = description,
            FieldValue::Priority(priority) => self.priority = priority,
            FieldValue::Group(group) => self.group = group,
            FieldValue::EstimatedHours(hours) => self.estimated_hours = hours,
            FieldValue::Dependencies(dependencies) => self.dependencies = dependencies,
        }
        Ok(())
    }

    fn from_draft(id: String, draft: EntryDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            group: draft.group,
            estimated_hours: draft.estimated_hours,
            dependencies: draft.dependencies,
        }
    }
}

fn edit_entry<T: Entry>(
    entries: &mut [T],
    entry_id: &str,
    value: FieldValue,
) -> Result<bool, EditError> {
    match entries.iter_mut().find(|entry| entry.id() == entry_id) {
        Some(entry) => entry.apply(value).map(|_| true),
        None => Ok(false),
    }
}

fn remove_entry<T: Entry>(entries: &mut Vec<T>, entry_id: &str) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.id() != entry_id);
    entries.len() != before
}

fn swap_neighbour<T>(entries: &mut [T], index: usize, direction: Direction) -> bool {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1),
    };
    match target {
        Some(target) if index < entries.len() && target < entries.len() => {
            entries.swap(index, target);
            true
        }
        _ => false,
    }
}

/// `<prefix><n:03>`, starting at length + 1 and skipping ids already taken.
fn next_entry_id<T: Entry>(entries: &[T], prefix: &str) -> String {
    let mut n = entries.len() + 1;
    loop {
        let candidate = format!("{}{:03}", prefix, n);
        if !entries.iter().any(|entry| entry.id() == candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn push_entry<T: Entry>(entries: &mut Vec<T>, prefix: &str, draft: EntryDraft) -> String {
    let id = next_entry_id(entries, prefix);
    entries.push(T::from_draft(id.clone(), draft));
    id
}

fn in_group<'a, T: Entry>(
    entries: &'a [T],
    filter: &GroupFilter,
) -> Vec<(usize, &'a dyn Entry)> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry.group()))
        .map(|(index, entry)| (index, entry as &dyn Entry))
        .collect()
}

impl GenerationResult {
    /// Replaces one field of one entry.
    ///
    /// Returns `Ok(false)` without changes when `entry_id` is not present.
    pub fn edit_field(
        &mut self,
        collection: EditableCollection,
        entry_id: &str,
        field: EntryField,
        value: &str,
    ) -> Result<bool, EditError> {
        let value = FieldValue::parse(field, value)?;
        match collection {
            EditableCollection::UserStories => edit_entry(&mut self.user_stories, entry_id, value),
            EditableCollection::EngineeringTasks => {
                edit_entry(&mut self.engineering_tasks, entry_id, value)
            }
        }
    }

    /// Removes the entry with `entry_id`, returning whether one was removed.
    pub fn delete_entry(&mut self, collection: EditableCollection, entry_id: &str) -> bool {
        match collection {
            EditableCollection::UserStories => remove_entry(&mut self.user_stories, entry_id),
            EditableCollection::EngineeringTasks => {
                remove_entry(&mut self.engineering_tasks, entry_id)
            }
        }
    }

    /// Swaps the entry at `index` with its neighbour. No-op at either boundary.
    pub fn reorder(
        &mut self,
        collection: EditableCollection,
        index: usize,
        direction: Direction,
    ) -> bool {
        match collection {
            EditableCollection::UserStories => {
                swap_neighbour(&mut self.user_stories, index, direction)
            }
            EditableCollection::EngineeringTasks => {
                swap_neighbour(&mut self.engineering_tasks, index, direction)
            }
        }
    }

    /// Appends a new entry and returns the id it was given.
    pub fn append(&mut self, collection: EditableCollection, draft: EntryDraft) -> String {
        let prefix = collection.id_prefix();
        match collection {
            EditableCollection::UserStories => push_entry(&mut self.user_stories, prefix, draft),
            EditableCollection::EngineeringTasks => {
                push_entry(&mut self.engineering_tasks, prefix, draft)
            }
        }
    }

    /// Entries in the selected group, each with its position in the whole
    /// collection (the index `reorder` takes).
    pub fn filter_by_group(
        &self,
        collection: EditableCollection,
        filter: &GroupFilter,
    ) -> Vec<(usize, &dyn Entry)> {
        match collection {
            EditableCollection::UserStories => in_group(&self.user_stories, filter),
            EditableCollection::EngineeringTasks => in_group(&self.engineering_tasks, filter),
        }
    }

    /// Distinct group labels across stories and tasks, in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        let labels = self
            .user_stories
            .iter()
            .filter_map(|story| story.group.as_deref())
            .chain(self.engineering_tasks.iter().filter_map(|task| task.group.as_deref()));
        for label in labels {
            if !groups.contains(&label) {
                groups.push(label);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, group: Option<&str>) -> UserStory {
        UserStory {
            id: id.to_string(),
            title: format!("Story {}", id),
            description: "As a shopper".to_string(),
            priority: Priority::Medium,
            group: group.map(str::to_string),
        }
    }

    fn task(id: &str, group: Option<&str>) -> EngineeringTask {
        EngineeringTask {
            id: id.to_string(),
            title: format!("Task {}", id),
            group: group.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample() -> GenerationResult {
        GenerationResult {
            user_stories: vec![
                story("US-001", Some("search")),
                story("US-002", Some("ui")),
                story("US-003", None),
            ],
            engineering_tasks: vec![
                task("TASK-001", Some("backend")),
                task("TASK-002", Some("search")),
            ],
            risks: Vec::new(),
        }
    }

    fn story_ids(result: &GenerationResult) -> Vec<&str> {
        result.user_stories.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_edit_field_replaces_one_field() {
        let mut result = sample();
        let changed = result
            .edit_field(EditableCollection::UserStories, "US-002", EntryField::Title, "Filters")
            .unwrap();

        assert!(changed);
        assert_eq!(result.user_stories[1].title, "Filters");
        assert_eq!(result.user_stories[1].description, "As a shopper");
        assert_eq!(result.user_stories[0].title, "Story US-001");
    }

    #[test]
    fn test_edit_field_missing_entry_is_noop() {
        let mut result = sample();
        let before = result.clone();
        let changed = result
            .edit_field(EditableCollection::UserStories, "US-999", EntryField::Title, "x")
            .unwrap();

        assert!(!changed);
        assert_eq!(result, before);
    }

    #[test]
    fn test_edit_field_rejects_task_fields_on_stories() {
        let mut result = sample();
        let err = result
            .edit_field(
                EditableCollection::UserStories,
                "US-001",
                EntryField::EstimatedHours,
                "3",
            )
            .unwrap_err();
        assert!(matches!(err, EditError::FieldNotApplicable { .. }));
    }

    #[test]
    fn test_edit_task_hours_and_dependencies() {
        let mut result = sample();
        result
            .edit_field(
                EditableCollection::EngineeringTasks,
                "TASK-002",
                EntryField::EstimatedHours,
                "2.5",
            )
            .unwrap();
        result
            .edit_field(
                EditableCollection::EngineeringTasks,
                "TASK-002",
                EntryField::Dependencies,
                "TASK-001, TASK-001,",
            )
            .unwrap();

        assert_eq!(result.engineering_tasks[1].estimated_hours, Some(2.5));
        assert_eq!(result.engineering_tasks[1].dependencies, vec!["TASK-001"]);
    }

    #[test]
    fn test_edit_rejects_bad_values() {
        let mut result = sample();
        assert!(matches!(
            result.edit_field(
                EditableCollection::UserStories,
                "US-001",
                EntryField::Priority,
                "urgent"
            ),
            Err(EditError::InvalidValue { .. })
        ));
        assert!(matches!(
            result.edit_field(
                EditableCollection::EngineeringTasks,
                "TASK-001",
                EntryField::EstimatedHours,
                "-1"
            ),
            Err(EditError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_delete_entry() {
        let mut result = sample();
        assert!(result.delete_entry(EditableCollection::UserStories, "US-002"));
        assert_eq!(story_ids(&result), vec!["US-001", "US-003"]);
        assert!(!result.delete_entry(EditableCollection::UserStories, "US-002"));
    }

    #[test]
    fn test_reorder_boundaries_are_noops() {
        let mut result = sample();
        let before = result.clone();

        assert!(!result.reorder(EditableCollection::UserStories, 0, Direction::Up));
        assert!(!result.reorder(EditableCollection::UserStories, 2, Direction::Down));
        assert!(!result.reorder(EditableCollection::UserStories, 7, Direction::Up));
        assert_eq!(result, before);
    }

    #[test]
    fn test_reorder_interior_swaps_with_neighbour() {
        let mut result = sample();
        let before = result.clone();

        assert!(result.reorder(EditableCollection::UserStories, 1, Direction::Down));
        assert_eq!(story_ids(&result), vec!["US-001", "US-003", "US-002"]);
        assert_eq!(result.user_stories[2], before.user_stories[1]);
        assert_eq!(result.engineering_tasks, before.engineering_tasks);

        assert!(result.reorder(EditableCollection::UserStories, 1, Direction::Up));
        assert_eq!(story_ids(&result), vec!["US-003", "US-001", "US-002"]);
    }

    #[test]
    fn test_append_assigns_sequence_id() {
        let mut result = sample();
        let id = result.append(
            EditableCollection::EngineeringTasks,
            EntryDraft {
                title: "Index products".to_string(),
                estimated_hours: Some(6.0),
                ..Default::default()
            },
        );

        assert_eq!(id, "TASK-003");
        assert_eq!(result.engineering_tasks.last().unwrap().estimated_hours, Some(6.0));
    }

    #[test]
    fn test_append_after_delete_does_not_collide() {
        let mut result = sample();
        result.delete_entry(EditableCollection::UserStories, "US-001");

        // Length is now 2, but US-003 is still present.
        let id = result.append(EditableCollection::UserStories, EntryDraft::default());
        assert_eq!(id, "US-004");
        let ids = story_ids(&result);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.iter().filter(|id| **id == "US-004").count(), 1);
    }

    #[test]
    fn test_filter_by_group() {
        let result = sample();
        let all = result.filter_by_group(EditableCollection::UserStories, &GroupFilter::All);
        assert_eq!(all.len(), 3);

        let search =
            result.filter_by_group(EditableCollection::UserStories, &GroupFilter::parse("search"));
        assert_eq!(search.len(), 1);
        assert_eq!(search[0].1.id(), "US-001");
    }

    #[test]
    fn test_filter_keeps_collection_positions() {
        let mut result = sample();
        let search = result.filter_by_group(
            EditableCollection::EngineeringTasks,
            &GroupFilter::parse("search"),
        );
        assert_eq!(search.len(), 1);
        let (index, entry) = search[0];
        assert_eq!((index, entry.id()), (1, "TASK-002"));

        // The reported position is the one reorder acts on.
        assert!(result.reorder(EditableCollection::EngineeringTasks, index, Direction::Up));
        assert_eq!(result.engineering_tasks[0].id, "TASK-002");
    }

    #[test]
    fn test_entry_draft_parse_validates_like_edits() {
        fn task_input(
            priority: Option<&'static str>,
            hours: Option<&'static str>,
        ) -> EntryInput<'static> {
            EntryInput {
                title: "Index products",
                priority,
                estimated_hours: hours,
                ..Default::default()
            }
        }

        for (priority, hours) in [
            (Some("urgent"), None),
            (None, Some("-5")),
            (None, Some("NaN")),
            (None, Some("inf")),
            (None, Some("soon")),
        ] {
            let err =
                EntryDraft::parse(EditableCollection::EngineeringTasks, task_input(priority, hours))
                    .unwrap_err();
            assert!(matches!(err, EditError::InvalidValue { .. }), "{:?} {:?}", priority, hours);
        }

        let deps = vec![" TASK-001 ".to_string(), "TASK-001,TASK-002".to_string(), " ".to_string()];
        let draft = EntryDraft::parse(
            EditableCollection::EngineeringTasks,
            EntryInput {
                title: "Index products",
                priority: Some(" HIGH "),
                group: Some("  "),
                estimated_hours: Some("2.5"),
                dependencies: &deps,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.group, None);
        assert_eq!(draft.estimated_hours, Some(2.5));
        assert_eq!(draft.dependencies, vec!["TASK-001", "TASK-002"]);
    }

    #[test]
    fn test_entry_draft_parse_rejects_task_fields_on_stories() {
        let err = EntryDraft::parse(
            EditableCollection::UserStories,
            EntryInput {
                title: "Search",
                estimated_hours: Some("3"),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EditError::FieldNotApplicable {
                field: EntryField::EstimatedHours,
                ..
            }
        ));

        let draft = EntryDraft::parse(
            EditableCollection::UserStories,
            EntryInput {
                title: "Search",
                priority: Some(""),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(draft.priority, Priority::Unspecified);
    }

    #[test]
    fn test_groups_are_distinct_in_order() {
        assert_eq!(sample().groups(), vec!["search", "ui", "backend"]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "stories".parse::<EditableCollection>().unwrap(),
            EditableCollection::UserStories
        );
        assert_eq!("hours".parse::<EntryField>().unwrap(), EntryField::EstimatedHours);
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert!("risks".parse::<EditableCollection>().is_err());
    }
}
