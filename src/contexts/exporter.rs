//! Markdown and plain-text renderings of a spec record.
//!
//! Both renderings are pure; the only environment-dependent part is the
//! generation timestamp, shown in the viewer's local time zone.

use crate::data::{EngineeringTask, GenerationResult, SpecRecord};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::{Display, Write};
use std::str::FromStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" | "plain" => Ok(ExportFormat::Text),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Download name for an export made at `at`, e.g. `task-spec-1767268800000.md`.
pub fn export_file_name(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!("task-spec-{}.{}", at.timestamp_millis(), format.extension())
}

pub fn export(record: &SpecRecord, format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => to_markdown(record),
        ExportFormat::Text => to_text(record),
    }
}

pub fn to_markdown(record: &SpecRecord) -> String {
    markdown_in(record, &Local)
}

pub fn to_text(record: &SpecRecord) -> String {
    text_in(record, &Local)
}

fn timestamp<Tz: TimeZone>(record: &SpecRecord, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    record
        .created_at
        .with_timezone(tz)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Whole hours render without a fraction; missing estimates render empty.
fn hours(task: &EngineeringTask) -> String {
    match task.estimated_hours {
        Some(h) if h.fract() == 0.0 => format!("{:.0}", h),
        Some(h) => h.to_string(),
        None => String::new(),
    }
}

/// Markdown rendering with timestamps shown in `tz`.
pub fn markdown_in<Tz: TimeZone>(record: &SpecRecord, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let spec = &record.spec;
    let mut out = String::new();

    let _ = writeln!(out, "# Task Spec: {}\n", spec.goal);
    let _ = writeln!(out, "**Generated:** {}\n", timestamp(record, tz));
    let _ = writeln!(out, "## Feature Goal\n{}\n", spec.goal);
    let _ = writeln!(out, "## Target Users\n{}\n", spec.users);
    let _ = writeln!(out, "## Constraints\n{}\n", spec.constraints);
    if let Some(template) = &spec.template {
        let _ = writeln!(out, "## Project Type\n{}\n", template);
    }

    let GenerationResult {
        user_stories,
        engineering_tasks,
        risks,
    } = &spec.data;

    if !user_stories.is_empty() {
        out.push_str("## User Stories\n");
        for story in user_stories {
            let _ = writeln!(out, "### {}: {}", story.id, story.title);
            let _ = writeln!(out, "**Priority:** {}", story.priority);
            if let Some(group) = &story.group {
                let _ = writeln!(out, "**Group:** {}", group);
            }
            let _ = writeln!(out, "{}\n", story.description);
        }
    }

    if !engineering_tasks.is_empty() {
        out.push_str("## Engineering Tasks\n");
        for task in engineering_tasks {
            let _ = writeln!(out, "### {}: {}", task.id, task.title);
            let _ = writeln!(out, "**Priority:** {}", task.priority);
            let _ = writeln!(out, "**Estimated Hours:** {}", hours(task));
            if let Some(group) = &task.group {
                let _ = writeln!(out, "**Group:** {}", group);
            }
            if !task.dependencies.is_empty() {
                let _ = writeln!(out, "**Dependencies:** {}", task.dependencies.join(", "));
            }
            let _ = writeln!(out, "{}\n", task.description);
        }
    }

    if !risks.is_empty() {
        out.push_str("## Risks & Unknowns\n");
        for risk in risks {
            let _ = writeln!(out, "### {}: {}", risk.id, risk.title);
            let _ = writeln!(out, "**Severity:** {}", risk.severity);
            let _ = writeln!(out, "{}", risk.description);
            let _ = writeln!(out, "**Mitigation:** {}\n", risk.mitigation);
        }
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}\n{}", title, "-".repeat(20));
}

/// Plain-text rendering with timestamps shown in `tz`.
pub fn text_in<Tz: TimeZone>(record: &SpecRecord, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let spec = &record.spec;
    let mut out = String::new();

    let _ = writeln!(out, "TASK SPEC: {}", spec.goal);
    let _ = writeln!(out, "Generated: {}", timestamp(record, tz));
    let _ = writeln!(out, "{}\n", "=".repeat(50));

    section(&mut out, "FEATURE GOAL");
    let _ = writeln!(out, "{}\n", spec.goal);
    section(&mut out, "TARGET USERS");
    let _ = writeln!(out, "{}\n", spec.users);
    section(&mut out, "CONSTRAINTS");
    let _ = writeln!(out, "{}\n", spec.constraints);
    if let Some(template) = &spec.template {
        section(&mut out, "PROJECT TYPE");
        let _ = writeln!(out, "{}\n", template);
    }

    let data = &spec.data;

    if !data.user_stories.is_empty() {
        section(&mut out, "USER STORIES");
        for story in &data.user_stories {
            let _ = writeln!(out, "[{}] {} ({})", story.id, story.title, story.priority);
            if let Some(group) = &story.group {
                let _ = writeln!(out, "Group: {}", group);
            }
            let _ = writeln!(out, "{}\n", story.description);
        }
    }

    if !data.engineering_tasks.is_empty() {
        section(&mut out, "ENGINEERING TASKS");
        for task in &data.engineering_tasks {
            let _ = writeln!(out, "[{}] {} ({})", task.id, task.title, task.priority);
            if let Some(group) = &task.group {
                let _ = writeln!(out, "Group: {}", group);
            }
            if !task.dependencies.is_empty() {
                let _ = writeln!(out, "Depends on: {}", task.dependencies.join(", "));
            }
            let _ = writeln!(out, "Hours: {} | {}\n", hours(task), task.description);
        }
    }

    if !data.risks.is_empty() {
        section(&mut out, "RISKS & UNKNOWNS");
        for risk in &data.risks {
            let _ = writeln!(out, "[{}] {} ({})", risk.id, risk.title, risk.severity);
            let _ = writeln!(out, "{}", risk.description);
            let _ = writeln!(out, "Mitigation: {}\n", risk.mitigation);
        }
    }

    out
}
