use chrono::{DateTime, Local, Utc};
use taskgen::contexts::{Entry, HealthReport};
use taskgen::data::{EngineeringTask, SpecRecord};

fn local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn rule() -> String {
    "=".repeat(60)
}

/// One line per record, e.g. for `history list`.
pub fn print_history(specs: &[SpecRecord], capacity: usize) {
    if specs.is_empty() {
        println!("No saved specs");
        return;
    }

    println!("Saved specs ({}/{}):", specs.len(), capacity);
    for spec in specs {
        let data = spec.data();
        println!(
            "  {}  {}  {}  ({} stories, {} tasks, {} risks)",
            spec.id,
            spec.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            spec.spec.goal,
            data.user_stories.len(),
            data.engineering_tasks.len(),
            data.risks.len()
        );
    }
}

fn entry_line(index: usize, entry: &dyn Entry) -> String {
    let mut line = format!("  {:>2}. [{}] {}", index, entry.id(), entry.title());
    if !entry.priority().as_str().is_empty() {
        line.push_str(&format!(" ({})", entry.priority()));
    }
    if let Some(group) = entry.group() {
        line.push_str(&format!(" #{}", group));
    }
    line
}

fn task_details(task: &EngineeringTask) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(hours) = task.estimated_hours {
        parts.push(format!("{}h", hours));
    }
    if !task.dependencies.is_empty() {
        parts.push(format!("after {}", task.dependencies.join(", ")));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Full record with positional indexes, as used by `edit ... move`.
pub fn print_record(record: &SpecRecord) {
    let spec = &record.spec;
    println!("{}", rule());
    println!("Spec {}", record.id);
    println!("  Goal:        {}", spec.goal);
    println!("  Users:       {}", spec.users);
    println!("  Constraints: {}", spec.constraints);
    if let Some(template) = &spec.template {
        println!("  Template:    {}", template);
    }
    println!("  Created:     {}", local(record.created_at));
    if let Some(updated) = record.updated_at {
        println!("  Updated:     {}", local(updated));
    }

    let data = record.data();
    println!("\nUser stories ({}):", data.user_stories.len());
    for (index, story) in data.user_stories.iter().enumerate() {
        println!("{}", entry_line(index, story));
    }

    println!("\nEngineering tasks ({}):", data.engineering_tasks.len());
    for (index, task) in data.engineering_tasks.iter().enumerate() {
        println!("{}", entry_line(index, task));
        if let Some(details) = task_details(task) {
            println!("        {}", details);
        }
    }

    println!("\nRisks ({}):", data.risks.len());
    for risk in &data.risks {
        println!("  [{}] {} ({})", risk.id, risk.title, risk.severity);
        if !risk.mitigation.is_empty() {
            println!("        mitigation: {}", risk.mitigation);
        }
    }
    println!("{}", rule());
}

/// Filtered entries, numbered by their position in the whole collection.
pub fn print_entries(entries: &[(usize, &dyn Entry)]) {
    if entries.is_empty() {
        println!("No matching entries");
        return;
    }
    for (index, entry) in entries {
        println!("{}", entry_line(*index, *entry));
    }
}

pub fn print_report(report: &HealthReport) {
    println!(
        "[{}] backend: {} | database: {} | llm: {} ({})",
        report.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        report.backend,
        report.database,
        report.llm,
        report.llm_provider
    );
}
