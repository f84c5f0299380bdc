//! Plain-text renderings of the derived views, used by the non-interactive
//! subcommands.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::store::TaskState;
use crate::task::Task;
use crate::views::{self, Month, WEEKDAY_HEADERS};

fn task_line(state: &TaskState, task: &Task) -> String {
    let check = if task.is_completed { "x" } else { " " };
    let category = views::resolve_category(&state.categories, task.category_id.as_deref())
        .map_or("No Category", |c| c.name.as_str());
    let mut line = format!(
        "- [{}] [{}] {} ({}, {}",
        task.id, check, task.title, task.priority, category
    );
    if let Some(due) = task.due_key() {
        let _ = write!(line, ", due {due}");
    }
    line.push(')');
    line
}

pub fn task_list(state: &TaskState, category: Option<&str>) -> String {
    let tasks = views::tasks_in_category(&state.tasks, category);
    if tasks.is_empty() {
        return "No tasks.\n".to_string();
    }
    tasks
        .iter()
        .map(|t| task_line(state, t) + "\n")
        .collect()
}

pub fn category_list(state: &TaskState) -> String {
    state
        .categories
        .iter()
        .map(|c| {
            let count = views::tasks_in_category(&state.tasks, Some(c.id.as_str())).len();
            format!("{:<4} {:<16} {}  {} tasks\n", c.id, c.name, c.color, count)
        })
        .collect()
}

pub fn stats(state: &TaskState) -> String {
    let stats = views::task_stats(&state.tasks);
    let mut out = format!(
        "total: {}\nopen: {}\ncompleted: {}\n",
        stats.total, stats.open, stats.completed
    );
    for (priority, count) in stats.by_priority {
        let _ = writeln!(out, "{priority}: {count}");
    }
    out
}

/// Month grid with today's date bracketed, followed by the open tasks due
/// in that month.
pub fn calendar(state: &TaskState, month: Month, today: NaiveDate) -> String {
    let grid = views::calendar_grid(month);
    let mut out = format!("{}\n", month.title());
    out.push_str(
        &WEEKDAY_HEADERS
            .iter()
            .map(|d| format!("{d:>4}"))
            .collect::<String>(),
    );
    out.push('\n');

    for week in &grid.weeks {
        for cell in week {
            let _ = match cell {
                Some(day) if views::is_today(month, *day, today) => write!(out, " [{day:>2}"),
                Some(day) => write!(out, "{day:>4}"),
                None => write!(out, "    "),
            };
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }

    for day in 1..=grid.days_in_month {
        let key = month.date_key(day);
        for task in views::tasks_due_on(&state.tasks, &key) {
            let _ = writeln!(out, "{key}  {} ({})", task.title, task.priority);
        }
    }
    out
}
