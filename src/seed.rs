use chrono::NaiveDate;

use crate::category::Category;
use crate::clock::Clock;
use crate::store::TaskState;
use crate::task::{Priority, Task};

fn category(id: &str, name: &str, color: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

/// Demo data the client starts with: three categories and three tasks, the
/// first of which is due today so the calendar has something to show.
pub fn demo_state(clock: &dyn Clock) -> TaskState {
    let now = clock.now();
    let task = |id: &str,
                title: &str,
                description: &str,
                priority: Priority,
                category_id: &str,
                is_completed: bool,
                due_date: Option<NaiveDate>| Task {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        priority,
        category_id: Some(category_id.to_string()),
        is_completed,
        due_date,
        created_at: now,
        updated_at: now,
    };

    TaskState {
        tasks: vec![
            task(
                "1",
                "Finalize Q1 Report",
                "Review the sales numbers and draft the executive summary.",
                Priority::Critical,
                "1",
                false,
                Some(clock.today()),
            ),
            task(
                "2",
                "Buy Groceries",
                "Milk, Eggs, Bread, and Coffee.",
                Priority::Medium,
                "3",
                false,
                None,
            ),
            task(
                "3",
                "Gym Workout",
                "Leg day.",
                Priority::Low,
                "2",
                true,
                NaiveDate::from_ymd_opt(2023, 11, 10),
            ),
        ],
        categories: vec![
            category("1", "Work", "#4F46E5"),
            category("2", "Personal", "#10B981"),
            category("3", "Shopping", "#F59E0B"),
        ],
    }
}
