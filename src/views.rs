//! Read-only projections over the task state: filtered task lists, the
//! calendar grid and simple counts. Nothing here is cached; callers recompute
//! on every frame.

use chrono::{Datelike, NaiveDate};
use crate::category::Category;
use crate::task::{Priority, Task, DATE_FORMAT};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Tasks in `category`, or every task when no category is selected.
pub fn tasks_in_category<'a>(tasks: &'a [Task], category: Option<&str>) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| match category {
            Some(id) => t.category_id.as_deref() == Some(id),
            None => true,
        })
        .collect()
}

/// Open tasks whose due date, written `YYYY-MM-DD`, equals `date`.
pub fn tasks_due_on<'a>(tasks: &'a [Task], date: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| !t.is_completed && t.due_key().as_deref() == Some(date))
        .collect()
}

/// Looks up a task's category. Missing or dangling references both resolve
/// to `None` ("no category").
pub fn resolve_category<'a>(categories: &'a [Category], id: Option<&str>) -> Option<&'a Category> {
    let id = id?;
    categories.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    /// Highest priority first.
    pub by_priority: Vec<(Priority, usize)>,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let completed = tasks.iter().filter(|t| t.is_completed).count();
    let by_priority = Priority::ALL
        .iter()
        .map(|p| (*p, tasks.iter().filter(|t| t.priority == *p).count()))
        .collect();
    TaskStats {
        total: tasks.len(),
        open: tasks.len() - completed,
        completed,
        by_priority,
    }
}

/// A calendar month. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// `None` when `month` is outside 1..=12 or the year is outside what
    /// chrono can represent.
    pub fn new(year: i32, month: u32) -> Option<Month> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Month { year, month })
    }

    pub fn containing(date: NaiveDate) -> Month {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.month as usize - 1]
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(self) -> Month {
        if self.month == 12 {
            Month::new(self.year + 1, 1).unwrap_or(self)
        } else {
            Month {
                month: self.month + 1,
                ..self
            }
        }
    }

    pub fn prev(self) -> Month {
        if self.month == 1 {
            Month::new(self.year - 1, 12).unwrap_or(self)
        } else {
            Month {
                month: self.month - 1,
                ..self
            }
        }
    }

    /// Number of the last day in the month.
    pub fn days_in_month(self) -> u32 {
        let next = self.next();
        if next == self {
            // Last representable month; chrono has no first day after it.
            return 31;
        }
        next.first_day()
            .pred_opt()
            .map(|d| d.day())
            .unwrap_or(31)
    }

    /// Weekday of day 1, 0 = Sunday .. 6 = Saturday.
    pub fn first_weekday(self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// `YYYY-MM-DD` for `day` of this month, matching [`Task::due_key`].
    pub fn date_key(self, day: u32) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, day) {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => format!("{:04}-{:02}-{:02}", self.year, self.month, day),
        }
    }

    pub fn title(self) -> String {
        format!("{} {}", self.name(), self.year)
    }
}

pub type Week = [Option<u32>; 7];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub month: Month,
    pub days_in_month: u32,
    pub first_weekday: u32,
    pub weeks: Vec<Week>,
}

impl CalendarGrid {
    pub fn cells(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        self.weeks.iter().flat_map(|w| w.iter().copied())
    }
}

/// Lays out `month` as whole weeks starting on Sunday. Cells before day 1
/// and after the last day are `None`.
pub fn calendar_grid(month: Month) -> CalendarGrid {
    let days_in_month = month.days_in_month();
    let first_weekday = month.first_weekday();

    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut slot = first_weekday as usize;
    for day in 1..=days_in_month {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }

    CalendarGrid {
        month,
        days_in_month,
        first_weekday,
        weeks,
    }
}

/// Whether `day` of `month` is `today`.
pub fn is_today(month: Month, day: u32, today: NaiveDate) -> bool {
    Month::containing(today) == month && today.day() == day
}
