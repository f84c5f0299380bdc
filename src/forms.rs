//! Form state for the sign-in, task and category dialogs.
//!
//! Forms only hold what the user typed. `submit` turns that into a draft for
//! the stores or a [`FormError`] describing the empty required field.

use chrono::NaiveDate;

use crate::category::{self, Category, CategoryDraft, DEFAULT_COLOR};
use crate::error::FormError;
use crate::task::{Priority, Task, TaskDraft, TaskId, TaskPatch, DATE_FORMAT};

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub focus: AuthField,
    /// Set while the simulated sign-in request is in flight.
    pub loading: bool,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            focus: AuthField::Email,
            loading: false,
        }
    }

    fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Signup => &[AuthField::Email, AuthField::Password, AuthField::Confirm],
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// The identifier to sign in with. Every visible field is required; the
    /// password is never checked against anything.
    pub fn submit(&self) -> Result<String, FormError> {
        if self.email.trim().is_empty() {
            return Err(FormError::MissingField("Email"));
        }
        if self.password.is_empty() {
            return Err(FormError::MissingField("Password"));
        }
        if self.mode == AuthMode::Signup && self.confirm.is_empty() {
            return Err(FormError::MissingField("Confirm Password"));
        }
        Ok(self.email.trim().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    Priority,
    Category,
    DueDate,
}

impl TaskField {
    const ORDER: [TaskField; 5] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::Priority,
        TaskField::Category,
        TaskField::DueDate,
    ];

    fn step(self, by: usize) -> TaskField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + by) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    /// The task being edited, or `None` when creating.
    pub editing: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category_id: Option<String>,
    pub due_date: String,
    pub focus: TaskField,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            category_id: None,
            due_date: String::new(),
            focus: TaskField::Title,
        }
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens with `category` preselected, as when creating from a filtered list.
    pub fn in_category(category: Option<String>) -> Self {
        Self {
            category_id: category,
            ..Self::default()
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            category_id: task.category_id.clone(),
            due_date: task.due_key().unwrap_or_default(),
            focus: TaskField::Title,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.step(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.step(TaskField::ORDER.len() - 1);
    }

    pub fn push(&mut self, c: char) {
        match self.focus {
            TaskField::Title => self.title.push(c),
            TaskField::Description => self.description.push(c),
            TaskField::DueDate => self.due_date.push(c),
            TaskField::Priority | TaskField::Category => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            TaskField::Title => {
                self.title.pop();
            }
            TaskField::Description => {
                self.description.pop();
            }
            TaskField::DueDate => {
                self.due_date.pop();
            }
            TaskField::Priority | TaskField::Category => {}
        }
    }

    /// Left/right on a select field.
    pub fn cycle(&mut self, forward: bool, categories: &[Category]) {
        match self.focus {
            TaskField::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.prev()
                };
            }
            TaskField::Category => self.cycle_category(forward, categories),
            _ => {}
        }
    }

    // Options are "No Category" followed by each category.
    fn cycle_category(&mut self, forward: bool, categories: &[Category]) {
        let options = categories.len() + 1;
        let current = self
            .category_id
            .as_deref()
            .and_then(|id| categories.iter().position(|c| c.id == id))
            .map_or(0, |idx| idx + 1);
        let next = if forward {
            (current + 1) % options
        } else {
            (current + options - 1) % options
        };
        self.category_id = match next {
            0 => None,
            n => Some(categories[n - 1].id.clone()),
        };
    }

    fn parsed_due_date(&self) -> Result<Option<NaiveDate>, FormError> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FormError::InvalidDueDate(raw.to_string()))
    }

    pub fn submit(&self) -> Result<TaskDraft, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::EmptyTitle);
        }
        Ok(TaskDraft {
            title: self.title.clone(),
            description: non_blank(&self.description),
            priority: self.priority,
            category_id: self.category_id.clone(),
            is_completed: false,
            due_date: self.parsed_due_date()?,
        })
    }

    /// Same checks as [`TaskForm::submit`], as an update that leaves the
    /// completion flag alone.
    pub fn submit_patch(&self) -> Result<TaskPatch, FormError> {
        let draft = self.submit()?;
        Ok(TaskPatch {
            title: Some(draft.title),
            description: Some(draft.description),
            priority: Some(draft.priority),
            category_id: Some(draft.category_id),
            is_completed: None,
            due_date: Some(draft.due_date),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Color,
}

#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub name: String,
    pub color: String,
    pub focus: CategoryField,
}

impl CategoryForm {
    pub fn new(default_color: &str) -> Self {
        Self {
            name: String::new(),
            color: default_color.to_string(),
            focus: CategoryField::Name,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            CategoryField::Name => CategoryField::Color,
            CategoryField::Color => CategoryField::Name,
        };
    }

    pub fn push(&mut self, c: char) {
        match self.focus {
            CategoryField::Name => self.name.push(c),
            CategoryField::Color => self.color.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            CategoryField::Name => self.name.pop(),
            CategoryField::Color => self.color.pop(),
        };
    }

    /// Left/right on the color field steps through the presets.
    pub fn cycle_color(&mut self, forward: bool) {
        if self.focus != CategoryField::Color {
            return;
        }
        let next = if forward {
            category::next_preset(&self.color)
        } else {
            category::prev_preset(&self.color)
        };
        self.color = next.to_string();
    }

    pub fn submit(&self) -> Result<CategoryDraft, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::EmptyCategoryName);
        }
        if self.color.trim().is_empty() {
            return Err(FormError::EmptyColor);
        }
        Ok(CategoryDraft {
            name: self.name.clone(),
            color: self.color.trim().to_string(),
        })
    }
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR)
    }
}
