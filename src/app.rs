//! Application root: owns both stores, the current screen and any open
//! dialog, and turns key presses into store mutations.

use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::auth::AuthStore;
use crate::category::Category;
use crate::clock::Clock;
use crate::config::Settings;
use crate::error::FormError;
use crate::forms::{AuthForm, AuthMode, CategoryForm, TaskForm};
use crate::ids::IdGenerator;
use crate::routes::Route;
use crate::scheduler::Scheduler;
use crate::store::TaskStore;
use crate::task::Task;
use crate::views::{self, Month};

#[derive(Debug, Clone)]
pub enum Modal {
    Task(TaskForm),
    Category(CategoryForm),
}

/// Work that completes after the simulated network delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    SignIn { identifier: String },
}

pub struct App {
    pub auth: AuthStore,
    pub tasks: TaskStore,
    route: Route,
    auth_form: AuthForm,
    modal: Option<Modal>,
    form_error: Option<FormError>,
    selected: usize,
    selected_category: usize,
    calendar_month: Month,
    scheduler: Scheduler<Deferred>,
    clock: Rc<dyn Clock>,
    settings: Settings,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, ids: Box<dyn IdGenerator>, clock: Rc<dyn Clock>) -> Self {
        let tasks = TaskStore::seeded(ids, Rc::clone(&clock));
        let calendar_month = Month::containing(clock.today());
        Self {
            auth: AuthStore::new(),
            tasks,
            route: Route::Login,
            auth_form: AuthForm::new(AuthMode::Login),
            modal: None,
            form_error: None,
            selected: 0,
            selected_category: 0,
            calendar_month,
            scheduler: Scheduler::new(),
            clock,
            settings,
            should_quit: false,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn auth_form(&self) -> &AuthForm {
        &self.auth_form
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn form_error(&self) -> Option<&FormError> {
        self.form_error.as_ref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_category(&self) -> usize {
        self.selected_category
    }

    pub fn calendar_month(&self) -> Month {
        self.calendar_month
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn has_pending(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// The category filter of the dashboard, if one is active.
    pub fn category_filter(&self) -> Option<&str> {
        match &self.route {
            Route::Dashboard { category } => category.as_deref(),
            _ => None,
        }
    }

    /// Tasks listed on the dashboard, newest first.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        views::tasks_in_category(self.tasks.tasks(), self.category_filter())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    pub fn navigate(&mut self, path: &str) {
        let route = Route::resolve(path, self.auth.is_authenticated());
        info!(requested = path, resolved = %route, "navigate");
        match route {
            Route::Login => self.auth_form = AuthForm::new(AuthMode::Login),
            Route::Signup => self.auth_form = AuthForm::new(AuthMode::Signup),
            _ => {}
        }
        if route != self.route {
            self.selected = 0;
        }
        self.route = route;
        self.form_error = None;
    }

    /// Runs deferred work whose delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        for action in self.scheduler.take_due(now) {
            match action {
                Deferred::SignIn { identifier } => {
                    self.auth.login(&identifier);
                    self.auth_form.loading = false;
                    self.navigate("/dashboard");
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }
        match self.route {
            Route::Login | Route::Signup => self.handle_auth_key(key, now),
            _ => self.handle_screen_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent, now: Instant) {
        let form = &mut self.auth_form;
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let target = match form.mode {
                    AuthMode::Login => "/signup",
                    AuthMode::Signup => "/login",
                };
                self.navigate(target);
            }
            _ if form.loading => {}
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.push(c),
            KeyCode::Enter => match form.submit() {
                Ok(identifier) => {
                    form.loading = true;
                    self.form_error = None;
                    debug!(%identifier, "sign-in scheduled");
                    self.scheduler.schedule(
                        now,
                        self.settings.login_delay(),
                        Deferred::SignIn { identifier },
                    );
                }
                Err(err) => self.form_error = Some(err),
            },
            _ => {}
        }
    }

    fn handle_screen_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('n') => {
                let category = self
                    .category_filter()
                    .filter(|id| self.tasks.categories().iter().any(|c| c.id == *id))
                    .map(String::from);
                self.open_modal(Modal::Task(TaskForm::in_category(category)));
            }
            KeyCode::Char('d') => self.navigate("/dashboard"),
            KeyCode::Char('c') => self.navigate("/calendar"),
            KeyCode::Char('g') => self.navigate("/categories"),
            KeyCode::Char('L') => {
                self.auth.logout();
                self.navigate("/login");
            }
            KeyCode::Char(']') => self.cycle_category_filter(true),
            KeyCode::Char('[') => self.cycle_category_filter(false),
            _ => match self.route {
                Route::Dashboard { .. } => self.handle_dashboard_key(key),
                Route::Calendar => self.handle_calendar_key(key),
                Route::Categories => self.handle_categories_key(key),
                Route::Login | Route::Signup => {}
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let count = self.visible_tasks().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
                    self.tasks.toggle_complete(&id);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
                    self.tasks.delete_task(&id);
                    let remaining = self.visible_tasks().len();
                    self.selected = self.selected.min(remaining.saturating_sub(1));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(form) = self.selected_task().map(TaskForm::edit) {
                    self.open_modal(Modal::Task(form));
                }
            }
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.calendar_month = self.calendar_month.prev(),
            KeyCode::Right | KeyCode::Char('l') => {
                self.calendar_month = self.calendar_month.next()
            }
            KeyCode::Char('t') => self.calendar_month = Month::containing(self.clock.today()),
            _ => {}
        }
    }

    fn handle_categories_key(&mut self, key: KeyEvent) {
        let count = self.tasks.categories().len();
        match key.code {
            KeyCode::Char('a') => {
                let form = CategoryForm::new(&self.settings.default_category_color);
                self.open_modal(Modal::Category(form));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_category = self.selected_category.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_category + 1 < count {
                    self.selected_category += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(cat) = self.tasks.categories().get(self.selected_category) {
                    let path = format!("/dashboard?cat={}", cat.id);
                    self.navigate(&path);
                }
            }
            _ => {}
        }
    }

    // All Tasks, then each category in sidebar order.
    fn cycle_category_filter(&mut self, forward: bool) {
        let categories: Vec<&Category> = self.tasks.categories().iter().collect();
        let options = categories.len() + 1;
        let current = match &self.route {
            Route::Dashboard {
                category: Some(id),
            } => categories
                .iter()
                .position(|c| &c.id == id)
                .map_or(0, |i| i + 1),
            _ => 0,
        };
        let next = if forward {
            (current + 1) % options
        } else {
            (current + options - 1) % options
        };
        let path = match next {
            0 => "/dashboard".to_string(),
            n => format!("/dashboard?cat={}", categories[n - 1].id),
        };
        self.navigate(&path);
    }

    fn open_modal(&mut self, modal: Modal) {
        self.form_error = None;
        self.modal = Some(modal);
    }

    fn close_modal(&mut self) {
        self.form_error = None;
        self.modal = None;
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.close_modal();
            return;
        }
        if key.code == KeyCode::Enter {
            self.submit_modal();
            return;
        }
        let categories = self.tasks.categories();
        match self.modal.as_mut() {
            Some(Modal::Task(form)) => match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Left => form.cycle(false, categories),
                KeyCode::Right => form.cycle(true, categories),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.push(c),
                _ => {}
            },
            Some(Modal::Category(form)) => match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                    form.focus_next()
                }
                KeyCode::Left => form.cycle_color(false),
                KeyCode::Right => form.cycle_color(true),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.push(c),
                _ => {}
            },
            None => {}
        }
    }

    fn submit_modal(&mut self) {
        let result = match &self.modal {
            Some(Modal::Task(form)) => match &form.editing {
                Some(id) => form.submit_patch().map(|patch| {
                    self.tasks.update_task(id, &patch);
                }),
                None => form.submit().map(|draft| {
                    self.tasks.add_task(draft);
                    self.selected = 0;
                }),
            },
            Some(Modal::Category(form)) => form.submit().map(|draft| {
                self.tasks.add_category(draft);
            }),
            None => return,
        };
        match result {
            Ok(()) => self.close_modal(),
            Err(err) => {
                debug!(%err, "form rejected");
                self.form_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::StepClock;
    use crate::ids::SequentialIds;
    use chrono::{Duration, TimeZone, Utc};

    fn app() -> App {
        let clock = StepClock::new(
            Utc.with_ymd_and_hms(2024, 7, 15, 9, 0, 0).unwrap(),
            Duration::seconds(1),
        );
        App::new(
            Settings::default(),
            Box::new(SequentialIds::new("id")),
            Rc::new(clock),
        )
    }

    fn press(app: &mut App, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for c in s.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    fn signed_in() -> App {
        let mut app = app();
        app.auth.login("alice@example.com");
        app.navigate("/dashboard");
        app
    }

    #[test]
    fn starts_on_login_and_guards_routes() {
        let mut app = app();
        assert_eq!(app.route(), &Route::Login);
        app.navigate("/calendar");
        assert_eq!(app.route(), &Route::Login);
    }

    #[test]
    fn login_applies_after_delay() {
        let mut app = app();
        let start = Instant::now();
        type_str(&mut app, "alice@example.com", start);
        press(&mut app, KeyCode::Tab, start);
        type_str(&mut app, "secret", start);
        press(&mut app, KeyCode::Enter, start);

        assert!(app.auth_form().loading);
        assert!(!app.auth.is_authenticated());

        app.tick(start + std::time::Duration::from_millis(500));
        assert!(!app.auth.is_authenticated());

        app.tick(start + std::time::Duration::from_millis(1000));
        assert!(app.auth.is_authenticated());
        assert_eq!(app.auth.user().unwrap().name, "alice");
        assert_eq!(app.route(), &Route::dashboard());
    }

    #[test]
    fn login_with_empty_email_is_rejected() {
        let mut app = app();
        press(&mut app, KeyCode::Enter, Instant::now());
        assert!(!app.has_pending());
        assert_eq!(app.form_error(), Some(&FormError::MissingField("Email")));
    }

    #[test]
    fn pending_login_survives_navigation() {
        let mut app = app();
        let start = Instant::now();
        type_str(&mut app, "bob", start);
        press(&mut app, KeyCode::Tab, start);
        type_str(&mut app, "pw", start);
        press(&mut app, KeyCode::Enter, start);

        app.handle_key(
            KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL),
            start,
        );
        assert_eq!(app.route(), &Route::Signup);

        app.tick(start + std::time::Duration::from_secs(2));
        assert_eq!(app.auth.user().unwrap().name, "bob");
        assert_eq!(app.route(), &Route::dashboard());
    }

    #[test]
    fn create_task_through_modal() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Char('n'), now);
        assert!(matches!(app.modal(), Some(Modal::Task(_))));

        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.form_error(), Some(&FormError::EmptyTitle));
        assert!(app.modal().is_some());
        assert_eq!(app.tasks.tasks().len(), 3);

        type_str(&mut app, "Plan trip", now);
        press(&mut app, KeyCode::Enter, now);
        assert!(app.modal().is_none());
        assert_eq!(app.tasks.tasks().len(), 4);
        assert_eq!(app.tasks.tasks()[0].title, "Plan trip");
    }

    #[test]
    fn new_task_from_filtered_dashboard_preselects_category() {
        let mut app = signed_in();
        let now = Instant::now();
        app.navigate("/dashboard?cat=2");
        press(&mut app, KeyCode::Char('n'), now);
        type_str(&mut app, "Call mom", now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.tasks.tasks()[0].category_id.as_deref(), Some("2"));

        app.navigate("/dashboard?cat=999");
        press(&mut app, KeyCode::Char('n'), now);
        type_str(&mut app, "Loose end", now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.tasks.tasks()[0].category_id, None);
    }

    #[test]
    fn escape_discards_modal() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Char('n'), now);
        type_str(&mut app, "abandoned", now);
        press(&mut app, KeyCode::Esc, now);
        assert!(app.modal().is_none());
        assert_eq!(app.tasks.tasks().len(), 3);
    }

    #[test]
    fn toggle_and_delete_selected() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Char(' '), now);
        assert!(app.tasks.tasks()[0].is_completed);

        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Down, now);
        assert_eq!(app.selected(), 2);
        press(&mut app, KeyCode::Char('x'), now);
        assert_eq!(app.tasks.tasks().len(), 2);
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn edit_updates_task() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Char('e'), now);
        type_str(&mut app, " today", now);
        press(&mut app, KeyCode::Enter, now);
        let task = app.tasks.snapshot().task("2").cloned().unwrap();
        assert_eq!(task.title, "Buy Groceries today");
        assert!(task.updated_at > task.created_at);
    }

    #[test]
    fn category_filter_cycles() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Char(']'), now);
        assert_eq!(app.category_filter(), Some("1"));
        assert_eq!(app.visible_tasks().len(), 1);
        press(&mut app, KeyCode::Char('['), now);
        assert_eq!(app.category_filter(), None);
        press(&mut app, KeyCode::Char('['), now);
        assert_eq!(app.category_filter(), Some("3"));
    }

    #[test]
    fn add_category_from_categories_screen() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Char('g'), now);
        assert_eq!(app.route(), &Route::Categories);
        press(&mut app, KeyCode::Char('a'), now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.form_error(), Some(&FormError::EmptyCategoryName));
        type_str(&mut app, "Finance", now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.tasks.categories().len(), 4);
        assert_eq!(app.tasks.categories()[3].color, "#4F46E5");
    }

    #[test]
    fn calendar_navigation() {
        let mut app = signed_in();
        let now = Instant::now();
        press(&mut app, KeyCode::Char('c'), now);
        assert_eq!(app.calendar_month(), Month::new(2024, 7).unwrap());
        press(&mut app, KeyCode::Right, now);
        assert_eq!(app.calendar_month(), Month::new(2024, 8).unwrap());
        press(&mut app, KeyCode::Char('t'), now);
        assert_eq!(app.calendar_month(), Month::new(2024, 7).unwrap());
    }

    #[test]
    fn logout_returns_to_login() {
        let mut app = signed_in();
        press(&mut app, KeyCode::Char('L'), Instant::now());
        assert!(!app.auth.is_authenticated());
        assert_eq!(app.route(), &Route::Login);
    }
}
