use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use taskflow::{
    app::App,
    clock::StepClock,
    config::Settings,
    ids::SequentialIds,
    routes::Route,
    ui,
    views::{self, Month},
};

fn new_app() -> App {
    let clock = StepClock::new(
        Utc.with_ymd_and_hms(2024, 7, 15, 9, 0, 0).unwrap(),
        chrono::Duration::seconds(1),
    );
    let settings = Settings {
        login_delay_ms: 1000,
        ..Settings::default()
    };
    App::new(settings, Box::new(SequentialIds::new("t")), Rc::new(clock))
}

fn key(app: &mut App, code: KeyCode, now: Instant) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
}

fn type_str(app: &mut App, s: &str, now: Instant) {
    for c in s.chars() {
        key(app, KeyCode::Char(c), now);
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn sign_in(app: &mut App, start: Instant) {
    type_str(app, "dana@example.com", start);
    key(app, KeyCode::Tab, start);
    type_str(app, "hunter2", start);
    key(app, KeyCode::Enter, start);
    assert!(screen(app).contains("Signing in..."));
    app.tick(start + Duration::from_millis(1000));
}

#[test]
fn sign_in_create_task_and_see_it_on_the_calendar() {
    let mut app = new_app();
    let start = Instant::now();
    sign_in(&mut app, start);
    assert_eq!(app.route(), &Route::dashboard());
    assert!(screen(&app).contains("dana"));

    key(&mut app, KeyCode::Char('n'), start);
    type_str(&mut app, "Dentist", start);
    // Title -> Description -> Priority -> Category -> Due Date
    key(&mut app, KeyCode::Tab, start);
    key(&mut app, KeyCode::Tab, start);
    key(&mut app, KeyCode::Right, start);
    key(&mut app, KeyCode::Tab, start);
    key(&mut app, KeyCode::Right, start);
    key(&mut app, KeyCode::Right, start);
    key(&mut app, KeyCode::Tab, start);
    type_str(&mut app, "2024-07-22", start);
    key(&mut app, KeyCode::Enter, start);

    let task = app.tasks.tasks()[0].clone();
    assert_eq!(task.title, "Dentist");
    assert_eq!(task.category_id.as_deref(), Some("2"));
    assert_eq!(task.due_key().as_deref(), Some("2024-07-22"));

    let due = views::tasks_due_on(app.tasks.tasks(), "2024-07-22");
    assert_eq!(due.len(), 1);

    key(&mut app, KeyCode::Char('c'), start);
    assert_eq!(app.calendar_month(), Month::new(2024, 7).unwrap());
    assert!(screen(&app).contains("Dentist"));

    // Completed tasks drop off the calendar.
    key(&mut app, KeyCode::Char('d'), start);
    key(&mut app, KeyCode::Char(' '), start);
    key(&mut app, KeyCode::Char('c'), start);
    assert!(!screen(&app).contains("Dentist"));
}

#[test]
fn category_shortcut_filters_dashboard() {
    let mut app = new_app();
    let start = Instant::now();
    sign_in(&mut app, start);

    key(&mut app, KeyCode::Char('g'), start);
    key(&mut app, KeyCode::Down, start);
    key(&mut app, KeyCode::Down, start);
    key(&mut app, KeyCode::Enter, start);
    assert_eq!(
        app.route(),
        &Route::Dashboard {
            category: Some("3".to_string())
        }
    );
    let visible: Vec<_> = app.visible_tasks().iter().map(|t| t.title.clone()).collect();
    assert_eq!(visible, ["Buy Groceries"]);
    assert!(screen(&app).contains("Dashboard: Shopping"));
}

#[test]
fn unknown_category_filter_shows_empty_list() {
    let mut app = new_app();
    sign_in(&mut app, Instant::now());
    app.navigate("/dashboard?cat=missing");
    assert!(app.visible_tasks().is_empty());
    assert!(screen(&app).contains("No tasks here yet"));
}

#[test]
fn signing_out_guards_every_screen() {
    let mut app = new_app();
    let start = Instant::now();
    sign_in(&mut app, start);
    key(&mut app, KeyCode::Char('L'), start);
    for path in ["/dashboard", "/calendar", "/categories", "/elsewhere", "/"] {
        app.navigate(path);
        assert_eq!(app.route(), &Route::Login, "{path}");
    }
}
