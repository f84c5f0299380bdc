use crate::app::{App, Modal};
use crate::category::Category;
use crate::forms::{AuthField, AuthMode, CategoryField, TaskField};
use crate::routes::Route;
use crate::task::{Priority, Task};
use crate::views::{self, WEEKDAY_HEADERS};
use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const ACCENT: Color = Color::Rgb(0x4f, 0x46, 0xe5);
const SIDEBAR_WIDTH: u16 = 28;

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key, Instant::now());
            }
        }
        app.tick(Instant::now());

        if app.should_quit() {
            return Ok(());
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    match app.route() {
        Route::Login | Route::Signup => draw_auth(f, app, area),
        _ => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .split(area);
            draw_sidebar(f, app, chunks[0]);
            draw_main(f, app, chunks[1]);
        }
    }

    if let Some(modal) = app.modal() {
        draw_modal(f, app, modal);
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => Color::Red,
        Priority::High => Color::Rgb(0xf9, 0x73, 0x16),
        Priority::Medium => Color::Blue,
        Priority::Low => Color::Gray,
    }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "!!",
        Priority::High => "^ ",
        Priority::Medium => "- ",
        Priority::Low => "v ",
    }
}

pub fn category_color(category: &Category) -> Color {
    match category.rgb() {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::Gray,
    }
}

fn focused_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(
            format!("{} {:<16}", if focused { ">" } else { " " }, label),
            focused_style(focused),
        ),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn error_line(app: &App) -> Line<'static> {
    match app.form_error() {
        Some(err) => Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
        None => Line::raw(""),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_auth(f: &mut Frame, app: &App, area: Rect) {
    let form = app.auth_form();
    let (title, button, busy) = match form.mode {
        AuthMode::Login => ("Sign In", "[ Sign In ]", "Signing in..."),
        AuthMode::Signup => ("Create Account", "[ Sign Up ]", "Creating account..."),
    };
    let masked = |s: &str| "*".repeat(s.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            "TaskFlow",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        field_line("Email", form.email.clone(), form.focus == AuthField::Email),
        field_line(
            "Password",
            masked(&form.password),
            form.focus == AuthField::Password,
        ),
    ];
    if form.mode == AuthMode::Signup {
        lines.push(field_line(
            "Confirm Password",
            masked(&form.confirm),
            form.focus == AuthField::Confirm,
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        if form.loading { busy } else { button },
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(error_line(app));
    lines.push(Line::from(Span::styled(
        match form.mode {
            AuthMode::Login => "Don't have an account? Ctrl+N to sign up",
            AuthMode::Signup => "Already have an account? Ctrl+N to sign in",
        },
        Style::default().fg(Color::DarkGray),
    )));

    let height = lines.len() as u16 + 2;
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(paragraph, centered_rect(56, height, area));
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let active = |on: bool| {
        if on {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let filter = app.category_filter();
    let on_dashboard = matches!(app.route(), Route::Dashboard { .. });

    let mut lines = vec![
        Line::from(Span::styled(
            "+ New Task (n)",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "All Tasks (d)",
            active(on_dashboard && filter.is_none()),
        )),
        Line::from(Span::styled(
            "Calendar (c)",
            active(*app.route() == Route::Calendar),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "CATEGORIES  [ ]",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    for category in app.tasks.categories() {
        let selected = on_dashboard && filter == Some(category.id.as_str());
        lines.push(Line::from(vec![
            Span::styled("  ● ", Style::default().fg(category_color(category))),
            Span::styled(category.name.clone(), active(selected)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Manage Categories (g)",
        active(*app.route() == Route::Categories),
    )));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    f.render_widget(
        Paragraph::new(lines).block(Block::default().title("TaskFlow").borders(Borders::ALL)),
        chunks[0],
    );

    let mut account = Vec::new();
    if let Some(user) = app.auth.user() {
        account.push(Line::from(vec![
            Span::styled(
                format!("({}) ", user.initial().unwrap_or('?')),
                Style::default().fg(ACCENT),
            ),
            Span::styled(user.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        account.push(Line::from(Span::styled(
            user.username.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    account.push(Line::from(Span::styled(
        "Sign Out (L)",
        Style::default().fg(Color::Red),
    )));
    f.render_widget(
        Paragraph::new(account).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
}

fn draw_main(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let hint = match app.route() {
        Route::Dashboard { .. } => {
            "j/k move  space done  e edit  x delete  [ ] category  q quit"
        }
        Route::Calendar => "h/l month  t today  q quit",
        Route::Categories => "a add  j/k move  enter show tasks  q quit",
        Route::Login | Route::Signup => "",
    };

    match app.route() {
        Route::Dashboard { .. } => draw_dashboard(f, app, chunks[0]),
        Route::Calendar => draw_calendar(f, app, chunks[0]),
        Route::Categories => draw_categories(f, app, chunks[0]),
        Route::Login | Route::Signup => {}
    }
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        chunks[1],
    );
}

fn task_item<'a>(task: &'a Task, categories: &'a [Category]) -> ListItem<'a> {
    let check = if task.is_completed { "[x] " } else { "[ ] " };
    let title_style = if task.is_completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(check),
        Span::styled(
            priority_marker(task.priority),
            Style::default().fg(priority_color(task.priority)),
        ),
        Span::raw(" "),
        Span::styled(task.title.as_str(), title_style),
    ])];

    if let Some(description) = &task.description {
        lines.push(Line::from(Span::styled(
            format!("       {description}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut meta = vec![
        Span::raw("       "),
        Span::styled(
            task.priority.label(),
            Style::default().fg(priority_color(task.priority)),
        ),
    ];
    if let Some(category) = views::resolve_category(categories, task.category_id.as_deref()) {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(
            format!("[{}]", category.name),
            Style::default().fg(category_color(category)),
        ));
    }
    if let Some(due) = task.due_key() {
        meta.push(Span::raw(format!("  due {due}")));
    }
    lines.push(Line::from(meta));

    ListItem::new(Text::from(lines))
}

fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let tasks = app.visible_tasks();
    let categories = app.tasks.categories();
    let heading = match views::resolve_category(categories, app.category_filter()) {
        Some(category) => category.name.clone(),
        None if app.category_filter().is_some() => "Unknown category".to_string(),
        None => "All Tasks".to_string(),
    };
    let open = tasks.iter().filter(|t| !t.is_completed).count();
    let title = format!(
        "Dashboard: {} ({} open, {} done)",
        heading,
        open,
        tasks.len() - open
    );

    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks here yet. Press n to create one.")
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tasks.iter().map(|t| task_item(t, categories)).collect();
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Rgb(0x1e, 0x1b, 0x4b)),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selected()));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_calendar(f: &mut Frame, app: &App, area: Rect) {
    let month = app.calendar_month();
    let grid = views::calendar_grid(month);
    let today = app.clock().today();
    let tasks = app.tasks.tasks();

    let block = Block::default().title(month.title()).borders(Borders::ALL);
    let inner_height = block.inner(area).height.saturating_sub(1);
    let weeks = grid.weeks.len().max(1) as u16;
    let row_height = (inner_height / weeks).max(2);

    let header = Row::new(
        WEEKDAY_HEADERS
            .iter()
            .map(|d| Cell::from(*d).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let rows: Vec<Row> = grid
        .weeks
        .iter()
        .map(|week| {
            let cells = week.iter().map(|day| {
                let Some(day) = *day else {
                    return Cell::from("").style(Style::default().bg(Color::Rgb(0x1e, 0x29, 0x3b)));
                };
                let day_style = if views::is_today(month, day, today) {
                    Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let mut lines = vec![Line::from(Span::styled(format!("{day:>2}"), day_style))];
                for task in views::tasks_due_on(tasks, &month.date_key(day)) {
                    lines.push(Line::from(vec![
                        Span::styled("• ", Style::default().fg(priority_color(task.priority))),
                        Span::raw(task.title.clone()),
                    ]));
                }
                Cell::from(Text::from(lines))
            });
            Row::new(cells).height(row_height)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn draw_categories(f: &mut Frame, app: &App, area: Rect) {
    let tasks = app.tasks.tasks();
    let items: Vec<ListItem> = app
        .tasks
        .categories()
        .iter()
        .map(|category| {
            let count = views::tasks_in_category(tasks, Some(category.id.as_str())).len();
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(category_color(category))),
                Span::styled(
                    category.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}  {} task{}", category.color, count, if count == 1 { "" } else { "s" }),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Manage Categories")
                .borders(Borders::ALL),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selected_category()));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_modal(f: &mut Frame, app: &App, modal: &Modal) {
    let (title, mut lines) = match modal {
        Modal::Task(form) => {
            let category = match views::resolve_category(
                app.tasks.categories(),
                form.category_id.as_deref(),
            ) {
                Some(c) => c.name.clone(),
                None => "No Category".to_string(),
            };
            let title = if form.editing.is_some() {
                "Edit Task"
            } else {
                "Create New Task"
            };
            (
                title,
                vec![
                    field_line("Task Title", form.title.clone(), form.focus == TaskField::Title),
                    field_line(
                        "Description",
                        form.description.clone(),
                        form.focus == TaskField::Description,
                    ),
                    field_line(
                        "Priority",
                        format!("< {} >", form.priority.label()),
                        form.focus == TaskField::Priority,
                    ),
                    field_line(
                        "Category",
                        format!("< {category} >"),
                        form.focus == TaskField::Category,
                    ),
                    field_line(
                        "Due Date",
                        form.due_date.clone(),
                        form.focus == TaskField::DueDate,
                    ),
                ],
            )
        }
        Modal::Category(form) => (
            "New Category",
            vec![
                field_line("Name", form.name.clone(), form.focus == CategoryField::Name),
                field_line(
                    "Color",
                    format!("< {} >", form.color),
                    form.focus == CategoryField::Color,
                ),
            ],
        ),
    };
    lines.push(Line::raw(""));
    lines.push(error_line(app));
    lines.push(Line::from(Span::styled(
        "enter save  esc cancel  tab next field  left/right choose",
        Style::default().fg(Color::DarkGray),
    )));

    let area = f.area();
    let area = centered_rect(64, lines.len() as u16 + 2, area);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        ),
        area,
    );
}
