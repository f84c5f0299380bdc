use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, Command};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, rc::Rc};
use taskflow::{
    app::App,
    clock::{Clock, SystemClock},
    config::Settings,
    ids::RandomIds,
    logging, report,
    store::TaskStore,
    ui,
    views::Month,
};
use tracing::{error, info};

fn cli() -> Command {
    Command::new("taskflow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal task manager with categories and a monthly calendar")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the JSON settings file"),
        )
        .subcommand(Command::new("run").about("Start the interactive client (default)"))
        .subcommand(
            Command::new("list")
                .about("List the demo tasks")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Only tasks in this category id"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print JSON instead of text"),
                ),
        )
        .subcommand(
            Command::new("calendar")
                .about("Print a month grid with open tasks due that month")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_parser(value_parser!(u32).range(1..=12)),
                ),
        )
        .subcommand(Command::new("categories").about("List categories"))
        .subcommand(Command::new("stats").about("Show task counts"))
}

fn demo_store(clock: Rc<dyn Clock>) -> TaskStore {
    TaskStore::seeded(Box::new(RandomIds), clock)
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let settings = Settings::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load settings")?;
    logging::init(&settings)
        .with_context(|| format!("failed to open log file {}", settings.log_file.display()))?;

    let clock: Rc<dyn Clock> = Rc::new(SystemClock);

    match matches.subcommand() {
        Some(("list", sub_matches)) => {
            let store = demo_store(clock);
            let category = sub_matches.get_one::<String>("category").map(String::as_str);
            if sub_matches.get_flag("json") {
                let tasks = taskflow::views::tasks_in_category(store.tasks(), category);
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", report::task_list(&store.snapshot(), category));
            }
        }
        Some(("calendar", sub_matches)) => {
            let today = clock.today();
            let current = Month::containing(today);
            let year = sub_matches
                .get_one::<i32>("year")
                .copied()
                .unwrap_or(current.year());
            let month = sub_matches
                .get_one::<u32>("month")
                .copied()
                .unwrap_or(current.month());
            let month = Month::new(year, month)
                .ok_or_else(|| anyhow!("{year}-{month} is not a valid month"))?;
            let store = demo_store(clock);
            print!("{}", report::calendar(&store.snapshot(), month, today));
        }
        Some(("categories", _)) => {
            print!("{}", report::category_list(&demo_store(clock).snapshot()));
        }
        Some(("stats", _)) => {
            print!("{}", report::stats(&demo_store(clock).snapshot()));
        }
        _ => run(settings, clock)?,
    }
    Ok(())
}

fn run(settings: Settings, clock: Rc<dyn Clock>) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = settings.tick_rate();
    let mut app = App::new(settings, Box::new(RandomIds), clock);
    info!("client started");
    let result = ui::run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(%err, "event loop failed");
    }
    result.context("event loop failed")
}
