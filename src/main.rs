use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use tasklist::{Config, StatusFilter, Task, TaskId, TaskStore, Theme, ThemeStore};
use tracing::debug;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Task list manager with persistent tasks and light/dark theming")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/tasklist/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task description
        text: String,
    },

    /// List tasks, optionally filtered
    List {
        /// Case-insensitive text to search for
        #[arg(short = 'q', long, default_value = "")]
        search: String,

        /// all, complete or incomplete
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    /// Toggle a task between complete and incomplete
    Toggle { id: TaskId },

    /// Replace a task's text
    Edit { id: TaskId, text: String },

    /// Delete a task
    Delete { id: TaskId },

    /// Show or toggle the theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.store_path {
        config.data_dir = path;
    }

    // Setup tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level()?)
        .init();

    // Config is loaded before the subscriber exists, so report it here
    match &config.source {
        Some(path) => debug!(path = ?path, "Loaded config"),
        None => debug!("No config file, using defaults"),
    }
    debug!(data_dir = ?config.data_dir, backend = ?config.backend, "Using storage");

    let mut themes = ThemeStore::open(config.open_storage()?)?;

    // Re-render accent colors whenever the theme flips
    let active = Rc::new(Cell::new(themes.current()));
    let sink = Rc::clone(&active);
    themes.subscribe(move |theme| sink.set(theme));

    let mut tasks = TaskStore::open(config.open_storage()?)?;

    match cli.command {
        Commands::Theme { action } => {
            if let Some(ThemeAction::Toggle) = action {
                themes.toggle()?;
            }
            println!("Theme: {}", accent(active.get(), active.get().as_str()));
        }
        Commands::Add { text } => match tasks.create(&text)? {
            Some(id) => println!("Added task {}", accent(active.get(), &id.to_string())),
            None => println!("Nothing to add: task text is empty"),
        },
        Commands::List { search, status } => {
            let view: Vec<&Task> = tasks.filtered_view(&search, status).collect();
            if view.is_empty() {
                println!("{}", "Empty...".dimmed());
            }
            for task in view {
                print_task(active.get(), task);
            }
        }
        Commands::Toggle { id } => {
            if tasks.toggle_complete(id)? {
                let state = match tasks.get(id) {
                    Some(t) if t.completed => "complete",
                    _ => "incomplete",
                };
                println!("Task {} marked {}", accent(active.get(), &id.to_string()), state);
            } else {
                println!("No task with id {}", id);
            }
        }
        Commands::Edit { id, text } => {
            if !tasks.begin_edit(id) {
                println!("No task with id {}", id);
            } else if tasks.commit_edit(id, &text)? {
                println!("Task {} updated", accent(active.get(), &id.to_string()));
            } else {
                println!("Task {} unchanged: text is empty", id);
            }
        }
        Commands::Delete { id } => {
            if tasks.delete(id)? {
                println!("Deleted task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
    }

    Ok(())
}

fn accent(theme: Theme, text: &str) -> ColoredString {
    match theme {
        Theme::Light => text.purple().bold(),
        Theme::Dark => text.bright_magenta().bold(),
    }
}

fn print_task(theme: Theme, task: &Task) {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let text = if task.completed {
        task.text.strikethrough().dimmed()
    } else {
        task.text.normal()
    };
    let created = task
        .created_at()
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    println!("{} {} {} {}", accent(theme, mark), task.id, text, created.dimmed());
}
