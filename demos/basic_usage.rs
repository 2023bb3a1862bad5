//! Demo: Basic task and theme workflow
//!
//! Drives both stores against a SQLite file in a temporary directory, then
//! reopens them to show that state survives a restart.
//!
//! Run with: cargo run --example basic_usage

use eyre::Result;
use tasklist::{SqliteStorage, StatusFilter, TaskStore, ThemeStore};

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("tasklist.db");

    println!("tasklist Basic Usage Demo");
    println!("=========================\n");
    println!("Database: {}\n", db_path.display());

    let mut tasks = TaskStore::open(SqliteStorage::open(&db_path)?)?;
    let mut themes = ThemeStore::open(SqliteStorage::open(&db_path)?)?;
    themes.subscribe(|theme| println!("   (subscriber) theme is now {}", theme));

    // CREATE
    println!("1. CREATE - Adding tasks...");
    let report = tasks.create("Write report")?;
    tasks.create("Buy Milk")?;
    tasks.create("Call the bank")?;
    let skipped = tasks.create("   ")?;
    println!("   {} tasks, blank task skipped: {}\n", tasks.len(), skipped.is_none());

    // TOGGLE
    println!("2. TOGGLE - Completing the report...");
    if let Some(id) = report {
        tasks.toggle_complete(id)?;
    }
    for task in tasks.filtered_view("", StatusFilter::Complete) {
        println!("   done: {}", task.text);
    }
    println!();

    // SEARCH
    println!("3. SEARCH - Looking for \"milk\"...");
    for task in tasks.filtered_view("milk", StatusFilter::All) {
        println!("   found: {} (id {})", task.text, task.id);
    }
    println!();

    // EDIT
    println!("4. EDIT - Renaming the bank call...");
    let bank = tasks
        .filtered_view("bank", StatusFilter::All)
        .map(|t| t.id)
        .next();
    if let Some(id) = bank {
        tasks.begin_edit(id);
        tasks.commit_edit(id, "Call the bank before noon")?;
        println!("   now: {:?}\n", tasks.get(id).map(|t| t.text.as_str()));
    }

    // DELETE
    println!("5. DELETE - Removing the report...");
    if let Some(id) = report {
        tasks.delete(id)?;
    }
    println!("   {} tasks left\n", tasks.len());

    // THEME
    println!("6. THEME - Toggling from {}...", themes.current());
    themes.toggle()?;
    println!();

    // REOPEN
    println!("7. REOPEN - Loading everything again...");
    drop(tasks);
    drop(themes);
    let tasks = TaskStore::open(SqliteStorage::open(&db_path)?)?;
    let themes = ThemeStore::open(SqliteStorage::open(&db_path)?)?;
    for task in tasks.tasks() {
        println!("   [{}] {}", if task.completed { "x" } else { " " }, task.text);
    }
    println!("   theme: {}", themes.current());

    println!("\nDemo complete!");
    Ok(())
}
