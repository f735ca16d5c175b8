use chrono::NaiveDate;
use clap::Subcommand;

use chronos_core::clock::today;
use chronos_core::{assign_slot, Database, SystemClock, Task};

use super::CliResult;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task for today; lands in the first free core-goal slot
    Add {
        title: String,
        /// Request a specific core-goal slot (1-3); taken slots fall
        /// back to the general bucket
        #[arg(long)]
        slot: Option<u8>,
    },
    /// List tasks, today's by default
    List {
        /// A specific day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mark a task as completed
    Done { id: String },
    /// Reopen a completed task
    Reopen { id: String },
    /// Delete a task
    Delete { id: String },
}

pub fn run(action: TaskAction) -> CliResult {
    let db = Database::open()?;

    match action {
        TaskAction::Add { title, slot } => {
            let date = today(&SystemClock);
            let existing = db.tasks_for_date(date)?;
            let assigned = assign_slot(&existing, slot);
            let task = Task::new(title, date, assigned);
            db.insert_task(&task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { date } => {
            let date = date.unwrap_or_else(|| today(&SystemClock));
            let tasks = db.tasks_for_date(date)?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Done { id } => {
            if db.set_task_completed(&id, true)? {
                println!("ok");
            } else {
                eprintln!("unknown task: {id}");
                std::process::exit(1);
            }
        }
        TaskAction::Reopen { id } => {
            if db.set_task_completed(&id, false)? {
                println!("ok");
            } else {
                eprintln!("unknown task: {id}");
                std::process::exit(1);
            }
        }
        TaskAction::Delete { id } => {
            if db.delete_task(&id)? {
                println!("ok");
            } else {
                eprintln!("unknown task: {id}");
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
