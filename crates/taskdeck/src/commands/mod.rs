use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use taskdeck_app::{AsyncTaskStore, TaskCollection};
use taskdeck_core::{Priority, SortKey, Task, TaskDraft, TaskId};
use time::OffsetDateTime;
use tokio::io::BufReader;

use crate::Command;
use crate::view::render_table;

mod shell;

/// Output format for `ls`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LsFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LsArgs {
    /// Only tasks whose text contains this (case-insensitive).
    #[arg(long)]
    pub search: Option<String>,
    /// Sort key, e.g. dueDateAsc or priorityDesc.
    #[arg(long)]
    pub sort: Option<SortKey>,
    #[arg(long, value_enum, default_value_t = LsFormat::Table)]
    pub format: LsFormat,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    #[arg(long)]
    pub text: String,
    /// Due date, YYYY-MM-DD.
    #[arg(long)]
    pub date: String,
    /// Due time, HH:MM.
    #[arg(long)]
    pub time: String,
    #[arg(long, default_value_t = Priority::Low)]
    pub priority: Priority,
    #[arg(long)]
    pub reminder: bool,
}

impl From<AddArgs> for TaskDraft {
    fn from(args: AddArgs) -> Self {
        Self::new(args.text, args.date, args.time)
            .with_priority(args.priority)
            .with_reminder(args.reminder)
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EditArgs {
    #[arg(long)]
    pub id: TaskId,
    #[arg(long)]
    pub text: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub reminder: Option<bool>,
}

pub async fn run<S, W>(command: Command, collection: &mut TaskCollection<S>, out: &mut W) -> Result<()>
where
    S: AsyncTaskStore,
    W: Write,
{
    collection.load().await.context("failed to load tasks")?;

    match command {
        Command::Ls(LsArgs { search, sort, format }) => {
            if let Some(search) = search {
                collection.set_search_text(search);
            }
            if let Some(sort) = sort {
                collection.set_sort_key(sort);
            }
            match format {
                LsFormat::Table => list(collection, out)?,
                LsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(collection.visible_tasks())?)?,
            }
        }
        Command::Add(args) => add(collection, args, out).await?,
        Command::Edit(args) => edit(collection, args, out).await?,
        Command::Done { id } => toggle(collection, id, out).await?,
        Command::Rm { id } => {
            collection.remove(id).await?;
            writeln!(out, "deleted task {id}")?;
        }
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run(collection, stdin, out).await?;
        }
    }

    Ok(())
}

fn list<S, W: Write>(collection: &TaskCollection<S>, out: &mut W) -> Result<()> {
    render_table(out, collection.visible_tasks(), OffsetDateTime::now_utc())?;
    Ok(())
}

async fn add<S, W>(collection: &mut TaskCollection<S>, args: AddArgs, out: &mut W) -> Result<()>
where
    S: AsyncTaskStore,
    W: Write,
{
    let task = collection.add(args.into()).await?;
    writeln!(out, "created task: {}", describe(&task))?;
    Ok(())
}

async fn edit<S, W>(collection: &mut TaskCollection<S>, args: EditArgs, out: &mut W) -> Result<()>
where
    S: AsyncTaskStore,
    W: Write,
{
    let EditArgs {
        id,
        text,
        date,
        time,
        priority,
        reminder,
    } = args;

    let session = collection.begin_edit(id)?;
    if let Some(text) = text {
        session.set_text(text);
    }
    if let Some(date) = date {
        session.set_date(date);
    }
    if let Some(time) = time {
        session.set_time(time);
    }
    if let Some(priority) = priority {
        session.set_priority(priority);
    }
    if let Some(reminder) = reminder {
        session.set_reminder(reminder);
    }

    if let Err(err) = collection.save_edit().await {
        collection.cancel_edit();
        return Err(err.into());
    }
    if let Some(task) = collection.task(id) {
        writeln!(out, "updated task: {}", describe(task))?;
    }
    Ok(())
}

async fn toggle<S, W>(collection: &mut TaskCollection<S>, id: TaskId, out: &mut W) -> Result<()>
where
    S: AsyncTaskStore,
    W: Write,
{
    let done = collection.toggle_done(id).await?;
    let state = if done { "done" } else { "open" };
    writeln!(out, "task {id} is now {state}")?;
    Ok(())
}

fn describe(task: &Task) -> String {
    let id = task.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
    format!("{id} {} ({})", task.text, task.day)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use taskdeck_store::MemoryStore;

    fn seeded() -> TaskCollection<MemoryStore> {
        let task = |id: u64, text: &str, date_added: &str, priority: Priority| Task {
            id: Some(TaskId(id)),
            text: text.into(),
            day: "2024-02-05 14:30".into(),
            reminder: false,
            date: String::new(),
            time: String::new(),
            priority,
            date_added: date_added.into(),
            done: false,
        };
        TaskCollection::new(MemoryStore::with_tasks(vec![
            task(1, "Doctors Appointment", "2024-01-01", Priority::Low),
            task(2, "Food Shopping", "2024-01-02", Priority::High),
        ]))
    }

    async fn run_to_string(command: Command, collection: &mut TaskCollection<MemoryStore>) -> String {
        let mut out = Vec::new();
        run(command, collection, &mut out).await.expect("command");
        String::from_utf8(out).expect("utf8")
    }

    #[tokio::test]
    async fn ls_applies_search_and_sort() {
        let mut collection = seeded();
        let output = run_to_string(
            Command::Ls(LsArgs {
                search: None,
                sort: Some(SortKey::PriorityDesc),
                format: LsFormat::Table,
            }),
            &mut collection,
        )
        .await;
        let rows: Vec<_> = output.lines().skip(2).collect();
        assert!(rows[0].starts_with("2 |"));
        assert!(rows[1].starts_with("1 |"));

        let output = run_to_string(
            Command::Ls(LsArgs {
                search: Some("food".into()),
                sort: None,
                format: LsFormat::Json,
            }),
            &mut collection,
        )
        .await;
        let tasks: Vec<Task> = serde_json::from_str(&output).expect("json");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Food Shopping");
    }

    #[tokio::test]
    async fn add_then_done_then_rm() {
        let mut collection = seeded();
        let output = run_to_string(
            Command::Add(AddArgs {
                text: "Buy milk".into(),
                date: "2024-03-01".into(),
                time: "08:00".into(),
                priority: Priority::Mid,
                reminder: false,
            }),
            &mut collection,
        )
        .await;
        assert_eq!(output, "created task: 3 Buy milk (2024-03-01 08:00)\n");

        let output = run_to_string(Command::Done { id: TaskId(3) }, &mut collection).await;
        assert_eq!(output, "task 3 is now done\n");

        let output = run_to_string(Command::Rm { id: TaskId(3) }, &mut collection).await;
        assert_eq!(output, "deleted task 3\n");
        assert!(collection.store().list().await.expect("list").iter().all(|t| t.id != Some(TaskId(3))));
    }

    #[tokio::test]
    async fn edit_changes_only_given_fields() {
        let mut collection = seeded();
        let output = run_to_string(
            Command::Edit(EditArgs {
                id: TaskId(1),
                text: None,
                date: None,
                time: Some("16:00".into()),
                priority: Some(Priority::High),
                reminder: None,
            }),
            &mut collection,
        )
        .await;
        assert_eq!(output, "updated task: 1 Doctors Appointment (2024-02-05 16:00)\n");
        let task = collection.task(TaskId(1)).expect("present");
        assert_eq!(task.priority, Priority::High);
        assert!(collection.edit_session().is_none());
    }

    #[tokio::test]
    async fn edit_failure_closes_session() {
        let mut collection = seeded();
        let mut out = Vec::new();
        let result = run(
            Command::Edit(EditArgs {
                id: TaskId(1),
                text: Some("  ".into()),
                date: None,
                time: None,
                priority: None,
                reminder: None,
            }),
            &mut collection,
            &mut out,
        )
        .await;
        assert!(result.is_err());
        assert!(collection.edit_session().is_none());
        assert_eq!(collection.task(TaskId(1)).expect("present").text, "Doctors Appointment");
    }
}
