//! Line-oriented interactive session over a single task collection.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use taskdeck_app::{AsyncTaskStore, TaskCollection};
use taskdeck_core::{SortKey, TaskId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::{AddArgs, EditArgs, add, edit, list, toggle};

const PROMPT: &str = "taskdeck> ";

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    cmd: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ShellCommand {
    /// Show the current view.
    Ls,
    /// Create a task.
    Add(AddArgs),
    /// Change fields of an existing task.
    Edit(EditArgs),
    /// Toggle the done flag.
    Done { id: TaskId },
    /// Delete a task; it can be restored with `undo` for a few seconds.
    Rm { id: TaskId },
    /// Restore the most recently deleted task.
    Undo,
    /// Filter the view by text; no argument clears the filter.
    Search { query: Vec<String> },
    /// Change the sort order.
    Sort { key: SortKey },
    /// Leave the session.
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until `quit` or end of input.
pub async fn run<S, R, W>(collection: &mut TaskCollection<S>, input: R, out: &mut W) -> Result<()>
where
    S: AsyncTaskStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    list(collection, out)?;

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        collection.expire_pending_deletion();

        let words = match shell_words::split(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.cmd,
            Err(err) => {
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        debug!(?command, "shell command");
        match execute(collection, command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => writeln!(out, "error: {err:#}")?,
        }
    }
    Ok(())
}

async fn execute<S, W>(collection: &mut TaskCollection<S>, command: ShellCommand, out: &mut W) -> Result<Flow>
where
    S: AsyncTaskStore,
    W: Write,
{
    match command {
        ShellCommand::Ls => list(collection, out)?,
        ShellCommand::Add(args) => add(collection, args, out).await?,
        ShellCommand::Edit(args) => edit(collection, args, out).await?,
        ShellCommand::Done { id } => toggle(collection, id, out).await?,
        ShellCommand::Rm { id } => {
            collection.remove(id).await?;
            let secs = collection
                .undo_remaining()
                .map_or(0, |left| left.as_secs() + u64::from(left.subsec_nanos() > 0));
            writeln!(out, "deleted task {id}; type `undo` within {secs}s to restore it")?;
        }
        ShellCommand::Undo => match collection.undo_delete().await? {
            Some(task) => {
                let id = task.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
                writeln!(out, "restored \"{}\" as task {id}", task.text)?;
            }
            None => writeln!(out, "nothing to undo")?,
        },
        ShellCommand::Search { query } => {
            collection.set_search_text(query.join(" "));
            list(collection, out)?;
        }
        ShellCommand::Sort { key } => {
            collection.set_sort_key(key);
            list(collection, out)?;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use taskdeck_store::MemoryStore;

    async fn session(script: &str) -> (TaskCollection<MemoryStore>, String) {
        let mut collection = TaskCollection::new(MemoryStore::new());
        collection.load().await.expect("load");
        let mut out = Vec::new();
        run(&mut collection, script.as_bytes(), &mut out).await.expect("shell");
        (collection, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn parses_quoted_arguments() {
        let words = shell_words::split(r#"add --text "Buy milk" --date 2024-01-01 --time 10:00"#).expect("split");
        let parsed = ShellLine::try_parse_from(words).expect("parse");
        let ShellCommand::Add(args) = parsed.cmd else {
            panic!("expected add");
        };
        assert_eq!(args.text, "Buy milk");
    }

    #[tokio::test]
    async fn delete_then_undo_restores_under_new_id() {
        let script = "add --text \"Buy milk\" --date 2024-01-01 --time 10:00\nrm 1\nundo\nundo\nquit\nls\n";
        let (collection, output) = session(script).await;

        assert!(output.contains("created task: 1 Buy milk"));
        assert!(output.contains("deleted task 1; type `undo` within 5s"));
        assert!(output.contains("restored \"Buy milk\" as task 2"));
        assert!(output.contains("nothing to undo"));
        assert_eq!(collection.tasks().len(), 1);
        assert_eq!(collection.tasks()[0].id, Some(TaskId(2)));
    }

    #[tokio::test]
    async fn errors_do_not_end_the_session() {
        let script = "frobnicate\ndone 42\nadd --text \"\" --date 2024-01-01 --time 10:00\nsort priorityDesc\n";
        let (collection, output) = session(script).await;

        assert!(output.contains("error: task 42 is not in the collection"));
        assert!(output.contains("error: task text must not be empty"));
        assert_eq!(collection.sort_key(), SortKey::PriorityDesc);
    }

    #[tokio::test]
    async fn search_filters_and_clears() {
        let script = "add --text \"Food Shopping\" --date 2024-01-01 --time 10:00\n\
                      add --text \"Doctors Appointment\" --date 2024-01-02 --time 11:00\n\
                      search food\n";
        let (mut collection, _) = session(script).await;
        assert_eq!(collection.visible_tasks().len(), 1);
        assert_eq!(collection.search_text(), "food");

        collection.set_search_text("");
        assert_eq!(collection.visible_tasks().len(), 2);
    }
}
