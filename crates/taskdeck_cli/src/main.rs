//! Command-line front end for the Taskdeck core.
//!
//! # Responsibility
//! - Invoke repository operations in response to commands.
//! - Render query/stats snapshots and one transient notice per operation
//!   outcome, including non-fatal load and persist failures.

use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use taskdeck_core::db::open_db;
use taskdeck_core::{
    core_version, default_log_level, init_logging, parse_priority, parse_sort_key,
    parse_status_filter, query, stats, LoadOutcome, RepoEvent, SortKey, SqliteSlotStore,
    StatusFilter, Task, TaskDraft, TaskId, TaskRepository, TaskValidationError,
};

const USAGE: &str = "usage: taskdeck <command> [args]

commands:
  add <text> [--priority low|medium|high] [--due YYYY-MM-DD]
             [--tag <tag>]... [--notes <text>]
  list [--filter all|active|completed] [--sort created|due|priority]
       [--search <text>]
  toggle <id>        flip completion of one task
  rm <id>            delete one task
  edit <id> <text>   replace task text
  tag <id> <tag>     add a tag
  untag <id> <tag>   remove a tag
  stats              print summary counts
  version            print version

<id> accepts any unambiguous prefix of a task id.
environment: TASKDECK_DB (database path), TASKDECK_LOG_DIR (enable file logs)";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            return Ok(());
        }
        "version" | "--version" => {
            println!("taskdeck {}", core_version());
            return Ok(());
        }
        _ => {}
    }

    if let Ok(log_dir) = env::var("TASKDECK_LOG_DIR") {
        if let Err(message) = init_logging(default_log_level(), &log_dir) {
            eprintln!("warning: logging disabled: {message}");
        }
    }

    let db_path = resolve_db_path()?;
    let conn = open_db(&db_path).map_err(|err| format!("cannot open `{}`: {err}", db_path.display()))?;
    let (mut repo, outcome) = TaskRepository::load(SqliteSlotStore::new(&conn));
    if let LoadOutcome::RecoveredFromError(err) = &outcome {
        eprintln!("warning: stored todos were unreadable, starting empty: {err}");
    }
    repo.subscribe(|event| {
        if let RepoEvent::PersistFailed { message, .. } = event {
            eprintln!("warning: change kept in memory but saving failed: {message}");
        }
    });

    let rest = &args[1..];
    match command.as_str() {
        "add" => cmd_add(&mut repo, rest),
        "list" => cmd_list(&repo, rest),
        "toggle" => cmd_toggle(&mut repo, rest),
        "rm" => cmd_remove(&mut repo, rest),
        "edit" => cmd_edit(&mut repo, rest),
        "tag" => cmd_tag(&mut repo, rest),
        "untag" => cmd_untag(&mut repo, rest),
        "stats" => cmd_stats(&repo),
        other => Err(format!("unknown command `{other}`; run `taskdeck help`")),
    }
}

fn cmd_add(repo: &mut TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let draft = parse_draft(args)?;
    match repo.add(draft) {
        Ok(task) => {
            println!("Added {}: {}", short_id(&task), task.text);
            Ok(())
        }
        Err(TaskValidationError::EmptyText) => Err("please enter some task text".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

fn cmd_list(repo: &TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let (filter, sort, search) = parse_list_args(args)?;
    let view = query(repo.list(), filter, &search, sort);

    if view.is_empty() {
        println!("No todos found.");
    } else {
        for task in &view {
            println!("{}", render_task_line(task));
        }
    }

    let totals = stats(repo.list());
    println!(
        "{} total, {} completed, {} active",
        totals.total, totals.completed, totals.active
    );
    Ok(())
}

fn cmd_toggle(repo: &mut TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let id = resolve_id(repo.list(), one_arg(args, "toggle <id>")?)?;
    repo.toggle(id);
    let task = repo.get(id).ok_or_else(|| "task disappeared".to_string())?;
    if task.completed {
        println!("Completed: {}", task.text);
    } else {
        println!("Reopened: {}", task.text);
    }
    Ok(())
}

fn cmd_remove(repo: &mut TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let id = resolve_id(repo.list(), one_arg(args, "rm <id>")?)?;
    repo.remove(id);
    println!("Todo deleted");
    Ok(())
}

fn cmd_edit(repo: &mut TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let (id_arg, text) = two_args(args, "edit <id> <text>")?;
    let id = resolve_id(repo.list(), id_arg)?;
    match repo.edit_text(id, text) {
        Ok(true) => {
            println!("Updated {}", short_from(id));
            Ok(())
        }
        Ok(false) => Err(format!("no task matches id `{id_arg}`")),
        Err(TaskValidationError::EmptyText) => Err("please enter some task text".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

fn cmd_tag(repo: &mut TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let (id_arg, tag) = two_args(args, "tag <id> <tag>")?;
    let id = resolve_id(repo.list(), id_arg)?;
    match repo.add_tag(id, tag) {
        Ok(true) => {
            println!("Tagged {} with #{}", short_from(id), tag.trim());
            Ok(())
        }
        Ok(false) => {
            println!("Tag already present");
            Ok(())
        }
        Err(TaskValidationError::EmptyTag) => Err("please enter a valid tag".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

fn cmd_untag(repo: &mut TaskRepository<SqliteSlotStore<'_>>, args: &[String]) -> Result<(), String> {
    let (id_arg, tag) = two_args(args, "untag <id> <tag>")?;
    let id = resolve_id(repo.list(), id_arg)?;
    if repo.remove_tag(id, tag) {
        println!("Removed #{tag} from {}", short_from(id));
    } else {
        println!("No such tag on that task");
    }
    Ok(())
}

fn cmd_stats(repo: &TaskRepository<SqliteSlotStore<'_>>) -> Result<(), String> {
    let totals = stats(repo.list());
    println!("Total: {}", totals.total);
    println!("Completed: {}", totals.completed);
    println!("Active: {}", totals.active);
    Ok(())
}

fn parse_draft(args: &[String]) -> Result<TaskDraft, String> {
    let mut draft = TaskDraft::default();
    let mut text: Option<String> = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--priority" => {
                let value = flag_value(&mut iter, "--priority")?;
                draft.priority = parse_priority(value)
                    .ok_or_else(|| format!("unknown priority `{value}`; expected low|medium|high"))?;
            }
            "--due" => draft.due_date = Some(flag_value(&mut iter, "--due")?.clone()),
            "--tag" => draft.tags.push(flag_value(&mut iter, "--tag")?.clone()),
            "--notes" => draft.notes = Some(flag_value(&mut iter, "--notes")?.clone()),
            other if other.starts_with("--") => return Err(format!("unknown option `{other}`")),
            other => {
                if text.is_some() {
                    return Err("expected exactly one text argument; quote the task text".to_string());
                }
                text = Some(other.to_string());
            }
        }
    }

    draft.text = text.ok_or_else(|| "missing task text".to_string())?;
    Ok(draft)
}

fn parse_list_args(args: &[String]) -> Result<(StatusFilter, SortKey, String), String> {
    let mut filter = StatusFilter::default();
    let mut sort = SortKey::default();
    let mut search = String::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--filter" => {
                let value = flag_value(&mut iter, "--filter")?;
                filter = parse_status_filter(value)
                    .ok_or_else(|| format!("unknown filter `{value}`; expected all|active|completed"))?;
            }
            "--sort" => {
                let value = flag_value(&mut iter, "--sort")?;
                sort = parse_sort_key(value)
                    .ok_or_else(|| format!("unknown sort key `{value}`; expected created|due|priority"))?;
            }
            "--search" => search = flag_value(&mut iter, "--search")?.clone(),
            other => return Err(format!("unknown option `{other}`")),
        }
    }

    Ok((filter, sort, search))
}

fn flag_value<'a>(
    iter: &mut std::slice::Iter<'a, String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn one_arg<'a>(args: &'a [String], usage: &str) -> Result<&'a str, String> {
    match args {
        [value] => Ok(value.as_str()),
        _ => Err(format!("usage: taskdeck {usage}")),
    }
}

fn two_args<'a>(args: &'a [String], usage: &str) -> Result<(&'a str, &'a str), String> {
    match args {
        [first, second] => Ok((first.as_str(), second.as_str())),
        _ => Err(format!("usage: taskdeck {usage}")),
    }
}

fn resolve_id(tasks: &[Task], needle: &str) -> Result<TaskId, String> {
    let prefix = needle.to_ascii_lowercase();
    let matches: Vec<TaskId> = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&prefix))
        .map(|task| task.id)
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no task matches id `{needle}`")),
        [id] => Ok(*id),
        _ => Err(format!(
            "id `{needle}` is ambiguous ({} matches); use more characters",
            matches.len()
        )),
    }
}

fn resolve_db_path() -> Result<PathBuf, String> {
    if let Ok(path) = env::var("TASKDECK_DB") {
        return Ok(PathBuf::from(path));
    }

    let dirs = ProjectDirs::from("", "", "taskdeck")
        .ok_or_else(|| "cannot determine a data directory; set TASKDECK_DB".to_string())?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|err| format!("cannot create `{}`: {err}", data_dir.display()))?;
    Ok(data_dir.join("taskdeck.db"))
}

fn short_id(task: &Task) -> String {
    short_from(task.id)
}

fn short_from(id: TaskId) -> String {
    let full = id.to_string();
    full.chars().take(8).collect()
}

fn render_task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {} ({}) {}",
        short_id(task),
        task.priority.as_str(),
        task.text
    );
    if let Some(due) = &task.due_date {
        line.push_str(&format!("  due:{due}"));
    }
    for tag in &task.tags {
        line.push_str(&format!("  #{tag}"));
    }
    if let Some(notes) = &task.notes {
        line.push_str(&format!("  notes: {notes}"));
    }
    line
}
