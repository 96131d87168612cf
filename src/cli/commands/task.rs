use clap::Subcommand;
use serde_json::json;

use crate::app::ClientApp;
use crate::cli::utils::{output_collection, output_success};
use crate::cli::OutputFormat;
use crate::store::{Task, TaskStatus, TaskStore};

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List tasks from the remote")]
    List {
        #[arg(long, help = "Only tasks in this project")]
        project: Option<u64>,
        #[arg(long, help = "Only tasks in this sprint")]
        sprint: Option<u64>,
        #[arg(long, help = "Only tasks with this status")]
        status: Option<TaskStatus>,
    },

    #[command(about = "Create a task")]
    Add {
        #[arg(help = "Task title")]
        title: String,
        #[arg(long, help = "Task id (defaults to the next free id)")]
        id: Option<u64>,
        #[arg(long)]
        project: Option<u64>,
        #[arg(long)]
        sprint: Option<u64>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    #[command(about = "Replace fields of an existing task")]
    Update {
        #[arg(help = "Task id")]
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        assignee: Option<String>,
    },

    #[command(about = "Delete a task")]
    Delete {
        #[arg(help = "Task id")]
        id: u64,
    },
}

pub async fn handle(cmd: TaskCommands, app: &mut ClientApp, output_format: &OutputFormat) -> anyhow::Result<()> {
    // The store is memory-only; every command starts from the remote's view
    app.refresh_tasks().await?;

    match cmd {
        TaskCommands::List { project, sprint, status } => {
            let tasks = app.tasks.find_by(|t| {
                project.map_or(true, |p| t.project_id == Some(p))
                    && sprint.map_or(true, |s| t.sprint_id == Some(s))
                    && status.map_or(true, |s| t.status == s)
            });

            let lines = tasks.iter().map(|t| describe(t)).collect();
            output_collection(output_format, "tasks", json!(tasks), lines, "No tasks found")
        }
        TaskCommands::Add { title, id, project, sprint, assignee, status } => {
            let id = match id {
                Some(id) => id,
                None => next_task_id(&app.tasks)?,
            };
            let mut task = Task::new(id, title);
            task.project_id = project;
            task.sprint_id = sprint;
            task.assignee = assignee;
            task.status = status.unwrap_or_default();

            let outcome = app.add_task(task).await;
            report(output_format, &format!("Task {} created", id), outcome.remote)
        }
        TaskCommands::Update { id, title, status, assignee } => {
            let Some(mut task) = app.tasks.get(&id).cloned() else {
                anyhow::bail!("Task {} not found", id);
            };
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(status) = status {
                task.status = status;
            }
            if assignee.is_some() {
                task.assignee = assignee;
            }

            let outcome = app.update_task(task).await;
            report(output_format, &format!("Task {} updated", id), outcome.remote)
        }
        TaskCommands::Delete { id } => {
            let outcome = app.delete_task(id).await;
            if outcome.local == 0 {
                tracing::info!(id, "task was not in the local store");
            }
            report(output_format, &format!("Task {} deleted", id), outcome.remote)
        }
    }
}

/// One past the largest known id
fn next_task_id(tasks: &TaskStore) -> anyhow::Result<u64> {
    let max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| anyhow::anyhow!("Task id space exhausted; pass --id explicitly"))
}

fn describe(task: &Task) -> String {
    let assignee = task.assignee.as_deref().unwrap_or("-");
    format!("#{:<5} [{:<11}] {} ({})", task.id, task.status, task.title, assignee)
}

fn report<R: serde::Serialize>(
    output_format: &OutputFormat,
    message: &str,
    remote: Result<R, crate::error::ClientError>,
) -> anyhow::Result<()> {
    match remote {
        Ok(record) => output_success(output_format, message, Some(json!({ "record": record }))),
        Err(e) => {
            tracing::warn!("{} locally, remote failed", message);
            Err(e.into())
        }
    }
}
