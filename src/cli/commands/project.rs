use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::app::ClientApp;
use crate::cli::utils::output_collection;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List projects from the remote")]
    List,

    #[command(about = "List sprints of a project")]
    Sprints {
        #[arg(help = "Project id")]
        project: u64,

        #[arg(long, help = "Only sprints running right now")]
        active: bool,
    },
}

pub async fn handle(cmd: ProjectCommands, app: &mut ClientApp, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProjectCommands::List => {
            app.refresh_projects().await?;

            let lines = app
                .projects
                .iter()
                .map(|p| format!("#{:<5} {}", p.id, p.name))
                .collect();
            output_collection(output_format, "projects", json!(app.projects.all()), lines, "No projects found")
        }
        ProjectCommands::Sprints { project, active } => {
            app.refresh_sprints().await?;

            let sprints = if active {
                app.sprints.active_sprints(project, Utc::now())
            } else {
                app.sprints.sprints_for_project(project)
            };
            let lines = sprints.iter().map(|s| format!("#{:<5} {}", s.id, s.name)).collect();
            output_collection(output_format, "sprints", json!(sprints), lines, "No sprints found")
        }
    }
}
