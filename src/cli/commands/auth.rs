use std::io::BufRead;

use clap::Subcommand;
use serde_json::json;

use crate::app::ClientApp;
use crate::cli::utils::{output_success, output_warnings};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the remote service")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, app: &mut ClientApp, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };

            let (user, warnings) = app.login(&username, &password).await?;
            output_warnings(output_format, &warnings);
            output_success(
                output_format,
                &format!("Logged in as {}", user.username),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            let warnings = app.logout();
            output_warnings(output_format, &warnings);
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Status => match app.session.current_user() {
            Some(user) => output_success(
                output_format,
                &format!("Authenticated as {}", user.username),
                Some(json!({ "authenticated": true, "user": user })),
            ),
            None => output_success(
                output_format,
                "Not authenticated",
                Some(json!({ "authenticated": false })),
            ),
        },
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password is required");
    }
    Ok(password)
}
