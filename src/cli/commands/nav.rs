use serde_json::json;

use crate::app::ClientApp;
use crate::cli::utils::{output_collection, output_success};
use crate::cli::OutputFormat;
use crate::navigation::NavigationDecision;

pub fn navigate(path: &str, app: &mut ClientApp, output_format: &OutputFormat) -> anyhow::Result<()> {
    let outcome = app.navigate(path)?;

    let message = match outcome.decision {
        NavigationDecision::Allowed => format!("{} → {}", path, outcome.location.route),
        NavigationDecision::RedirectToLogin | NavigationDecision::RedirectToHome => format!(
            "{} redirected ({:?}) → {} ({})",
            path, outcome.decision, outcome.location.route, outcome.location.path
        ),
    };

    output_success(output_format, &message, Some(json!({ "navigation": outcome })))?;

    if matches!(output_format, OutputFormat::Text) {
        for (name, value) in &outcome.location.params {
            println!("  :{} = {}", name, value);
        }
    }
    Ok(())
}

pub fn routes(app: &ClientApp, output_format: &OutputFormat) -> anyhow::Result<()> {
    let routes = app.navigation.table().routes();

    let items = routes
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "path": r.path.as_str(),
                "requires_auth": r.requires_auth,
                "view": r.view,
            })
        })
        .collect::<Vec<_>>();

    let lines = routes
        .iter()
        .map(|r| {
            format!(
                "{:<16} {:<42} {}",
                r.name,
                r.path.as_str(),
                if r.requires_auth { "auth" } else { "public" }
            )
        })
        .collect();

    output_collection(output_format, "routes", json!(items), lines, "No routes registered")
}
