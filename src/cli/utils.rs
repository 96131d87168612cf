use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::navigation::NavigationError;
use crate::session::StorageWarning;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a collection: JSON array under `collection_name`, or one text line per item
pub fn output_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    items: Value,
    lines: Vec<String>,
    empty_message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: items
            }))?);
        }
        OutputFormat::Text if lines.is_empty() => {
            println!("{}", empty_message);
        }
        OutputFormat::Text => {
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Storage warnings never fail a command; they are only reported
pub fn output_warnings(output_format: &OutputFormat, warnings: &[StorageWarning]) {
    if matches!(output_format, OutputFormat::Text) {
        for warning in warnings {
            eprintln!("Warning: could not persist '{}': {}", warning.key, warning.message);
        }
    }
}

/// Machine-readable code for errors this crate knows about
pub fn error_code(error: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = error.downcast_ref::<ClientError>() {
        return Some(e.error_code());
    }
    error.downcast_ref::<NavigationError>().map(|e| match e {
        NavigationError::NotFound(_) => "ROUTE_NOT_FOUND",
        NavigationError::TooManyRedirects { .. } => "TOO_MANY_REDIRECTS",
        NavigationError::Route(_) => "ROUTE_ERROR",
    })
}
