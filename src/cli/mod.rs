//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use console::style;

use crate::domain::errors::RagError;

/// JSON body for a failed command: the error chain and its stable status
pub fn error_body(err: &anyhow::Error) -> serde_json::Value {
    let status = err.downcast_ref::<RagError>().map(RagError::status);
    serde_json::json!({
        "error": format!("{err:#}"),
        "status": status,
    })
}

/// Print an error to stderr, as JSON when `json` is set.
pub fn report_error(err: &anyhow::Error, json: bool) {
    if json {
        eprintln!("{}", serde_json::to_string_pretty(&error_body(err)).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("error:").red().bold());
        if let Some(RagError::RetrievalEmpty) = err.downcast_ref::<RagError>() {
            eprintln!("{}", style("hint: load the document again with --document").dim());
        }
    }
}

/// Report a failed command and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    report_error(&err, json);
    std::process::exit(1)
}
