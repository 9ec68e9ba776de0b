use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::cli::output::progress::create_spinner;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ConnectionState};

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub endpoint: String,
    pub state: ConnectionState,
    pub model: Option<String>,
    pub error: Option<String>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let state = match self.state {
            ConnectionState::Connected => style(self.state.to_string()).green().bold(),
            ConnectionState::Failed => style(self.state.to_string()).red().bold(),
            _ => style(self.state.to_string()).yellow(),
        };

        let mut lines = vec![
            format!("Endpoint: {}", self.endpoint),
            format!("State:    {state}"),
        ];
        if let Some(model) = &self.model {
            lines.push(format!("Model:    {model}"));
        }
        if let Some(error) = &self.error {
            lines.push(format!("Error:    {error}"));
        }
        lines.join("\n")
    }
}

/// Handle status command
///
/// Reports the outcome of a connection check; a failed check is output, not
/// an error.
pub async fn execute(config: &Config, json: bool) -> Result<()> {
    let client = super::build_client(config)?;

    let spinner = create_spinner(format!("Connecting to {}...", client.endpoint()), json);
    let check = client.check_connection().await;
    spinner.finish_and_clear();

    let result = StatusOutput {
        endpoint: client.endpoint().to_string(),
        state: client.connection_state().await,
        model: check.as_ref().ok().cloned(),
        error: check.err().map(|e| e.to_string()),
    };

    output(&result, json);
    Ok(())
}
