use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::progress::create_spinner;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, QueryRequest, QueryResponse};

#[derive(Debug, Serialize)]
pub struct AnswerOutput {
    pub response: String,
    pub context: Vec<String>,
    pub document_mode: bool,
}

impl AnswerOutput {
    pub fn new(answer: QueryResponse, document_mode: bool) -> Self {
        Self {
            response: answer.response,
            context: answer.context,
            document_mode,
        }
    }
}

impl CommandOutput for AnswerOutput {
    fn to_human(&self) -> String {
        let mut out = self.response.trim().to_string();
        if !self.context.is_empty() {
            out.push_str(&format!("\n\n{}", style("Sources:").dim().bold()));
            for (i, excerpt) in self.context.iter().enumerate() {
                let flat = excerpt.split_whitespace().collect::<Vec<_>>().join(" ");
                out.push_str(&format!(
                    "\n{}",
                    style(format!("  [{}] {}", i + 1, truncate(&flat, 100))).dim()
                ));
            }
        }
        out
    }
}

/// Handle ask command
pub async fn execute(
    config: &Config,
    question: String,
    document: Option<PathBuf>,
    general: bool,
    json: bool,
) -> Result<()> {
    let orchestrator = super::build_orchestrator(config)?;

    let request = if general {
        QueryRequest::general(question)
    } else {
        let path = document.context("--document is required unless --general is set")?;
        super::load_document(&orchestrator, &path, json).await?;
        QueryRequest::document(question)
    };

    let document_mode = request.is_pdf_mode;
    let spinner = create_spinner("Thinking...", json);
    let answer = orchestrator.query(request).await;
    spinner.finish_and_clear();

    output(&AnswerOutput::new(answer?, document_mode), json);
    Ok(())
}
