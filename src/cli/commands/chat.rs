use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::ask::AnswerOutput;
use crate::cli::output::progress::create_spinner;
use crate::cli::output::CommandOutput;
use crate::cli::report_error;
use crate::domain::models::{Config, ConversationMessage, QueryRequest};
use crate::services::Orchestrator;

const HELP: &str = "Commands: /load <path>  /general  /document  /clear  /help  /exit";

/// A line typed at the prompt
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Ask(&'a str),
    Load(&'a str),
    General,
    Document,
    Clear,
    Help,
    Exit,
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some(("/load", path)) => Input::Load(path.trim()),
        _ => match line {
            "" => Input::Empty,
            "/exit" | "/quit" => Input::Exit,
            "/clear" => Input::Clear,
            "/general" => Input::General,
            "/document" => Input::Document,
            "/help" => Input::Help,
            question => Input::Ask(question),
        },
    }
}

/// Handle chat command
///
/// History lives here, on the caller side, and is sent with every query.
pub async fn execute(config: &Config, document: Option<PathBuf>, json: bool) -> Result<()> {
    let orchestrator = super::build_orchestrator(config)?;

    let mut document_mode = false;
    if let Some(path) = document {
        super::load_document(&orchestrator, &path, json).await?;
        document_mode = true;
    }

    if !json {
        eprintln!("{}", style(HELP).dim());
    }

    let mut history: Vec<ConversationMessage> = Vec::new();
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        if !json {
            let mode = if document_mode { "doc" } else { "chat" };
            let mut stderr = io::stderr();
            stderr
                .write_all(format!("{} ", style(format!("{mode}>")).cyan().bold()).as_bytes())
                .await?;
            stderr.flush().await?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse_input(&line) {
            Input::Exit => break,
            Input::Empty => {}
            Input::Help => eprintln!("{HELP}"),
            Input::Clear => {
                history.clear();
                eprintln!("{}", style("history cleared").dim());
            }
            Input::General => document_mode = false,
            Input::Document => document_mode = true,
            Input::Load(path) => {
                if let Err(e) = super::load_document(&orchestrator, Path::new(path), json).await {
                    report_error(&e, json);
                } else {
                    history.clear();
                    document_mode = true;
                }
            }
            Input::Ask(question) => {
                ask(&orchestrator, question, document_mode, &mut history, json).await;
            }
        }
    }

    Ok(())
}

async fn ask(
    orchestrator: &Orchestrator,
    question: &str,
    document_mode: bool,
    history: &mut Vec<ConversationMessage>,
    json: bool,
) {
    let request = QueryRequest {
        message: question.to_string(),
        history: history.clone(),
        is_pdf_mode: document_mode,
    };

    let spinner = create_spinner("Thinking...", json);
    let result = orchestrator.query(request).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            history.push(ConversationMessage::user(question));
            history.push(
                ConversationMessage::assistant(answer.response.clone())
                    .with_context(answer.context.clone()),
            );

            let out = AnswerOutput::new(answer, document_mode);
            if json {
                println!("{}", out.to_json());
            } else {
                println!("{}\n", out.to_human());
            }
        }
        Err(e) => report_error(&anyhow::Error::from(e), json),
    }
}
