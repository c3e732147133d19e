//! Subcommand: `concierge repl` -- interactive skill session.
//!
//! Each line names a skill followed by optional JSON arguments.  After every
//! invocation the skill's context is injected and echoed, the way a live
//! session would push it to the model.

use std::io::Write as _;

use anyhow::{Context, Result};
use concierge_context::{ContextPayload, InjectionOutcome};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::helpers::render_response;
use crate::runtime::Runtime;

/// One parsed REPL line.
#[derive(Debug, PartialEq)]
pub enum ReplCommand {
    Empty,
    Help,
    Quit,
    Skills,
    Context(String),
    Invoke { skill: String, args: Option<Value> },
    Invalid(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "" => ReplCommand::Empty,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        "skills" => ReplCommand::Skills,
        "context" if rest.is_empty() => ReplCommand::Invalid("usage: context <skill>".into()),
        "context" => ReplCommand::Context(rest.to_owned()),
        skill if rest.is_empty() => ReplCommand::Invoke {
            skill: skill.to_owned(),
            args: None,
        },
        skill => match serde_json::from_str(rest) {
            Ok(args) => ReplCommand::Invoke {
                skill: skill.to_owned(),
                args: Some(args),
            },
            Err(e) => ReplCommand::Invalid(format!("arguments are not valid JSON: {e}")),
        },
    }
}

/// Run the interactive REPL.
pub async fn cmd_repl(runtime: Runtime) -> Result<()> {
    println!("Concierge REPL (agent `{}`). Type `help` for commands.", runtime.agent.agent_id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => break,
            ReplCommand::Skills => {
                for id in runtime.loader.skill_ids() {
                    println!("  {:<24} {}", id.as_str(), id.description());
                }
            }
            ReplCommand::Context(skill) => match runtime.render_context(&skill).await {
                Ok(Some(text)) if !text.is_empty() => println!("{text}"),
                Ok(_) => println!("(no context for `{skill}`)"),
                Err(e) => println!("error: {e:#}"),
            },
            ReplCommand::Invoke { skill, args } => invoke(&runtime, &skill, args).await?,
            ReplCommand::Invalid(message) => println!("error: {message}"),
        }
    }

    println!("Goodbye.");
    Ok(())
}

async fn invoke(runtime: &Runtime, skill: &str, args: Option<Value>) -> Result<()> {
    let response = match runtime.invoke(skill, args, None).await {
        Ok(response) => response,
        Err(e) => {
            println!("error: {e:#}");
            return Ok(());
        }
    };
    println!("{}", render_response(&response)?);

    let sink = |payload: ContextPayload| {
        println!("--- context ---\n{}", payload.turns);
    };
    match runtime.inject(skill, Some(&sink)).await {
        InjectionOutcome::Failed(reason) => println!("(context injection failed: {reason})"),
        outcome => debug!(skill, ?outcome, "context injection finished"),
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  <skill> [json]     invoke a skill, e.g. add-todo {{\"title\": \"Buy milk\"}}");
    println!("  context <skill>    show the context text for a skill");
    println!("  skills             list skills");
    println!("  help               show this message");
    println!("  quit               leave the REPL");
}
