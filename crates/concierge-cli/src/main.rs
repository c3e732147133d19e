//! Concierge CLI entry point.
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

mod cli;
mod helpers;
mod repl;
mod runtime;

use anyhow::{Context, Result};
use clap::Parser;
use concierge_context::InjectionOutcome;
use concierge_skills::SkillId;
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::helpers::{init_tracing, load_agent_config, parse_json_arg, render_response};
use crate::runtime::Runtime;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let agent = load_agent_config(cli.config)?;
    let runtime = Runtime::new(agent).with_user(cli.user);

    match cli.command {
        Commands::Skills { json } => cmd_skills(&runtime, json),
        Commands::Invoke {
            skill,
            args,
            data,
            inject,
        } => cmd_invoke(&runtime, &skill, args.as_deref(), data.as_deref(), inject).await,
        Commands::Context { skill } => cmd_context(&runtime, &skill).await,
        Commands::Repl => repl::cmd_repl(runtime).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn cmd_skills(runtime: &Runtime, json: bool) -> Result<()> {
    if json {
        let mut tools = Vec::new();
        for id in runtime.loader.skill_ids() {
            let descriptor = runtime
                .loader
                .resolve(id)
                .with_context(|| format!("skill `{id}` failed to resolve"))?;
            tools.push(descriptor.tool_definition());
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&tools).context("failed to serialize tools")?
        );
        return Ok(());
    }

    println!("{:<24} {:<16} DESCRIPTION", "SKILL", "VIEW");
    for id in SkillId::ALL {
        let view = runtime
            .loader
            .ui_override(id)
            .map(str::to_owned)
            .unwrap_or_else(|| id.as_str().to_owned());
        let status = match runtime.loader.resolve(id) {
            Ok(_) => id.description().to_owned(),
            Err(e) => format!("unavailable: {e}"),
        };
        println!("{:<24} {:<16} {}", id.as_str(), view, status);
    }
    Ok(())
}

async fn cmd_invoke(
    runtime: &Runtime,
    skill: &str,
    args: Option<&str>,
    data: Option<&str>,
    inject: bool,
) -> Result<()> {
    let args = parse_json_arg("args", args)?;
    let data = parse_json_arg("data", data)?;

    let response = runtime.invoke(skill, args, data).await?;
    info!(skill, success = response.success, "skill invoked");
    println!("{}", render_response(&response)?);

    if inject {
        let sink = |payload: concierge_context::ContextPayload| {
            println!("\n--- context ---\n{}", payload.turns);
        };
        if let InjectionOutcome::Failed(reason) = runtime.inject(skill, Some(&sink)).await {
            eprintln!("context injection failed: {reason}");
        }
    }
    Ok(())
}

async fn cmd_context(runtime: &Runtime, skill: &str) -> Result<()> {
    match runtime.render_context(skill).await? {
        Some(text) if !text.is_empty() => println!("{text}"),
        Some(_) => println!("(context for `{skill}` is empty)"),
        None => println!("(no context provider for `{skill}`)"),
    }
    Ok(())
}
