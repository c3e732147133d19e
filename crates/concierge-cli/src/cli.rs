//! CLI argument definitions for Concierge.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Concierge -- skills and context injection for a hospitality agent.
#[derive(Parser)]
#[command(
    name = "concierge",
    version,
    about = "Concierge -- agent skills and context injection",
    long_about = "Invoke the concierge agent's skills (todos, calendar, menu, wellness) \
                  and preview the context text injected into the conversation."
)]
pub struct Cli {
    /// Agent config file.  Falls back to `$CONCIERGE_CONFIG`, then
    /// `config/default.toml`.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Guest the skills act for.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered skills.
    Skills {
        /// Print tool definitions as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Invoke one skill and print its response envelope.
    Invoke {
        /// Skill id, e.g. `add-todo`.
        skill: String,

        /// Arguments as a JSON object.
        #[arg(long, short)]
        args: Option<String>,

        /// Skill-scoped data as JSON.  Overrides the configured data files.
        #[arg(long)]
        data: Option<String>,

        /// Also run context injection for the skill and print the result.
        #[arg(long)]
        inject: bool,
    },

    /// Print the context text a skill would inject.
    Context {
        /// Skill id, e.g. `show-menu`.
        skill: String,
    },

    /// Start an interactive session against in-memory stores.
    Repl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_invoke_with_global_config() {
        let cli = Cli::try_parse_from([
            "concierge",
            "invoke",
            "add-todo",
            "--args",
            r#"{"title":"Buy milk"}"#,
            "--config",
            "agent.toml",
            "--user",
            "guest-7",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("agent.toml")));
        assert_eq!(cli.user.as_deref(), Some("guest-7"));
        match cli.command {
            Commands::Invoke {
                skill, args, inject, ..
            } => {
                assert_eq!(skill, "add-todo");
                assert_eq!(args.as_deref(), Some(r#"{"title":"Buy milk"}"#));
                assert!(!inject);
            }
            _ => panic!("expected invoke"),
        }
    }
}
