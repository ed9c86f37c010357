// src/cli/mod.rs

use crate::models::{Command, CommandInvocation, MigrationAction, Profile};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Routing of an invocation to its lifecycle operation.
pub mod dispatcher;

/// stagehand: project management utilities for the managed service folder.
///
/// Every command first makes sure the virtual environment matches the
/// dependency manifest and that the migration workspace exists.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Environment type used for the service, migrations and scaffolding.
    #[arg(long = "type", global = true, default_value = "dev", value_parser = parse_service_profile)]
    pub profile: Profile,

    /// The managed folder. Overrides `folder` from the config file.
    #[arg(long, global = true)]
    pub folder: Option<PathBuf>,

    /// Path to a config file. Defaults to `stagehand.toml` if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// The subcommands, each with exactly the options it accepts.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Start the development server with auto-reload.
    Run,
    /// Run the test suite.
    Test {
        /// Only run tests matching this expression.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Install new dependencies and refresh the manifest.
    Install {
        /// One or more package names.
        #[arg(required = true, num_args = 1..)]
        dependencies: Vec<String>,
    },
    /// Build the project for production (not implemented yet).
    Build,
    /// Run database migrations.
    Migrate {
        /// The migration action to perform.
        #[arg(value_enum)]
        action: MigrationAction,

        /// How many revisions `down` reverts.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        rollback_count: u32,
    },
}

/// `--type` accepts only the service profiles; `test` is selected by the test command itself.
fn parse_service_profile(value: &str) -> Result<Profile, String> {
    match value.parse::<Profile>() {
        Ok(Profile::Test) => Err("'test' is reserved for the test command. Use 'dev' or 'prod'.".to_string()),
        Ok(profile) => Ok(profile),
        Err(_) => Err(format!("'{}' is not an environment type. Use 'dev' or 'prod'.", value)),
    }
}

impl Cli {
    /// Converts the parsed arguments into the invocation the dispatcher consumes.
    pub fn invocation(&self) -> CommandInvocation {
        let command = match &self.command {
            CliCommand::Run => Command::Run,
            CliCommand::Test { filter } => Command::Test {
                filter: filter.clone(),
            },
            CliCommand::Install { dependencies } => Command::Install {
                dependencies: dependencies.clone(),
            },
            CliCommand::Build => Command::Build,
            CliCommand::Migrate {
                action,
                rollback_count,
            } => Command::Migrate {
                action: *action,
                rollback_count: *rollback_count,
            },
        };
        CommandInvocation {
            command,
            profile: self.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("stagehand").chain(args.iter().copied()))
    }

    #[test]
    fn test_run_defaults_to_dev() {
        let cli = parse(&["run"]).unwrap();
        assert_eq!(
            cli.invocation(),
            CommandInvocation {
                command: Command::Run,
                profile: Profile::Dev
            }
        );
        assert!(cli.folder.is_none());
    }

    #[test]
    fn test_global_type_after_subcommand() {
        let cli = parse(&["run", "--type", "prod"]).unwrap();
        assert_eq!(cli.profile, Profile::Prod);
    }

    #[test]
    fn test_type_rejects_test_and_unknown() {
        assert!(parse(&["--type", "test", "run"]).is_err());
        assert!(parse(&["--type", "qa", "run"]).is_err());
    }

    #[test]
    fn test_install_requires_dependencies() {
        assert!(parse(&["install"]).is_err());
        let cli = parse(&["install", "requests", "httpx"]).unwrap();
        assert_eq!(
            cli.invocation().command,
            Command::Install {
                dependencies: vec!["requests".to_string(), "httpx".to_string()]
            }
        );
    }

    #[test]
    fn test_test_filter_optional() {
        let cli = parse(&["test"]).unwrap();
        assert_eq!(cli.invocation().command, Command::Test { filter: None });

        let cli = parse(&["test", "--filter", "login"]).unwrap();
        assert_eq!(
            cli.invocation().command,
            Command::Test {
                filter: Some("login".to_string())
            }
        );
    }

    #[test]
    fn test_migrate_action_and_rollback_count() {
        let cli = parse(&["migrate", "down", "--rollback-count", "3"]).unwrap();
        assert_eq!(
            cli.invocation().command,
            Command::Migrate {
                action: MigrationAction::Down,
                rollback_count: 3
            }
        );

        let cli = parse(&["migrate", "up"]).unwrap();
        assert_eq!(
            cli.invocation().command,
            Command::Migrate {
                action: MigrationAction::Up,
                rollback_count: 1
            }
        );
    }

    #[test]
    fn test_migrate_rejects_unknown_action_and_zero_count() {
        assert!(parse(&["migrate", "sideways"]).is_err());
        assert!(parse(&["migrate", "down", "--rollback-count", "0"]).is_err());
    }

    #[test]
    fn test_build_is_accepted() {
        let cli = parse(&["build", "--folder", "api"]).unwrap();
        assert_eq!(cli.invocation().command, Command::Build);
        assert_eq!(cli.folder, Some(PathBuf::from("api")));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
