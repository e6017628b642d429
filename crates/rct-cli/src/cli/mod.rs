use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `rct` binary.
#[derive(Debug, Parser)]
#[command(name = "rct", version, about = "RCT clinical data capture")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file, overriding `database.path`
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            database: self.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::subcommands::{ParticipantCommands, StudyCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_wearable_data_defaults_to_one_hundred_samples() {
        let cli = Cli::try_parse_from(["rct", "add-wearable-data", "7"]).expect("cli should parse");
        let Commands::AddWearableData(args) = cli.command else {
            panic!("expected add-wearable-data");
        };
        assert_eq!(args.participant_pk, 7);
        assert_eq!(args.count, 100);
    }

    #[test]
    fn add_wearable_data_accepts_count() {
        let cli = Cli::try_parse_from(["rct", "add-wearable-data", "7", "--count", "12"])
            .expect("cli should parse");
        let Commands::AddWearableData(args) = cli.command else {
            panic!("expected add-wearable-data");
        };
        assert_eq!(args.count, 12);
    }

    #[test]
    fn add_wearable_data_rejects_non_numeric_participant() {
        assert!(Cli::try_parse_from(["rct", "add-wearable-data", "DG-1-0001"]).is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rct",
            "study",
            "list",
            "--format",
            "table",
            "--database",
            "/tmp/trial.db",
            "--quiet",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.quiet);
        assert_eq!(cli.global_flags().database.as_deref(), Some("/tmp/trial.db"));
        assert!(matches!(
            cli.command,
            Commands::Study {
                action: StudyCommands::List
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["rct", "--format", "xml", "study", "list"]).is_err());
    }

    #[test]
    fn participant_add_takes_optional_group_and_code() {
        let cli = Cli::try_parse_from([
            "rct",
            "participant",
            "add",
            "--study",
            "1",
            "--dob",
            "1950-03-14",
            "--gender",
            "female",
            "--group",
            "Intervention",
        ])
        .expect("cli should parse");
        let Commands::Participant {
            action:
                ParticipantCommands::Add {
                    study,
                    group,
                    code,
                    ..
                },
        } = cli.command
        else {
            panic!("expected participant add");
        };
        assert_eq!(study, 1);
        assert_eq!(group.as_deref(), Some("Intervention"));
        assert_eq!(code, None);
    }

    #[test]
    fn serve_accepts_bind_override() {
        let cli = Cli::try_parse_from(["rct", "serve", "--bind", "0.0.0.0:9000"])
            .expect("cli should parse");
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000"));
    }
}
