use std::path::PathBuf;

use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum TemplateCommands {
    /// Import a questionnaire template from a JSON file.
    Import { file: PathBuf },
    /// List templates by name.
    List,
}
