//! `pitch render` command implementation.

use std::path::PathBuf;

use clap::Args;
use pitch_config::Config;

use super::{render_document, write_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the page cannot be written.
    pub(crate) async fn execute(self, config: &Config) -> Result<(), CliError> {
        let output = Output::new();

        let markdown = std::fs::read_to_string(&self.file)?;
        output.info(&format!("Rendering {}...", self.file.display()));

        let page = render_document(&markdown, config, &output).await;
        write_page(&page, self.output.as_deref(), &output)
    }
}
