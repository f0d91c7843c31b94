//! `pitch proposal` command implementation.

use std::path::PathBuf;

use clap::Args;
use pitch_config::Config;
use pitch_session::{GenerateRequest, SessionClient, Style, Tone};

use super::{render_document, write_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the proposal command.
///
/// Without flags, previews the fields collected for the proposal.
#[derive(Args)]
pub(crate) struct ProposalArgs {
    /// Session (proposal) ID.
    id: String,

    /// Show the latest generated proposal.
    #[arg(long, conflicts_with_all = ["style", "tone", "prompt"])]
    latest: bool,

    /// Regenerate with this writing style.
    #[arg(long, requires = "tone", conflicts_with = "prompt")]
    style: Option<Style>,

    /// Regenerate with this tone.
    #[arg(long, requires = "style", conflicts_with = "prompt")]
    tone: Option<Tone>,

    /// Regenerate from a free-form instruction.
    #[arg(long)]
    prompt: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ProposalArgs {
    /// Execute the proposal command.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails or the page cannot be written.
    pub(crate) async fn execute(self, config: &Config) -> Result<(), CliError> {
        let output = Output::new();
        let client = SessionClient::with_timeout(&config.api.base_url, config.api.timeout());

        let markdown = if self.latest {
            match client.latest_proposal(&self.id) {
                Ok(proposal) => proposal,
                Err(e) if e.is_not_found() => {
                    output.warning(&format!(
                        "No proposal has been generated for session {} yet.",
                        self.id
                    ));
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        } else if let Some(request) = self.generate_request() {
            output.info(&format!("Generating proposal for session {}...", self.id));
            client.generate_proposal(&self.id, &request)?
        } else {
            client.proposal_fields(&self.id)?.to_markdown()
        };

        let page = render_document(&markdown, config, &output).await;
        write_page(&page, self.output.as_deref(), &output)
    }

    /// Requested regeneration, if any.
    fn generate_request(&self) -> Option<GenerateRequest> {
        match (&self.prompt, self.style, self.tone) {
            (Some(prompt), _, _) => Some(GenerateRequest::Prompt(prompt.clone())),
            (None, Some(style), Some(tone)) => Some(GenerateRequest::Styled { style, tone }),
            _ => None,
        }
    }
}
