//! Kroki diagram rendering over HTTP.
//!
//! Sends Mermaid source to `POST {server_url}/mermaid/svg` and returns the
//! SVG body. Error responses carry Kroki's own message (for Mermaid this is
//! the parser error), which becomes the slot's visible failure text.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::backend::{DiagramBackend, DiagramError, DiagramErrorKind};
use crate::consts::{DEFAULT_TIMEOUT, RENDER_FORMAT};
use crate::language::DiagramLanguage;

/// Create HTTP agent with the specified timeout.
///
/// Status codes are inspected by hand so error bodies can be read.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`DiagramBackend`] backed by a Kroki server.
pub struct KrokiBackend {
    agent: Agent,
    server_url: String,
}

impl KrokiBackend {
    /// Create a backend for the Kroki server at `server_url`.
    #[must_use]
    pub fn new(server_url: &str) -> Self {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    /// Create a backend with a custom request timeout.
    #[must_use]
    pub fn with_timeout(server_url: &str, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            server_url: server_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl DiagramBackend for KrokiBackend {
    fn render_svg(
        &self,
        render_id: &str,
        language: DiagramLanguage,
        source: &str,
    ) -> Result<String, DiagramError> {
        let endpoint = language.kroki_endpoint();
        let url = format!("{}/{endpoint}/{RENDER_FORMAT}", self.server_url);
        debug!(render_id, url = %url, "rendering diagram");

        let error = |kind| DiagramError {
            render_id: render_id.to_owned(),
            kind,
        };

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| error(DiagramErrorKind::Http(e.to_string())))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            let error_body = error_body.trim();
            let kind = match status {
                // Kroki answers 400 for diagrams it cannot parse
                400 if !error_body.is_empty() => DiagramErrorKind::Render(error_body.to_owned()),
                400 => DiagramErrorKind::Render(format!("HTTP {status}")),
                _ => DiagramErrorKind::Http(format!("HTTP {status}: {error_body}")),
            };
            return Err(error(kind));
        }

        let svg = body
            .read_to_string()
            .map_err(|e| error(DiagramErrorKind::Io(e.to_string())))?;
        if !svg.contains("<svg") {
            return Err(error(DiagramErrorKind::Render(
                "backend returned no SVG".to_owned(),
            )));
        }
        Ok(svg)
    }
}
