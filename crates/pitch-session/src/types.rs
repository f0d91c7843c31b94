//! Request and response types of the proposal backend.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Writing style for proposal generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Formal,
    Concise,
    Technical,
    Creative,
    Storytelling,
}

/// Tone for proposal generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Authoritative,
    Enthusiastic,
    Urgent,
}

/// Unknown style or tone name.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: String,
}

macro_rules! named_options {
    ($ty:ident, $kind:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            /// Every accepted value, in menu order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ParseOptionError {
                        kind: $kind,
                        value: s.to_owned(),
                        expected: [$($name),+].join(", "),
                    }),
                }
            }
        }
    };
}

named_options!(Style, "style", [
    Formal => "formal",
    Concise => "concise",
    Technical => "technical",
    Creative => "creative",
    Storytelling => "storytelling",
]);

named_options!(Tone, "tone", [
    Professional => "professional",
    Friendly => "friendly",
    Authoritative => "authoritative",
    Enthusiastic => "enthusiastic",
    Urgent => "urgent",
]);

/// How to (re)generate a proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateRequest {
    /// Regenerate with a preset style and tone.
    Styled { style: Style, tone: Tone },
    /// Regenerate from a free-form instruction.
    Prompt(String),
}

/// Body of `POST /proposal/{id}/generate`.
#[derive(Serialize)]
pub(crate) struct StyledBody {
    pub(crate) style: Style,
    pub(crate) tone: Tone,
}

/// Body of `POST /proposal/{id}/custom_prompt`.
#[derive(Serialize)]
pub(crate) struct PromptBody<'a> {
    pub(crate) prompt: &'a str,
}

/// Body of `POST /continue_proposal/{id}`.
#[derive(Serialize)]
pub(crate) struct AnswerBody<'a> {
    pub(crate) response: &'a str,
}

/// Response of `POST /start_proposal`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SessionStart {
    pub session_id: String,
    /// First question of the interview.
    pub question: String,
}

/// Response carrying generated proposal text.
#[derive(Deserialize)]
pub(crate) struct ProposalBody {
    pub(crate) proposal: String,
}

/// Structured proposal data collected during the interview.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProposalFields {
    pub client_name: String,
    pub project_title: String,
    pub problem_statement: String,
    pub proposed_solution: String,
    #[serde(default)]
    pub previous_experience: Option<String>,
    pub objectives: String,
    pub implementation_plan: String,
    pub benefits: String,
    pub timeline: String,
    #[serde(default)]
    pub budget: Option<String>,
    pub deliverables: String,
    pub technologies: String,
    #[serde(default)]
    pub project_goals: Option<String>,
}

impl ProposalFields {
    /// Markdown preview of the collected fields.
    ///
    /// The project title becomes the H1; every non-empty field becomes a
    /// section. Field values are markdown already and are emitted as is.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        writeln!(out, "# {}\n", self.project_title.trim()).unwrap();

        let sections: [(&str, Option<&str>); 12] = [
            ("Client", Some(self.client_name.as_str())),
            ("Problem Statement", Some(self.problem_statement.as_str())),
            ("Proposed Solution", Some(self.proposed_solution.as_str())),
            ("Objectives", Some(self.objectives.as_str())),
            ("Project Goals", self.project_goals.as_deref()),
            ("Implementation Plan", Some(self.implementation_plan.as_str())),
            ("Benefits", Some(self.benefits.as_str())),
            ("Previous Experience", self.previous_experience.as_deref()),
            ("Technologies", Some(self.technologies.as_str())),
            ("Deliverables", Some(self.deliverables.as_str())),
            ("Timeline", Some(self.timeline.as_str())),
            ("Budget", self.budget.as_deref()),
        ];

        for (heading, value) in sections {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            writeln!(out, "## {heading}\n\n{value}\n").unwrap();
        }
        out
    }
}
