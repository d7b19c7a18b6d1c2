//! Request and response bodies for `comments:analyze`, plus the seven
//! attributes this crate asks for.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ytwatch_core::NOT_AVAILABLE;

/// A score dimension requested from the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Toxicity,
    SevereToxicity,
    Insult,
    SexuallyExplicit,
    Profanity,
    Threat,
    Flirtation,
}

impl Attribute {
    /// Every requested attribute, in output column order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Toxicity,
        Attribute::SevereToxicity,
        Attribute::Insult,
        Attribute::SexuallyExplicit,
        Attribute::Profanity,
        Attribute::Threat,
        Attribute::Flirtation,
    ];

    /// Name used in the API request and response maps.
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Toxicity => "TOXICITY",
            Self::SevereToxicity => "SEVERE_TOXICITY",
            Self::Insult => "INSULT",
            Self::SexuallyExplicit => "SEXUALLY_EXPLICIT",
            Self::Profanity => "PROFANITY",
            Self::Threat => "THREAT",
            Self::Flirtation => "FLIRTATION",
        }
    }

    /// Header of the CSV column holding this attribute's score.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Toxicity => "toxicity_score",
            Self::SevereToxicity => "severe_toxicity_score",
            Self::Insult => "insult_score",
            Self::SexuallyExplicit => "sexually_explicit_score",
            Self::Profanity => "profanity_score",
            Self::Threat => "threat_score",
            Self::Flirtation => "flirtation_score",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Score columns appended to the comment table, in [`Attribute::ALL`] order.
#[must_use]
pub fn score_columns() -> Vec<&'static str> {
    Attribute::ALL.iter().map(|a| a.column()).collect()
}

/// The seven summary scores for one comment. Missing entries are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttributeScores {
    values: [Option<f64>; 7],
}

impl AttributeScores {
    /// All seven scores unavailable; used for skipped or failed rows.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.values[attribute.index()]
    }

    pub fn set(&mut self, attribute: Attribute, value: f64) {
        self.values[attribute.index()] = Some(value);
    }

    /// Renders the scores as CSV cells, writing `N/A` for gaps.
    #[must_use]
    pub fn to_cells(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| v.map_or_else(|| NOT_AVAILABLE.to_owned(), |s| s.to_string()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeRequest<'a> {
    pub comment: TextEntry<'a>,
    pub requested_attributes: HashMap<&'static str, EmptyConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextEntry<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmptyConfig {}

impl<'a> AnalyzeRequest<'a> {
    pub(crate) fn for_text(text: &'a str) -> Self {
        Self {
            comment: TextEntry { text },
            requested_attributes: Attribute::ALL
                .iter()
                .map(|a| (a.api_name(), EmptyConfig {}))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeResponse {
    #[serde(default)]
    pub attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttributeScore {
    #[serde(default)]
    pub summary_score: Option<SummaryScore>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryScore {
    pub value: Option<f64>,
}

impl AnalyzeResponse {
    pub(crate) fn into_scores(self) -> AttributeScores {
        let mut scores = AttributeScores::unavailable();
        for attribute in Attribute::ALL {
            if let Some(value) = self
                .attribute_scores
                .get(attribute.api_name())
                .and_then(|s| s.summary_score.as_ref())
                .and_then(|s| s.value)
            {
                scores.set(attribute, value);
            }
        }
        scores
    }
}

/// Google API error body: `{"error": {"code", "message", "status", "errors": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}

impl ErrorBody {
    /// The most specific reason available: the first detail reason, then
    /// the status name.
    pub(crate) fn reason(&self) -> Option<&str> {
        self.errors
            .iter()
            .map(|d| d.reason.as_str())
            .chain(std::iter::once(self.status.as_str()))
            .find(|r| !r.is_empty())
    }
}
