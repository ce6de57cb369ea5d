//! Instruction templates for the canned analyses.

use snafu::Snafu;
use std::{fmt, str::FromStr};

/// Which input channel is active, and so which request shape is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    #[default]
    Transcript,
    Video,
}

impl AnalysisMode {
    /// The word naming the source material inside a prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Transcript => "transcript",
            AnalysisMode::Video => "video",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analysis to run on the source material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Summary,
    KeyTopics,
    Sentiment,
    /// User-supplied instruction
    Custom,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Summary => "summary",
            AnalysisKind::KeyTopics => "key_topics",
            AnalysisKind::Sentiment => "sentiment",
            AnalysisKind::Custom => "custom",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("unknown analysis kind '{value}'; expected summary, key_topics, sentiment or custom"))]
pub struct UnknownKindError {
    value: String,
}

impl FromStr for AnalysisKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(AnalysisKind::Summary),
            "key_topics" | "key-topics" => Ok(AnalysisKind::KeyTopics),
            "sentiment" => Ok(AnalysisKind::Sentiment),
            "custom" => Ok(AnalysisKind::Custom),
            _ => UnknownKindSnafu { value: s }.fail(),
        }
    }
}

/// Build the instruction for `kind`, naming the source material after `mode`.
///
/// `Custom` returns `custom` untouched; callers validate it is non-empty.
pub fn build_prompt(kind: AnalysisKind, mode: AnalysisMode, custom: Option<&str>) -> String {
    let target = mode.as_str();
    match kind {
        AnalysisKind::Summary => format!(
            "Provide a concise, easy-to-read summary of the following YouTube {target}. \
             The summary should capture the main points and key takeaways in a few bullet \
             points or a short paragraph."
        ),
        AnalysisKind::KeyTopics => format!(
            "List the key topics and main ideas discussed in the following YouTube {target}. \
             Use a clear, structured format like bullet points."
        ),
        AnalysisKind::Sentiment => format!(
            "Analyze the sentiment of the following YouTube {target}. Describe the overall \
             tone (e.g., positive, negative, neutral, enthusiastic, critical) and identify any \
             significant shifts in sentiment. Provide specific examples or quotes to support \
             your analysis."
        ),
        AnalysisKind::Custom => custom.unwrap_or_default().to_string(),
    }
}

/// Append the transcript to an instruction, behind a fixed delimiter.
pub fn compose_transcript_prompt(instruction: &str, transcript: &str) -> String {
    format!("{instruction}\n\n---\n\nTRANSCRIPT:\n\n{transcript}")
}
