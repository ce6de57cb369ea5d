//! Drives one analysis at a time from the user's inputs to a displayable outcome.
//!
//! The orchestrator owns the observable state a front end renders: the active
//! mode, the inputs, the last result, the last error message and a loading flag.
//! [`Orchestrator::analyze`] takes `&mut self`, so a second request cannot start
//! while one is in flight.

use snafu::Snafu;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    analysis::{Analyzer, RequestPayload},
    media::{self, VideoFile},
    prompt::{build_prompt, compose_transcript_prompt, AnalysisKind, AnalysisMode},
};

/// Missing input for the selected mode or kind. Never reaches the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ValidationError {
    #[snafu(display("Please paste a transcript first."))]
    MissingTranscript,

    #[snafu(display("Please upload a video file first."))]
    MissingVideo,

    #[snafu(display("Please enter a custom prompt to continue."))]
    MissingCustomPrompt,
}

/// Where the orchestrator is in handling a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    /// Validation failed; no request was sent.
    Rejected,
    Building,
    Calling,
    Succeeded,
    Failed,
}

/// Final result of one request, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Success(String),
    Failure(String),
}

/// Everything needed to dispatch one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    pub kind: AnalysisKind,
    pub transcript: Option<String>,
    pub video: Option<VideoFile>,
    pub custom_prompt: Option<String>,
}

impl AnalysisRequest {
    /// Check that the input for the selected mode, and the custom prompt when
    /// needed, are present and not blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.mode {
            AnalysisMode::Transcript if is_blank(self.transcript.as_deref()) => {
                return MissingTranscriptSnafu.fail()
            }
            AnalysisMode::Video if self.video.is_none() => return MissingVideoSnafu.fail(),
            _ => {}
        }
        if self.kind == AnalysisKind::Custom && is_blank(self.custom_prompt.as_deref()) {
            return MissingCustomPromptSnafu.fail();
        }
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// `summary` is shown as is; the errors from `cause` down are appended so the
/// underlying reason (e.g. a timeout) is visible.
fn failure_message(summary: &str, cause: Option<&(dyn Error + 'static)>) -> String {
    let mut causes = Vec::new();
    let mut next = cause;
    while let Some(err) = next {
        causes.push(err.to_string());
        next = err.source();
    }

    if causes.is_empty() {
        format!("An error occurred during analysis: {summary} Please try again.")
    } else {
        format!(
            "An error occurred during analysis: {summary} Cause: {}. Please try again.",
            causes.join(": ")
        )
    }
}

pub struct Orchestrator<A> {
    analyzer: A,
    mode: AnalysisMode,
    transcript: String,
    video: Option<VideoFile>,
    custom_prompt: String,
    result: String,
    error: Option<String>,
    is_loading: bool,
    phase: Phase,
}

impl<A: Analyzer> Orchestrator<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            mode: AnalysisMode::default(),
            transcript: String::new(),
            video: None,
            custom_prompt: String::new(),
            result: String::new(),
            error: None,
            is_loading: false,
            phase: Phase::Idle,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Switch the active input channel. Clears the error message, keeps the result.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
        self.error = None;
    }

    pub fn set_transcript(&mut self, transcript: impl Into<String>) {
        self.transcript = transcript.into();
    }

    pub fn set_video(&mut self, video: Option<VideoFile>) {
        self.video = video;
    }

    pub fn set_custom_prompt(&mut self, prompt: impl Into<String>) {
        self.custom_prompt = prompt.into();
    }

    /// Last successful answer; empty when there is none.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Message for the last rejected or failed request.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshot of the current inputs for `kind`.
    pub fn request(&self, kind: AnalysisKind) -> AnalysisRequest {
        AnalysisRequest {
            mode: self.mode,
            kind,
            transcript: (self.mode == AnalysisMode::Transcript).then(|| self.transcript.clone()),
            video: self
                .video
                .clone()
                .filter(|_| self.mode == AnalysisMode::Video),
            custom_prompt: (kind == AnalysisKind::Custom).then(|| self.custom_prompt.clone()),
        }
    }

    /// Run one analysis of the current inputs.
    ///
    /// A rejected request leaves the previous result untouched. Once validation
    /// passes the previous result and error are cleared, so a failure never
    /// shows a stale answer.
    #[instrument(skip_all, fields(mode = %self.mode, kind = %kind))]
    pub async fn analyze(&mut self, kind: AnalysisKind) -> AnalysisOutcome {
        self.phase = Phase::Validating;
        let request = self.request(kind);
        if let Err(e) = request.validate() {
            debug!(reason = %e, "request rejected");
            self.phase = Phase::Rejected;
            let message = e.to_string();
            self.error = Some(message.clone());
            self.phase = Phase::Idle;
            return AnalysisOutcome::Failure(message);
        }

        self.is_loading = true;
        self.result.clear();
        self.error = None;

        let outcome = self.run(request).await;
        match &outcome {
            AnalysisOutcome::Success(text) => {
                info!(result.len = text.len(), "analysis succeeded");
                self.result = text.clone();
                self.phase = Phase::Succeeded;
            }
            AnalysisOutcome::Failure(message) => {
                warn!(%message, "analysis failed");
                self.error = Some(message.clone());
                self.phase = Phase::Failed;
            }
        }
        self.is_loading = false;
        outcome
    }

    async fn run(&mut self, request: AnalysisRequest) -> AnalysisOutcome {
        self.phase = Phase::Building;
        let instruction =
            build_prompt(request.kind, request.mode, request.custom_prompt.as_deref());

        let payload = match (request.mode, request.transcript, request.video) {
            (AnalysisMode::Transcript, Some(transcript), _) => RequestPayload::TextOnly {
                prompt: compose_transcript_prompt(&instruction, &transcript),
            },
            (AnalysisMode::Video, _, Some(video)) => match media::encode(&video).await {
                Ok(media) => RequestPayload::TextWithMedia {
                    prompt: instruction,
                    media,
                },
                Err(e) => {
                    return AnalysisOutcome::Failure(failure_message(
                        "Failed to process the video file.",
                        Some(&e as &(dyn Error + 'static)),
                    ));
                }
            },
            // validate() guarantees the input for the active mode
            _ => {
                return AnalysisOutcome::Failure(failure_message("Missing input.", None));
            }
        };

        self.phase = Phase::Calling;
        match self.analyzer.analyze(payload).await {
            Ok(text) => AnalysisOutcome::Success(text),
            Err(e) => AnalysisOutcome::Failure(failure_message(&e.to_string(), e.source())),
        }
    }
}
