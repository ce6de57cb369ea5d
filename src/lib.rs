//! # video-analyzer
//!
//! Summaries, key topics and sentiment analysis of YouTube transcripts and video
//! files, produced by Google's Gemini API.
//!
//! ```rust,no_run
//! use video_analyzer::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let mut orchestrator = Orchestrator::new(GeminiAnalyzer::new(&config)?);
//!
//! orchestrator.set_transcript("Welcome back to the channel...");
//! match orchestrator.analyze(AnalysisKind::Summary).await {
//!     AnalysisOutcome::Success(text) => println!("{}", render::to_terminal(&text)),
//!     AnalysisOutcome::Failure(message) => eprintln!("{message}"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod generation;
mod models;

pub mod analysis;
pub mod config;
pub mod media;
pub mod orchestrator;
pub mod prelude;
pub mod prompt;
pub mod render;

#[cfg(test)]
mod tests;

pub use analysis::{Analyzer, Error as AnalysisError, GeminiAnalyzer, RequestPayload};
pub use client::{Error as ClientError, Gemini, Model};
pub use config::{Config, ConfigError};
pub use generation::{
    Candidate, ContentBuilder, FinishReason, GenerateContentRequest, GenerationConfig,
    GenerationResponse, UsageMetadata,
};
pub use media::{EncodedMedia, Error as EncodingError, VideoFile};
pub use models::{Blob, Content, Part, Role};
pub use orchestrator::{AnalysisOutcome, AnalysisRequest, Orchestrator, Phase, ValidationError};
pub use prompt::{build_prompt, compose_transcript_prompt, AnalysisKind, AnalysisMode};
