//! # Prelude for the video-analyzer crate
//!
//! Re-exports the types needed to configure an analyzer and run analyses:
//!
//! ```rust,ignore
//! use video_analyzer::prelude::*;
//! ```

pub use crate::analysis::{Analyzer, GeminiAnalyzer, RequestPayload};
pub use crate::config::{Config, ConfigError};
pub use crate::media::{EncodedMedia, VideoFile};
pub use crate::orchestrator::{AnalysisOutcome, Orchestrator, Phase};
pub use crate::prompt::{AnalysisKind, AnalysisMode};
pub use crate::render;
