use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use display_error_chain::DisplayErrorChain;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use video_analyzer::prelude::*;

/// Size above which the service is likely to reject a video. Not enforced.
const ADVISED_MAX_VIDEO_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Summarize, list key topics of, or analyze the sentiment of a YouTube transcript or video.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    input: Input,

    /// Analysis to run: summary, key_topics, sentiment or custom.
    /// Defaults to custom when --prompt is given, summary otherwise.
    #[arg(short, long, global = true)]
    kind: Option<AnalysisKind>,

    /// Instruction for a custom analysis
    #[arg(short, long, global = true)]
    prompt: Option<String>,

    /// Sampling temperature passed to the model
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Print the answer as returned, without formatting
    #[arg(long, global = true)]
    raw: bool,
}

#[derive(Debug, Subcommand)]
enum Input {
    /// Analyze a pasted transcript
    Transcript {
        /// Text file holding the transcript, or `-` for stdin
        path: PathBuf,
    },
    /// Analyze a video file
    Video {
        path: PathBuf,

        /// Media type of the file; guessed from the extension when omitted
        #[arg(long)]
        mime_type: Option<mime::Mime>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match do_main(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            let error_chain = DisplayErrorChain::new(e.as_ref());
            tracing::error!(error.debug = ?e, error.chained = %error_chain, "execution failed");
            ExitCode::FAILURE
        }
    }
}

async fn do_main(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(temperature) = cli.temperature {
        config = config.with_temperature(temperature);
    }
    let mut orchestrator = Orchestrator::new(GeminiAnalyzer::new(&config)?);

    match cli.input {
        Input::Transcript { path } => {
            orchestrator.set_mode(AnalysisMode::Transcript);
            orchestrator.set_transcript(read_transcript(&path).await?);
        }
        Input::Video { path, mime_type } => {
            warn_if_oversized(&path).await;
            let mut video = VideoFile::new(path);
            if let Some(mime_type) = mime_type {
                video = video.with_mime_type(mime_type);
            }
            warn_if_not_video(&video);
            orchestrator.set_mode(AnalysisMode::Video);
            orchestrator.set_video(Some(video));
        }
    }

    let kind = cli.kind.unwrap_or(if cli.prompt.is_some() {
        AnalysisKind::Custom
    } else {
        AnalysisKind::Summary
    });
    if let Some(prompt) = cli.prompt {
        orchestrator.set_custom_prompt(prompt);
    }

    info!(mode = %orchestrator.mode(), %kind, "AI is analyzing, this may take a few moments");
    match orchestrator.analyze(kind).await {
        AnalysisOutcome::Success(text) if cli.raw => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        AnalysisOutcome::Success(text) => {
            print!("{}", render::to_terminal(&text));
            Ok(ExitCode::SUCCESS)
        }
        AnalysisOutcome::Failure(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn read_transcript(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut transcript = String::new();
        tokio::io::stdin().read_to_string(&mut transcript).await?;
        Ok(transcript)
    } else {
        tokio::fs::read_to_string(path).await
    }
}

async fn warn_if_oversized(path: &Path) {
    // an unreadable file is reported by the encoder
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.len() > ADVISED_MAX_VIDEO_BYTES {
            warn!(
                path = %path.display(),
                file.size = metadata.len(),
                "video exceeds the 2GB the service accepts; the request will likely fail"
            );
        }
    }
}

fn warn_if_not_video(video: &VideoFile) {
    if !video.is_video() {
        warn!(
            path = %video.path().display(),
            mime_type = %video.mime_type(),
            "file does not look like a video; sending it anyway"
        );
    }
}
