//! Remote analysis: one `generateContent` call per request.
//!
//! Transcripts go to the fast text model, videos to the more capable media model.
//! Every failure, whatever its cause, is reported as [`Error::RemoteCall`] with a
//! generic message; the cause stays in the error chain.

use async_trait::async_trait;
use snafu::{ResultExt, Snafu};
use tracing::{error, instrument};

use crate::{
    client::{Error as ClientError, Gemini},
    config::Config,
    media::EncodedMedia,
    prompt::AnalysisMode,
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{}", advice(*modality)))]
    RemoteCall {
        source: Box<ClientError>,
        modality: AnalysisMode,
    },
}

fn advice(modality: AnalysisMode) -> &'static str {
    match modality {
        AnalysisMode::Transcript => {
            "Failed to get response from AI. Please check your API key and network connection."
        }
        AnalysisMode::Video => {
            "Failed to get response from AI for video analysis. \
             The file might be too large or in an unsupported format."
        }
    }
}

/// What gets sent: an instruction alone, or an instruction plus inline media.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    TextOnly { prompt: String },
    TextWithMedia { prompt: String, media: EncodedMedia },
}

impl RequestPayload {
    pub fn modality(&self) -> AnalysisMode {
        match self {
            RequestPayload::TextOnly { .. } => AnalysisMode::Transcript,
            RequestPayload::TextWithMedia { .. } => AnalysisMode::Video,
        }
    }
}

/// Something that turns a payload into the model's plain-text answer.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, payload: RequestPayload) -> Result<String, Error>;
}

/// [`Analyzer`] backed by the Gemini API.
#[derive(Clone)]
pub struct GeminiAnalyzer {
    text: Gemini,
    media: Gemini,
    temperature: Option<f32>,
}

impl GeminiAnalyzer {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base_url = config.base_url.as_str();
        Ok(Self {
            text: Gemini::with_model_and_base_url(
                config.api_key(),
                config.text_model.clone(),
                base_url,
            )?,
            media: Gemini::with_model_and_base_url(
                config.api_key(),
                config.video_model.clone(),
                base_url,
            )?,
            temperature: config.temperature,
        })
    }

    /// Send a text-only prompt to the text model.
    #[instrument(skip_all, fields(model = %self.text.model(), prompt.len = prompt.len()))]
    pub async fn analyze_text(&self, prompt: &str) -> Result<String, Error> {
        let mut builder = self.text.generate_content().with_user_message(prompt);
        if let Some(temperature) = self.temperature {
            builder = builder.with_temperature(temperature);
        }

        let response = builder
            .execute()
            .await
            .inspect_err(|e| error!(error = %e, "transcript analysis request failed"))
            .map_err(Box::new)
            .context(RemoteCallSnafu {
                modality: AnalysisMode::Transcript,
            })?;
        Ok(response.text())
    }

    /// Send an instruction and the encoded media, as two parts of one message, to the media model.
    #[instrument(skip_all, fields(
        model = %self.media.model(),
        prompt.len = prompt.len(),
        media.mime = %media.mime_type,
        media.encoded_len = media.data.len(),
    ))]
    pub async fn analyze_media(&self, prompt: &str, media: &EncodedMedia) -> Result<String, Error> {
        let mut builder = self.media.generate_content().with_user_message_and_inline_data(
            prompt,
            media.data.as_str(),
            media.mime_type.essence_str(),
        );
        if let Some(temperature) = self.temperature {
            builder = builder.with_temperature(temperature);
        }

        let response = builder
            .execute()
            .await
            .inspect_err(|e| error!(error = %e, "video analysis request failed"))
            .map_err(Box::new)
            .context(RemoteCallSnafu {
                modality: AnalysisMode::Video,
            })?;
        Ok(response.text())
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, payload: RequestPayload) -> Result<String, Error> {
        match payload {
            RequestPayload::TextOnly { prompt } => self.analyze_text(&prompt).await,
            RequestPayload::TextWithMedia { prompt, media } => {
                self.analyze_media(&prompt, &media).await
            }
        }
    }
}
