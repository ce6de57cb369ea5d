use std::sync::Arc;
use tracing::instrument;

use crate::{
    client::{Error as ClientError, GeminiClient},
    generation::{GenerateContentRequest, GenerationConfig, GenerationResponse},
    models::{Content, Part, Role},
};

/// Builder for content generation requests
#[derive(Clone)]
pub struct ContentBuilder {
    client: Arc<GeminiClient>,
    pub contents: Vec<Content>,
    generation_config: Option<GenerationConfig>,
}

impl ContentBuilder {
    /// Creates a new `ContentBuilder`.
    pub(crate) fn new(client: Arc<GeminiClient>) -> Self {
        Self {
            client,
            contents: Vec::new(),
            generation_config: None,
        }
    }

    /// Adds a user message to the request.
    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::text(text).with_role(Role::User));
        self
    }

    /// Adds a user message carrying a text instruction followed by inline media.
    ///
    /// Both parts travel in the same content so the model reads the instruction
    /// against the attached media. The data should be base64-encoded.
    pub fn with_user_message_and_inline_data(
        mut self,
        text: impl Into<String>,
        data: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let content = Content::from_parts(vec![
            Part::text(text),
            Part::inline_data(mime_type, data),
        ])
        .with_role(Role::User);
        self.contents.push(content);
        self
    }

    /// Sets the temperature for the request.
    ///
    /// Higher values (e.g., 1.0) produce more creative results, lower values
    /// (e.g., 0.2) more deterministic ones.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation_config
            .get_or_insert_with(Default::default)
            .temperature = Some(temperature);
        self
    }

    /// Builds the `GenerateContentRequest`.
    pub fn build(self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.contents,
            generation_config: self.generation_config,
        }
    }

    /// Executes the content generation request.
    #[instrument(skip_all, fields(
        model = %self.client.model,
        messages.parts.count = self.contents.len(),
        temperature = self.generation_config.as_ref().and_then(|c| c.temperature),
    ))]
    pub async fn execute(self) -> Result<GenerationResponse, ClientError> {
        let client = self.client.clone();
        let request = self.build();
        client.generate_content_raw(request).await
    }
}
