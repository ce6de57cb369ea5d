use crate::generation::{ContentBuilder, GenerateContentRequest, GenerationResponse};
use reqwest::{Client, Response};
use snafu::{ResultExt, Snafu};
use std::{fmt, sync::Arc};
use tracing::debug;
use url::Url;

pub(crate) const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Gemini model identifiers used by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// Fast text model, used for transcripts
    #[default]
    Gemini25Flash,
    /// More capable multimodal model, used for video
    Gemini25Pro,
    /// Any other model, given by its resource name (`models/...`)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Flash => "models/gemini-2.5-flash",
            Model::Gemini25Pro => "models/gemini-2.5-pro",
            Model::Custom(model) => model,
        }
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        // accept bare ids such as "gemini-2.5-flash"
        let model = if model.starts_with("models/") {
            model
        } else {
            format!("models/{model}")
        };
        match model.as_str() {
            "models/gemini-2.5-flash" => Model::Gemini25Flash,
            "models/gemini-2.5-pro" => Model::Gemini25Pro,
            _ => Model::Custom(model),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to construct URL (probably incorrect model name): {suffix}"))]
    ConstructUrl {
        source: url::ParseError,
        suffix: String,
    },

    #[snafu(display("failed to perform request to '{endpoint}'"))]
    PerformRequest {
        source: reqwest::Error,
        /// Target `model:method`, without the key-bearing query
        endpoint: String,
    },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse {
        /// HTTP status code
        code: u16,
        /// HTTP error description
        description: Option<String>,
    },

    #[snafu(display("failed to deserialize JSON response"))]
    Deserialize { source: serde_json::Error },

    #[snafu(display("failed to obtain response body"))]
    DecodeResponse { source: reqwest::Error },
}

/// Internal client for making requests to the Gemini API
pub(crate) struct GeminiClient {
    http_client: Client,
    api_key: String,
    pub model: Model,
    base_url: Url,
}

impl GeminiClient {
    fn new(api_key: String, model: Model, base_url: Url) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Generate content
    pub(crate) async fn generate_content_raw(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.build_url("generateContent")?;
        debug!(model = %self.model, "sending generateContent request");

        let response = self
            .http_client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context(PerformRequestSnafu {
                endpoint: format!("{}:generateContent", self.model),
            })?;

        let response = Self::check_response(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)
            .context(DecodeResponseSnafu)?;
        serde_json::from_slice(&body).context(DeserializeSnafu)
    }

    /// Turn a non-2xx response into `Error::BadResponse`, keeping the body as description
    async fn check_response(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if !status.is_success() {
            let description = response.text().await.ok().filter(|s| !s.is_empty());
            return BadResponseSnafu {
                code: status.as_u16(),
                description,
            }
            .fail();
        }
        Ok(response)
    }

    /// Build a URL for the API
    fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        let suffix = format!("{}:{}", self.model, endpoint);
        let mut url = self
            .base_url
            .join(&suffix)
            .context(ConstructUrlSnafu { suffix })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Client for the Gemini API
#[derive(Clone)]
pub struct Gemini {
    client: Arc<GeminiClient>,
}

impl Gemini {
    /// Create a new client with the specified API key, model, and base URL
    pub fn with_model_and_base_url(
        api_key: impl Into<String>,
        model: impl Into<Model>,
        base_url: &str,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url).context(ConstructUrlSnafu {
            suffix: base_url.to_string(),
        })?;
        let client = GeminiClient::new(api_key.into(), model.into(), base_url);
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// The model this client talks to
    pub fn model(&self) -> &Model {
        &self.client.model
    }

    /// Start building a content generation request
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, model: Model) -> Gemini {
        let base_url = format!("{}/v1beta/", server.uri());
        Gemini::with_model_and_base_url("test-api-key", model, &base_url).unwrap()
    }

    #[test]
    fn test_model_from_bare_id() {
        assert_eq!(Model::from("gemini-2.5-pro".to_string()), Model::Gemini25Pro);
        assert_eq!(
            Model::from("models/gemini-2.0-flash".to_string()),
            Model::Custom("models/gemini-2.0-flash".to_string())
        );
        assert_eq!(Model::default().to_string(), "models/gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_generate_content_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-api-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Test prompt"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Hello, world!"}], "role": "model"},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let response = client_for(&server, Model::Gemini25Flash)
            .generate_content()
            .with_user_message("Test prompt")
            .execute()
            .await
            .unwrap();

        assert_eq!(response.text(), "Hello, world!");
    }

    #[tokio::test]
    async fn test_generate_content_bad_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = client_for(&server, Model::Gemini25Pro)
            .generate_content()
            .with_user_message("Test prompt")
            .execute()
            .await
            .unwrap_err();

        match err {
            Error::BadResponse { code, description } => {
                assert_eq!(code, 403);
                assert_eq!(description.as_deref(), Some("API key not valid"));
            }
            other => panic!("expected BadResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_content_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server, Model::Gemini25Flash)
            .generate_content()
            .with_user_message("Test prompt")
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Deserialize { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_omits_api_key() {
        // nothing listens on the discard port
        let gemini = Gemini::with_model_and_base_url(
            "SECRET-KEY-123",
            Model::Gemini25Flash,
            "http://127.0.0.1:9/v1beta/",
        )
        .unwrap();

        let err = gemini
            .generate_content()
            .with_user_message("Test prompt")
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PerformRequest { .. }), "{err:?}");
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(current) = source {
            assert!(!current.to_string().contains("SECRET-KEY-123"), "{current}");
            source = current.source();
        }
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }
}
