#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PromptMessage;
use crate::domain::models::Provider;
use crate::domain::models::ProviderError;

const CONTENT_POLICY_CODE: &str = "content_policy_violation";

fn convert_err(err: reqwest::Error) -> ProviderError {
    if err.is_decode() {
        return ProviderError::Shape(err.to_string());
    }
    return ProviderError::Transient(err.to_string());
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<PromptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionChoiceResponse {
    message: CompletionMessageResponse,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoiceResponse>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
    response_format: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ImageDataResponse {
    #[serde(default)]
    b64_json: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDataResponse>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SpeechRequest {
    model: String,
    input: String,
    voice: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorDetailResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorDetailResponse,
}

/// Maps a failed response onto the provider error taxonomy.
fn classify_error(status: u16, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .map(|res| return res.error)
        .unwrap_or_default();

    if detail.code.as_deref() == Some(CONTENT_POLICY_CODE) {
        return ProviderError::ContentPolicy(detail.message);
    }

    return match status {
        401 => ProviderError::InvalidCredentials,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Transient(format!("status {status}: {}", detail.message)),
    };
}

pub struct OpenAI {
    url: String,
    token: String,
    model: String,
    image_model: String,
    image_size: String,
    speech_model: String,
    speech_voice: String,
    client: reqwest::Client,
}

impl Default for OpenAI {
    fn default() -> OpenAI {
        return OpenAI {
            url: Config::get(ConfigKey::OpenAiURL),
            token: Config::get(ConfigKey::OpenAiToken),
            model: Config::get(ConfigKey::Model),
            image_model: Config::get(ConfigKey::ImageModel),
            image_size: Config::get(ConfigKey::ImageSize),
            speech_model: Config::get(ConfigKey::SpeechModel),
            speech_voice: Config::get(ConfigKey::SpeechVoice),
            client: reqwest::Client::new(),
        };
    }
}

impl OpenAI {
    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url.trim_end_matches('/'));
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ProviderError> {
        if self.token.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }

        let res = self
            .client
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(body)
            .send()
            .await
            .map_err(convert_err)?;

        let status = res.status().as_u16();
        if !res.status().is_success() {
            let body = res.text().await.unwrap_or_default();
            let err = classify_error(status, &body);
            tracing::error!(status = status, path = path, error = %err, "OpenAI request failed");
            return Err(err);
        }

        return Ok(res);
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> &'static str {
        return "openai";
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.url.is_empty() {
            return Err(ProviderError::Transient(
                "OpenAI URL is not defined".to_string(),
            ));
        }
        if self.token.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }

        let res = self
            .client
            .get(self.endpoint("/v1/models"))
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, "OpenAI is not reachable");
                return convert_err(err);
            })?;

        let status = res.status().as_u16();
        if status >= 400 {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(status = status, "OpenAI health check failed");
            return Err(classify_error(status, &body));
        }

        return Ok(());
    }

    async fn complete(
        &self,
        messages: &[PromptMessage],
        max_tokens: Option<u32>,
    ) -> Result<String, ProviderError> {
        let req = CompletionRequest {
            model: self.model.to_string(),
            messages: messages.to_vec(),
            max_tokens,
        };

        let res = self
            .post("/v1/chat/completions", &req)
            .await?
            .json::<CompletionResponse>()
            .await
            .map_err(convert_err)?;
        tracing::debug!(body = ?res, "Completion response");

        let text = res
            .choices
            .into_iter()
            .next()
            .and_then(|choice| return choice.message.content)
            .unwrap_or_default();

        return Ok(text);
    }

    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let req = ImageRequest {
            model: self.image_model.to_string(),
            prompt: prompt.to_string(),
            n: 1,
            size: self.image_size.to_string(),
            response_format: "b64_json".to_string(),
        };

        let res = self
            .post("/v1/images/generations", &req)
            .await?
            .json::<ImageResponse>()
            .await
            .map_err(convert_err)?;

        let encoded = res
            .data
            .into_iter()
            .next()
            .and_then(|image| return image.b64_json)
            .unwrap_or_default();

        let bytes = b64.decode(encoded.as_bytes()).map_err(|err| {
            return ProviderError::Shape(format!("Invalid image payload: {err}"));
        })?;

        return Ok(bytes);
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let req = SpeechRequest {
            model: self.speech_model.to_string(),
            input: text.to_string(),
            voice: self.speech_voice.to_string(),
        };

        let bytes = self
            .post("/v1/audio/speech", &req)
            .await?
            .bytes()
            .await
            .map_err(convert_err)?;

        return Ok(bytes.to_vec());
    }
}
