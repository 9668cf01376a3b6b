// src/provider/openai.rs — OpenAI Images "edits" provider

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::multipart::{Form, Part};

use super::{EditRequest, EditedImage, ImageEditProvider};
use crate::infra::config::ProviderConfig;
use crate::infra::errors::CollapserError;

pub struct OpenAIProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build from config, reading the key from the configured environment variable.
    ///
    /// A missing or empty key is a configuration error and is never retried.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self, CollapserError> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CollapserError::MissingApiKey {
                var: cfg.api_key_env.clone(),
            })?;
        Ok(Self::with_base_url(api_key, cfg.base_url.clone()))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/png"
    }
}

/// Pull the first candidate out of an edits response body.
fn decode_edit_response(resp: &serde_json::Value) -> Result<EditedImage, CollapserError> {
    let b64 = resp["data"][0]["b64_json"].as_str().ok_or_else(|| {
        CollapserError::InvalidResponse("missing data[0].b64_json in response".into())
    })?;
    let bytes = BASE64
        .decode(b64)
        .map_err(|e| CollapserError::InvalidResponse(format!("bad base64 payload: {e}")))?;
    Ok(EditedImage { bytes })
}

#[async_trait]
impl ImageEditProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn edit(&self, request: EditRequest) -> Result<EditedImage, CollapserError> {
        let image = Part::bytes(request.image)
            .file_name(request.file_name.clone())
            .mime_str(mime_for(&request.file_name))
            .map_err(|e| CollapserError::Provider {
                provider: self.id().into(),
                message: e.to_string(),
            })?;

        let form = Form::new()
            .text("model", request.settings.model.clone())
            .text("prompt", request.prompt)
            .text("quality", request.settings.quality.clone())
            .text("size", request.settings.size.clone())
            .text("n", request.n.to_string())
            .part("image", image);

        tracing::debug!(
            model = %request.settings.model,
            size = %request.settings.size,
            "POST {}/images/edits",
            self.base_url
        );

        let response = self
            .client
            .post(format!("{}/images/edits", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CollapserError::Provider {
                provider: self.id().into(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CollapserError::RateLimited {
                provider: self.id().into(),
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CollapserError::Provider {
                provider: self.id().into(),
                message: format!("HTTP {}: {}", status, error_body),
            });
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| CollapserError::Provider {
                provider: self.id().into(),
                message: format!("Failed to parse response: {}", e),
            })?;

        decode_edit_response(&resp)
    }
}
