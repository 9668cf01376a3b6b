// src/provider/mod.rs — Remote image edit boundary

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::config::ProviderConfig;
use crate::infra::errors::CollapserError;

/// An endpoint that takes an image plus an instruction and returns an edited image.
#[async_trait]
pub trait ImageEditProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn edit(&self, request: EditRequest) -> Result<EditedImage, CollapserError>;
}

/// Request-level settings that stay fixed for a whole chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSettings {
    pub model: String,
    pub quality: String,
    pub size: String,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

impl From<&ProviderConfig> for EditSettings {
    fn from(cfg: &ProviderConfig) -> Self {
        Self {
            model: cfg.model.clone(),
            quality: cfg.quality.clone(),
            size: cfg.size.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditRequest {
    /// Encoded bytes of the current input image.
    pub image: Vec<u8>,
    /// File name sent with the upload (the endpoint sniffs the type from it).
    pub file_name: String,
    pub prompt: String,
    pub settings: EditSettings,
    /// Number of candidates to request. The chain always asks for one.
    pub n: u32,
}

/// One candidate returned by the endpoint, still encoded.
#[derive(Debug, Clone)]
pub struct EditedImage {
    pub bytes: Vec<u8>,
}
