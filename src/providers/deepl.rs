use std::time::Duration;
use serde::Deserialize;
use async_trait::async_trait;
use reqwest::Client;
use log::{debug, error};

use crate::errors::ProviderError;
use crate::language_utils;
use super::TranslationEngine;

/// DeepL client translating HTML with XML tag handling
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// Authentication key
    api_key: String,
    /// Full URL of the translate endpoint
    endpoint: String,
}

/// One translation of a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Source language detected by the service
    #[serde(default)]
    pub detected_source_language: Option<String>,

    /// Translated text
    pub text: String,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    pub translations: Vec<DeepLTranslation>,
}

/// Error body returned by DeepL on failures
#[derive(Debug, Deserialize)]
struct DeepLErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Form fields of a translate request
    pub fn form_fields(
        &self,
        markup: &str,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("auth_key", self.api_key.clone()),
            ("text", markup.to_string()),
            ("target_lang", language_utils::engine_code(lang_to)),
            ("tag_handling", "xml".to_string()),
        ];

        if let Some(source) = lang_from.filter(|code| !code.trim().is_empty()) {
            fields.push(("source_lang", language_utils::engine_code(source)));
        }

        fields
    }

    /// Extract the translated text of a response
    pub fn extract_text(response: &DeepLResponse) -> Result<String, ProviderError> {
        response
            .translations
            .first()
            .map(|translation| translation.text.clone())
            .ok_or_else(|| ProviderError::ParseError("Response contains no translation".to_string()))
    }

    /// Build the error of a non-success response from its body
    pub fn api_error(status_code: u16, body: &str) -> ProviderError {
        let message = serde_json::from_str::<DeepLErrorBody>(body)
            .ok()
            .and_then(|parsed| match (parsed.message, parsed.detail) {
                (Some(message), Some(detail)) => Some(format!("{} ({})", message, detail)),
                (Some(message), None) => Some(message),
                (None, detail) => detail,
            })
            .unwrap_or_else(|| body.trim().to_string());

        ProviderError::ApiError { status_code, message }
    }
}

#[async_trait]
impl TranslationEngine for DeepL {
    async fn translate(
        &self,
        markup: &str,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<String, ProviderError> {
        let fields = self.form_fields(markup, lang_to, lang_from);
        debug!("DeepL request: {} chars to {}", markup.len(), lang_to);

        let response = self.client.post(&self.endpoint)
            .form(&fields)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to DeepL API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let err = Self::api_error(status.as_u16(), &error_text);
            error!("DeepL API error: {}", err);
            return Err(err);
        }

        let deepl_response = response.json::<DeepLResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL API response: {}", e)))?;

        Self::extract_text(&deepl_response)
    }

    fn name(&self) -> &str {
        "deepl"
    }
}
