/*!
 * Translation engine implementations.
 *
 * This module contains the clients the markup bridge can send HTML to:
 * - DeepL: DeepL API with XML tag handling
 * - Disabled: returns the markup unchanged (dry runs, tests)
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{EngineKind, TranslationConfig};
use crate::errors::ProviderError;

/// Common trait for all translation engines
///
/// Engines receive HTML and must return HTML with the same markup structure.
#[async_trait]
pub trait TranslationEngine: Send + Sync + Debug {
    /// Translate markup into `lang_to`, detecting the source when `lang_from` is `None`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated markup or an error
    async fn translate(
        &self,
        markup: &str,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

/// Engine that performs no translation
#[derive(Debug, Default, Clone)]
pub struct DisabledEngine;

#[async_trait]
impl TranslationEngine for DisabledEngine {
    async fn translate(
        &self,
        markup: &str,
        _lang_to: &str,
        _lang_from: Option<&str>,
    ) -> Result<String, ProviderError> {
        Ok(markup.to_string())
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Build the engine selected by the configuration
pub fn from_config(config: &TranslationConfig) -> Result<Box<dyn TranslationEngine>, ProviderError> {
    Ok(match config.engine {
        EngineKind::DeepL => Box::new(deepl::DeepL::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )?),
        EngineKind::Disabled => Box::new(DisabledEngine),
    })
}

pub mod deepl;
