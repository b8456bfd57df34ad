use log::debug;

use crate::app_config::Config;
use crate::blocks::BlockSequence;
use crate::errors::TranslationError;
use crate::markdown;
use crate::providers::{self, TranslationEngine};

use super::converter::{self, MarkupConverter};

/// Render a sequence to HTML, one block at a time
///
/// Blocks are rendered separately so adjacent blocks (two lists, for
/// instance) never merge into one HTML element.
pub fn to_markup(sequence: &BlockSequence, translate_code: bool) -> String {
    sequence
        .iter()
        .map(|(_, content)| markdown::to_html(content, !translate_code))
        .collect::<Vec<_>>()
        .join("")
}

/// Round trip between Markdown blocks, the translation engine and back
#[derive(Debug)]
pub struct MarkupBridge {
    engine: Box<dyn TranslationEngine>,
    converter: Box<dyn MarkupConverter>,
    translate_code: bool,
}

impl MarkupBridge {
    pub fn new(
        engine: Box<dyn TranslationEngine>,
        converter: Box<dyn MarkupConverter>,
        translate_code: bool,
    ) -> Self {
        Self { engine, converter, translate_code }
    }

    /// Build the engine and converter selected by the configuration
    pub fn from_config(config: &Config) -> Result<Self, TranslationError> {
        Ok(Self::new(
            providers::from_config(&config.translation)?,
            converter::from_config(&config.converter),
            config.translate_code,
        ))
    }

    /// HTML rendering of a sequence, code protected unless configured otherwise
    pub fn to_markup(&self, sequence: &BlockSequence) -> String {
        to_markup(sequence, self.translate_code)
    }

    /// Send markup to the engine
    pub async fn translate(
        &self,
        markup: &str,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<String, TranslationError> {
        debug!("Translating {} chars to {} with {}", markup.len(), lang_to, self.engine.name());
        Ok(self.engine.translate(markup, lang_to, lang_from).await?)
    }

    /// Convert markup back to Markdown
    pub fn from_markup(&self, html: &str) -> Result<String, TranslationError> {
        self.converter.convert(html)
    }

    /// Translate Markdown text and return the translated Markdown
    pub async fn translate_markdown(
        &self,
        text: &str,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<String, TranslationError> {
        let html = markdown::to_html(text, !self.translate_code);
        let translated = self.translate(&html, lang_to, lang_from).await?;
        self.from_markup(&translated)
    }

    /// Translate a whole sequence in one engine call and split the result
    ///
    /// The result is not remapped: its identities are fingerprints of the
    /// translated content.
    pub async fn translate_sequence(
        &self,
        sequence: &BlockSequence,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<BlockSequence, TranslationError> {
        let translated = self.translate(&self.to_markup(sequence), lang_to, lang_from).await?;
        Ok(BlockSequence::split(&self.from_markup(&translated)?))
    }

    pub fn converter(&self) -> &dyn MarkupConverter {
        self.converter.as_ref()
    }
}
