use std::io::Write;
use std::process::{Command, Stdio};

use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;

use crate::app_config::{ConverterConfig, ConverterKind};
use crate::errors::TranslationError;

use super::html_rules::{self, RAW_TAGS};

/// Turns translated HTML back into Markdown
///
/// Implementations must be pure: the same input always yields the same output.
pub trait MarkupConverter: Send + Sync + std::fmt::Debug {
    fn convert(&self, html: &str) -> Result<String, TranslationError>;
}

/// In-process converter producing ATX headings and fenced code
///
/// `div` and `iframe` elements are kept as HTML, tables become pipe tables.
#[derive(Debug, Default, Clone)]
pub struct BuiltinConverter;

impl BuiltinConverter {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        }
    }
}

impl MarkupConverter for BuiltinConverter {
    fn convert(&self, html: &str) -> Result<String, TranslationError> {
        HtmlToMarkdown::builder()
            .options(Self::options())
            .add_handler(RAW_TAGS.to_vec(), html_rules::keep_outer_html)
            .add_handler(vec!["table"], html_rules::table_to_gfm)
            .build()
            .convert(html)
            .map(|markdown| markdown.trim().to_string())
            .map_err(|e| TranslationError::Conversion(e.to_string()))
    }
}

/// External program reading HTML on stdin and writing Markdown on stdout
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

impl MarkupConverter for CommandConverter {
    fn convert(&self, html: &str) -> Result<String, TranslationError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TranslationError::Conversion(format!("Failed to start {}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .map_err(|e| TranslationError::Conversion(format!("Failed to write to {}: {}", self.program, e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| TranslationError::Conversion(format!("Failed to wait for {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(TranslationError::Conversion(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Build the converter selected by the configuration
pub fn from_config(config: &ConverterConfig) -> Box<dyn MarkupConverter> {
    match config.kind {
        ConverterKind::Builtin => Box::new(BuiltinConverter::new()),
        ConverterKind::Command => Box::new(CommandConverter::new(config.program.clone(), config.args.clone())),
    }
}
