/*!
 * Application configuration.
 *
 * Handles loading, validating and saving configuration settings. Every field
 * has a serde default so partial files stay valid.
 */

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (empty lets the engine detect it)
    #[serde(default)]
    pub source_language: String,

    /// Destination language codes, one translated tree each
    #[serde(default = "default_destination_languages")]
    pub destination_languages: Vec<String>,

    /// Hash inventory mode
    #[serde(default)]
    pub versioning: VersioningMode,

    /// Translation engine settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// HTML to Markdown converter settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Extension of managed documents
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Extra files to track, matched on path segments
    #[serde(default)]
    pub include_files: Vec<String>,

    /// Files or folders never tracked, matched on path segments
    #[serde(default)]
    pub exclude_files: Vec<String>,

    /// Remove destination files that no longer exist in the source
    #[serde(default)]
    pub keep_clean: bool,

    /// Send code spans and blocks to the translation engine
    #[serde(default)]
    pub translate_code: bool,

    /// Link rewriting settings
    #[serde(default)]
    pub links: LinksConfig,

    /// What to do when one file fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Log one line per translated file
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Hash inventory mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersioningMode {
    #[default]
    Disabled,
    Json,
    Sql,
}

impl std::fmt::Display for VersioningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Disabled => "disabled",
            Self::Json => "json",
            Self::Sql => "sql",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for VersioningMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "json" => Ok(Self::Json),
            "sql" => Ok(Self::Sql),
            _ => Err(anyhow!("Invalid versioning mode: {}", s)),
        }
    }
}

/// Translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    // @engine: DeepL API
    #[default]
    DeepL,
    // @engine: No translation, markup goes through unchanged
    Disabled,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeepL => write!(f, "deepl"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "disabled" => Ok(Self::Disabled),
            _ => Err(anyhow!("Invalid translation engine: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Engine to use
    #[serde(default)]
    pub engine: EngineKind,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_deepl_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of destination languages translated at once
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Translate each changed block in its own request
    #[serde(default)]
    pub per_block: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            api_key: String::new(),
            endpoint: default_deepl_endpoint(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
            per_block: false,
        }
    }
}

/// HTML to Markdown converter type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// In-process converter
    #[default]
    Builtin,
    /// External program reading HTML on stdin and writing Markdown on stdout
    Command,
}

/// Converter configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ConverterConfig {
    #[serde(default)]
    pub kind: ConverterKind,

    /// Program to run for the command converter (e.g. "node")
    #[serde(default)]
    pub program: String,

    /// Arguments of the program (e.g. ["html-converter.js"])
    #[serde(default)]
    pub args: Vec<String>,
}

/// Link rewriting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinksConfig {
    /// Rewrite absolute links of translated blocks
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// URL root under which language folders are served
    #[serde(default = "default_links_root")]
    pub root: String,

    /// Absolute link prefixes left untouched
    #[serde(default)]
    pub exclude_prefixes: Vec<String>,

    /// Path that always points at the canonical source, never rewritten
    #[serde(default)]
    pub canonical_marker: Option<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: default_links_root(),
            exclude_prefixes: Vec::new(),
            canonical_marker: None,
        }
    }
}

/// Behavior when the synchronization of one file fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run on the first failing file
    Abort,
    /// Log the failure and continue with the next file
    #[default]
    Skip,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_destination_languages() -> Vec<String> {
    vec!["fr".to_string()]
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_deepl_endpoint() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_links_root() -> String {
    "/".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !self.source_language.is_empty() {
            crate::language_utils::validate_language_code(&self.source_language)?;
        }

        if self.destination_languages.is_empty() {
            return Err(anyhow!("At least one destination language is required"));
        }
        for language in &self.destination_languages {
            crate::language_utils::validate_language_code(language)?;
        }

        if self.extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Managed file extension cannot be empty"));
        }

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }

        if self.translation.engine == EngineKind::DeepL {
            if self.translation.api_key.is_empty() {
                return Err(anyhow!("Translation API key is required for DeepL engine"));
            }
            Url::parse(&self.translation.endpoint)
                .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", self.translation.endpoint, e))?;
        }

        if self.converter.kind == ConverterKind::Command && self.converter.program.is_empty() {
            return Err(anyhow!("A program is required for the command converter"));
        }

        if !self.links.root.starts_with('/') {
            return Err(anyhow!("Link root must be absolute: {}", self.links.root));
        }

        Ok(())
    }

    /// Managed extension without its leading dot
    pub fn managed_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: String::new(),
            destination_languages: default_destination_languages(),
            versioning: VersioningMode::default(),
            translation: TranslationConfig::default(),
            converter: ConverterConfig::default(),
            extension: default_extension(),
            include_files: Vec::new(),
            exclude_files: Vec::new(),
            keep_clean: false,
            translate_code: false,
            links: LinksConfig::default(),
            failure_policy: FailurePolicy::default(),
            verbose: true,
            log_level: LogLevel::default(),
        }
    }
}
