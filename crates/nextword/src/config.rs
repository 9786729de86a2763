#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokenize::{Case, IndexStrategy, Padding, TokenizerKind};

use crate::error::InitError;

/// Settings the generation loop needs on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// tokens fed to the scorer per step (`max_sequence_len - 1`)
    pub window_size: usize,
    /// padding side for short inputs
    pub padding: Padding,
    /// append nothing, instead of `" "`, when a predicted index has no word
    pub skip_empty_words: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { window_size: 9, padding: Padding::Pre, skip_empty_words: false }
    }
}

/// Full service configuration. Every field has a default; a JSON file may
/// override any subset and command-line flags override the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// model sequence length; the scorer sees one token less
    pub max_sequence_len: usize,
    /// padding side used when encoding for the scorer
    pub padding: Padding,
    /// word splitting policy
    pub tokenizer: TokenizerKind,
    /// case rule applied after splitting
    pub case: Case,
    /// separator regex for the `pattern` tokenizer
    pub token_pattern: Option<String>,
    /// vocabulary index assignment
    pub index_strategy: IndexStrategy,
    /// drop the space that precedes an empty decoded word
    pub skip_empty_words: bool,
    /// CSV corpus with a header row
    pub corpus_path: PathBuf,
    /// corpus column holding the text
    pub text_field: String,
    /// little-endian f32 model weights
    pub weights_path: PathBuf,
    /// embedding width of the dense model
    pub embed_dim: usize,
    /// hidden layer width of the dense model
    pub hidden_dim: usize,
    /// listen host
    pub host: String,
    /// listen port
    pub port: u16,
    /// upper bound on `next_words` per request
    pub max_next_words: usize,
    /// per-request deadline in milliseconds, 0 disables it
    pub request_timeout_ms: u64,
    /// largest accepted request body; bigger ones get 413
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_sequence_len: 10,
            padding: Padding::Pre,
            tokenizer: TokenizerKind::Word,
            case: Case::Preserve,
            token_pattern: None,
            index_strategy: IndexStrategy::FirstSeenPosition,
            skip_empty_words: false,
            corpus_path: PathBuf::from("data/API_DS.csv"),
            text_field: "Fixedd".to_string(),
            weights_path: PathBuf::from("weights/model.bin"),
            embed_dim: 16,
            hidden_dim: 32,
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_next_words: 256,
            request_timeout_ms: 0,
            max_body_bytes: 100 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, InitError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| InitError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text).map_err(|e| InitError::Config(format!("{}: {e}", path.display())))
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), InitError> {
        if self.max_sequence_len == 0 {
            return Err(InitError::Config("max_sequence_len must be at least 1".into()));
        }
        if self.embed_dim == 0 || self.hidden_dim == 0 {
            return Err(InitError::Config("embed_dim and hidden_dim must be positive".into()));
        }
        if self.text_field.is_empty() {
            return Err(InitError::Config("text_field must not be empty".into()));
        }
        Ok(())
    }

    /// Tokens per scorer window.
    pub fn window_size(&self) -> usize {
        self.max_sequence_len.saturating_sub(1)
    }

    /// Generation settings derived from this config.
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            window_size: self.window_size(),
            padding: self.padding,
            skip_empty_words: self.skip_empty_words,
        }
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request deadline, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

/// Parse a kebab-case enum value the same way the JSON config does.
fn parse_kebab<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

/// Command-line flags shared by the binaries.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// model sequence length
    #[arg(long)]
    pub max_sequence_len: Option<usize>,
    /// padding side: pre | post
    #[arg(long, value_parser = parse_kebab::<Padding>)]
    pub padding: Option<Padding>,
    /// tokenizer: word | punctuation | pattern
    #[arg(long, value_parser = parse_kebab::<TokenizerKind>)]
    pub tokenizer: Option<TokenizerKind>,
    /// case rule: preserve | lower
    #[arg(long, value_parser = parse_kebab::<Case>)]
    pub case: Option<Case>,
    /// separator regex for the pattern tokenizer
    #[arg(long)]
    pub token_pattern: Option<String>,
    /// index strategy: first-seen-position | sequential
    #[arg(long, value_parser = parse_kebab::<IndexStrategy>)]
    pub index_strategy: Option<IndexStrategy>,
    /// do not emit a space for words that fail to decode
    #[arg(long)]
    pub skip_empty_words: bool,
    /// corpus CSV path
    #[arg(long)]
    pub corpus: Option<PathBuf>,
    /// corpus text column
    #[arg(long)]
    pub text_field: Option<String>,
    /// model weights path
    #[arg(long)]
    pub weights: Option<PathBuf>,
    /// dense model embedding width
    #[arg(long)]
    pub embed_dim: Option<usize>,
    /// dense model hidden width
    #[arg(long)]
    pub hidden_dim: Option<usize>,
    /// listen host
    #[arg(long)]
    pub host: Option<String>,
    /// listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
    /// maximum next_words per request
    #[arg(long)]
    pub max_next_words: Option<usize>,
    /// per-request deadline in milliseconds
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,
    /// request body size limit in bytes
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

impl ConfigArgs {
    /// Defaults, then the config file, then flags. Validates the result.
    pub fn resolve(&self) -> Result<ServiceConfig, InitError> {
        let mut cfg = match &self.config {
            Some(path) => ServiceConfig::from_json_file(path)?,
            None => ServiceConfig::default(),
        };
        if let Some(v) = self.max_sequence_len { cfg.max_sequence_len = v; }
        if let Some(v) = self.padding { cfg.padding = v; }
        if let Some(v) = self.tokenizer { cfg.tokenizer = v; }
        if let Some(v) = self.case { cfg.case = v; }
        if let Some(v) = &self.token_pattern { cfg.token_pattern = Some(v.clone()); }
        if let Some(v) = self.index_strategy { cfg.index_strategy = v; }
        if self.skip_empty_words { cfg.skip_empty_words = true; }
        if let Some(v) = &self.corpus { cfg.corpus_path = v.clone(); }
        if let Some(v) = &self.text_field { cfg.text_field = v.clone(); }
        if let Some(v) = &self.weights { cfg.weights_path = v.clone(); }
        if let Some(v) = self.embed_dim { cfg.embed_dim = v; }
        if let Some(v) = self.hidden_dim { cfg.hidden_dim = v; }
        if let Some(v) = &self.host { cfg.host = v.clone(); }
        if let Some(v) = self.port { cfg.port = v; }
        if let Some(v) = self.max_next_words { cfg.max_next_words = v; }
        if let Some(v) = self.request_timeout_ms { cfg.request_timeout_ms = v; }
        if let Some(v) = self.max_body_bytes { cfg.max_body_bytes = v; }
        cfg.validate()?;
        Ok(cfg)
    }
}
