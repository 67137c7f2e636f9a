//! Text-generation client infrastructure.
//!
//! This module provides the trait the evaluation engine talks to and the
//! concrete providers behind it. Prompting and response salvage live in
//! `evaluation::llm`.
//!
//! # Configuration
//!
//! Settings can be configured via:
//! - CLI arguments: `--llm-provider`, `--llm-model`
//! - Environment variables: `RAIMES_LLM_PROVIDER`, `RAIMES_LLM_MODEL`, `API_GEMINI`
//!
//! CLI arguments take precedence over environment variables.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use log::debug;

/// Model used when the Gemini provider is selected without an override.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Available text-generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Gemini CLI (default)
    #[default]
    Gemini,
    /// Claude CLI
    Claude,
    /// No collaborator; every call fails and the engine falls back
    Offline,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Claude => write!(f, "claude"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "claude" => Ok(Self::Claude),
            "offline" | "none" => Ok(Self::Offline),
            _ => Err(format!(
                "Unknown LLM provider: '{}'. Valid options: gemini, claude, offline",
                s
            )),
        }
    }
}

/// Configuration for LLM clients.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// The provider to use.
    pub provider: LlmProvider,
    /// Optional model override.
    pub model: Option<String>,
    /// API key handed to the Gemini CLI.
    pub api_key: Option<String>,
}

impl LlmConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `RAIMES_LLM_PROVIDER` - provider name (gemini, claude, offline)
    /// - `RAIMES_LLM_MODEL` - model name
    /// - `API_GEMINI` - Gemini API key
    pub fn from_env() -> Self {
        let provider = env::var("RAIMES_LLM_PROVIDER")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let model = env::var("RAIMES_LLM_MODEL").ok();
        let api_key = env::var("API_GEMINI").ok();

        Self {
            provider,
            model,
            api_key,
        }
    }

    /// Set the provider.
    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(mut self, provider: Option<LlmProvider>, model: Option<String>) -> Self {
        if let Some(p) = provider {
            self.provider = p;
        }
        if let Some(m) = model {
            self.model = Some(m);
        }
        self
    }

    /// The API key, ignoring blanks and the `.env` template placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Create an LLM client from this configuration.
    pub fn create_client(&self) -> Arc<dyn LlmClient> {
        match self.provider {
            LlmProvider::Gemini => {
                let client = GeminiCliClient::new(self.usable_api_key().map(str::to_string));
                match &self.model {
                    Some(model) => Arc::new(client.with_model(model)),
                    None => Arc::new(client),
                }
            }
            LlmProvider::Claude => match &self.model {
                Some(model) => Arc::new(ClaudeCliClient::with_model(model)),
                None => Arc::new(ClaudeCliClient::new()),
            },
            LlmProvider::Offline => Arc::new(OfflineClient),
        }
    }
}

/// Trait for text-generation clients.
///
/// Implementations must be shareable across threads: one client serves every
/// concurrent evaluation.
pub trait LlmClient: Send + Sync {
    /// Send a prompt and return the completion text.
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Run a CLI with the prompt on stdin and return its stdout.
fn run_with_stdin(
    program: &str,
    args: &[&str],
    envs: &[(&str, &str)],
    prompt: &str,
) -> Result<String, LlmError> {
    let mut child = Command::new(program)
        .args(args)
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| LlmError::ClientError(format!("Failed to run {} CLI: {}", program, e)))?;

    // Use stdin for the prompt to avoid command line length limits
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(prompt.as_bytes())
            .map_err(|e| LlmError::ClientError(format!("Failed to write to stdin: {}", e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| LlmError::ClientError(format!("Failed to wait for {} CLI: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LlmError::ClientError(format!(
            "{} CLI failed (exit {}): {}",
            program,
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        debug!("{} CLI stderr: {}", program, stderr.trim());
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();
    if response.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(response)
}

/// Gemini CLI client implementation.
pub struct GeminiCliClient {
    pub model: String,
    pub api_key: Option<String>,
}

impl GeminiCliClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl LlmClient for GeminiCliClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::Unavailable("API_GEMINI is not configured".to_string())
        })?;

        run_with_stdin(
            "gemini",
            &["--model", &self.model],
            &[("GEMINI_API_KEY", api_key)],
            prompt,
        )
    }
}

/// Claude CLI client implementation.
pub struct ClaudeCliClient {
    pub model: Option<String>,
}

impl ClaudeCliClient {
    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
        }
    }
}

impl Default for ClaudeCliClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmClient for ClaudeCliClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let mut args = vec!["--print"];
        if let Some(ref model) = self.model {
            args.push("--model");
            args.push(model);
        }

        run_with_stdin("claude", &args, &[], prompt)
    }
}

/// Client used when no collaborator is configured.
pub struct OfflineClient;

impl LlmClient for OfflineClient {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unavailable(
            "no text-generation provider configured".to_string(),
        ))
    }
}

/// Errors from LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM client error: {0}")]
    ClientError(String),

    #[error("LLM unavailable: {0}")]
    Unavailable(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Mock LLM clients for testing.
#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Returns a canned response and remembers the last prompt.
    pub struct MockLlmClient {
        pub response: String,
        pub last_prompt: Mutex<Option<String>>,
    }

    impl MockLlmClient {
        pub fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().expect("prompt mutex poisoned").clone()
        }
    }

    impl LlmClient for MockLlmClient {
        fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            *self.last_prompt.lock().expect("prompt mutex poisoned") = Some(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    /// Always fails, counting how often it was called.
    #[derive(Default)]
    pub struct FailingLlmClient {
        pub calls: std::sync::atomic::AtomicUsize,
    }

    impl LlmClient for FailingLlmClient {
        fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(LlmError::ClientError("quota exceeded".to_string()))
        }
    }
}
