use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::protocol::LlmProvider;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/run";

const MASK: &str = "********";

/// Snapshot of the user's settings, passed by reference into every run.
///
/// Keys use the camelCase names of the settings file; any key may be
/// omitted.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Where code execution requests are posted.
    pub backend_url: String,
    /// Keep Python state alive between runs.
    pub use_kernel: bool,
    pub enable_python: bool,
    #[serde(rename = "enableJS")]
    pub enable_js: bool,
    /// Enables ```` ```llm ```` and ```` ```agent ```` blocks.
    #[serde(rename = "enableLLM")]
    pub enable_llm: bool,
    pub llm_provider: LlmProvider,
    pub openai_api_key: String,
    pub ollama_model: String,
    pub ollama_url: String,
    /// Whole-request timeout; the HTTP client's default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            use_kernel: true,
            enable_python: true,
            enable_js: true,
            enable_llm: false,
            llm_provider: LlmProvider::Auto,
            openai_api_key: String::new(),
            ollama_model: "llama2".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Settings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// The LLM endpoint: the backend URL with a trailing `/run` swapped for
    /// `/llm`. Other URLs are used as-is.
    pub fn llm_url(&self) -> String {
        match self.backend_url.strip_suffix("/run") {
            Some(base) => format!("{base}/llm"),
            None => self.backend_url.clone(),
        }
    }

    /// A copy safe to print, with the API key masked.
    pub fn masked(&self) -> Settings {
        let mut copy = self.clone();
        if !copy.openai_api_key.is_empty() {
            copy.openai_api_key = MASK.to_string();
        }
        copy
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.openai_api_key.is_empty() {
            ""
        } else {
            MASK
        };
        f.debug_struct("Settings")
            .field("backend_url", &self.backend_url)
            .field("use_kernel", &self.use_kernel)
            .field("enable_python", &self.enable_python)
            .field("enable_js", &self.enable_js)
            .field("enable_llm", &self.enable_llm)
            .field("llm_provider", &self.llm_provider)
            .field("openai_api_key", &api_key)
            .field("ollama_model", &self.ollama_model)
            .field("ollama_url", &self.ollama_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
