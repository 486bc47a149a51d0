use log::debug;

use crate::protocol::{Language, LlmMode, LlmRequest, RunRequest};
use crate::settings::Settings;

/// What a block's language tag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Code(Language),
    Llm(LlmMode),
}

/// A fully built backend request for one block.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Execute(RunRequest),
    Llm(LlmRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("language `{0}` is not supported")]
    LanguageUnsupported(String),
    #[error("{0} blocks are disabled in settings")]
    LanguageDisabled(&'static str),
}

impl Target {
    /// Resolve a fence tag. Only `python`, `javascript`/`js` and
    /// `llm`/`agent` are known, compared case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Target> {
        match tag.to_ascii_lowercase().as_str() {
            "python" => Some(Target::Code(Language::Python)),
            "javascript" | "js" => Some(Target::Code(Language::JavaScript)),
            "llm" => Some(Target::Llm(LlmMode::Llm)),
            "agent" => Some(Target::Llm(LlmMode::Agent)),
            _ => None,
        }
    }

    /// Resolve `tag` and check it against the enable toggles in `settings`.
    pub fn resolve(tag: &str, settings: &Settings) -> Result<Target, RouteError> {
        let target =
            Target::from_tag(tag).ok_or_else(|| RouteError::LanguageUnsupported(tag.to_string()))?;
        let (enabled, name) = match target {
            Target::Code(Language::Python) => (settings.enable_python, "Python"),
            Target::Code(Language::JavaScript) => (settings.enable_js, "JavaScript"),
            Target::Llm(_) => (settings.enable_llm, "LLM"),
        };
        if !enabled {
            return Err(RouteError::LanguageDisabled(name));
        }
        Ok(target)
    }

    /// Build the request carrying `code` for this target.
    pub fn request(self, code: String, settings: &Settings) -> Route {
        match self {
            Target::Code(language) => Route::Execute(RunRequest {
                language,
                code,
                kernel: settings.use_kernel && language == Language::Python,
            }),
            Target::Llm(mode) => Route::Llm(LlmRequest {
                mode,
                prompt: code,
                provider: Some(settings.llm_provider),
                openai_api_key: Some(settings.openai_api_key.clone())
                    .filter(|key| !key.is_empty()),
                ollama_model: Some(settings.ollama_model.clone()),
                ollama_url: Some(settings.ollama_url.clone()),
            }),
        }
    }
}

/// Route a block with language `tag` and body `code`.
///
/// Rejected tags never produce a request.
pub fn route(tag: &str, code: String, settings: &Settings) -> Result<Route, RouteError> {
    let target = Target::resolve(tag, settings)?;
    debug!("routing `{}` block to {:?}", tag, target);
    Ok(target.request(code, settings))
}
