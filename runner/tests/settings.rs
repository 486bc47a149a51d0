use std::io::Write;

use runner::Settings;
use runner::protocol::LlmProvider;
use runner::settings::{DEFAULT_BACKEND_URL, SettingsError};

#[test]
fn defaults_match_fresh_install() {
    let settings = Settings::default();
    assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    assert!(settings.use_kernel);
    assert!(settings.enable_python);
    assert!(settings.enable_js);
    assert!(!settings.enable_llm);
    assert_eq!(settings.llm_provider, LlmProvider::Auto);
    assert_eq!(settings.openai_api_key, "");
    assert_eq!(settings.ollama_model, "llama2");
    assert_eq!(settings.ollama_url, "http://localhost:11434");
    assert_eq!(settings.timeout_secs, None);
}

#[test]
fn empty_file_yields_defaults() {
    assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
}

#[test]
fn keys_use_camel_case_names() {
    let settings = Settings::from_toml_str(
        r#"
backendUrl = "http://runner.local:9000/run"
useKernel = false
enableJS = false
enableLLM = true
llmProvider = "openai"
openaiApiKey = "sk-abc"
timeoutSecs = 30
"#,
    )
    .unwrap();

    assert_eq!(settings.backend_url, "http://runner.local:9000/run");
    assert!(!settings.use_kernel);
    assert!(settings.enable_python);
    assert!(!settings.enable_js);
    assert!(settings.enable_llm);
    assert_eq!(settings.llm_provider, LlmProvider::OpenAi);
    assert_eq!(settings.openai_api_key, "sk-abc");
    assert_eq!(settings.timeout_secs, Some(30));
}

#[test]
fn unknown_provider_is_rejected() {
    let error = Settings::from_toml_str(r#"llmProvider = "claude""#).unwrap_err();
    assert!(matches!(error, SettingsError::Parse(_)));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "enablePython = false").unwrap();
    writeln!(file, "ollamaModel = \"mistral\"").unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert!(!settings.enable_python);
    assert_eq!(settings.ollama_model, "mistral");
}

#[test]
fn load_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let error = Settings::load(&path).unwrap_err();
    assert!(matches!(error, SettingsError::Io { .. }));
    assert!(error.to_string().contains("absent.toml"));
}

#[test]
fn llm_url_swaps_trailing_run() {
    let mut settings = Settings::default();
    assert_eq!(settings.llm_url(), "http://localhost:8000/llm");

    settings.backend_url = "http://example.com/run/exec".to_string();
    assert_eq!(settings.llm_url(), "http://example.com/run/exec");
}

#[test]
fn api_key_is_masked_for_display() {
    let settings = Settings {
        openai_api_key: "sk-secret".to_string(),
        ..Settings::default()
    };
    let debug = format!("{:?}", settings);
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("openai_api_key: \"********\""));
    assert!(format!("{:?}", Settings::default()).contains("openai_api_key: \"\""));

    let rendered = settings.masked().to_toml_string().unwrap();
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("openaiApiKey = \"********\""));
    assert!(rendered.contains("enableJS = true"));

    // The masked copy parses back as a settings file.
    let reparsed = Settings::from_toml_str(&rendered).unwrap();
    assert_eq!(reparsed.backend_url, settings.backend_url);
}
