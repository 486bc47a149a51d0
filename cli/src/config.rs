use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;

use runner::Settings;

/// Settings overrides accepted by every subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct SettingsArgs {
    /// Backend execution URL (overrides `backendUrl`)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Run Python without the persistent kernel
    #[arg(long)]
    pub no_kernel: bool,

    /// Allow ```llm and ```agent blocks
    #[arg(long)]
    pub enable_llm: bool,

    /// Request timeout in seconds (overrides `timeoutSecs`)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl SettingsArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.backend_url {
            settings.backend_url = url.clone();
        }
        if self.no_kernel {
            settings.use_kernel = false;
        }
        if self.enable_llm {
            settings.enable_llm = true;
        }
        if let Some(secs) = self.timeout {
            settings.timeout_secs = Some(secs);
        }
    }
}

/// `$CONFIG_DIR/coderun/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("coderun").join("config.toml"))
}

/// Pick the settings file: an explicit path must exist; the default location
/// is used only if present.
pub fn config_source(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.is_file()),
    }
}

pub fn load_settings(explicit: Option<&Path>, overrides: &SettingsArgs) -> anyhow::Result<Settings> {
    let mut settings = match config_source(explicit) {
        Some(path) => {
            debug!("loading settings from {}", path.display());
            Settings::load(&path).with_context(|| format!("in settings file {}", path.display()))?
        }
        None => Settings::default(),
    };
    overrides.apply(&mut settings);
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}
