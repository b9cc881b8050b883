pub mod completions;
pub mod fetch;
pub mod man_pages;
pub mod update;

use indicatif::{ProgressBar, ProgressStyle};
use modelsrc_remote::config::default_config_path;
use modelsrc_remote::RegistryConfig;
use modelsrc_schema::ModelReference;
use std::path::PathBuf;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_REFERENCE_ERROR: u8 = 2;
pub const EXIT_REGISTRY_ERROR: u8 = 3;
pub const EXIT_RECIPE_ERROR: u8 = 4;

/// Environment variable naming an explicit registry config file.
pub const CONFIG_ENV: &str = "MODELSRC_CONFIG";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn parse_reference(input: &str) -> Result<ModelReference, String> {
    input
        .parse()
        .map_err(|e| format!("invalid model reference: {e}"))
}

/// Build the registry config: config file (or built-in defaults), then flags.
pub fn registry_config(url: Option<&str>, timeout: Option<u64>) -> Result<RegistryConfig, String> {
    let mut config = load_config_file()?;
    if let Some(url) = url {
        config = RegistryConfig::new(url).with_timeout(config.timeout_secs);
    }
    if let Some(secs) = timeout {
        config = config.with_timeout(secs);
    }
    config
        .validate()
        .map_err(|e| format!("registry error: {e}"))?;
    tracing::debug!("registry {} (timeout {}s)", config.url, config.timeout_secs);
    Ok(config)
}

fn load_config_file() -> Result<RegistryConfig, String> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(path);
        return RegistryConfig::load(&path)
            .map_err(|e| format!("registry error: {}: {e}", path.display()));
    }

    let Ok(path) = default_config_path() else {
        return Ok(RegistryConfig::default());
    };
    if !path.exists() {
        return Ok(RegistryConfig::default());
    }
    RegistryConfig::load(&path).or_else(|e| {
        tracing::warn!("ignoring {}: {e}", path.display());
        Ok(RegistryConfig::default())
    })
}
