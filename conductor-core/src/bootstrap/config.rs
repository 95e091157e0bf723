//! Configuration loading

use anyhow::Result;

use crate::Config;

const CONFIG_PATH_ENV: &str = "CONDUCTOR_CONFIG_PATH";

/// Load configuration from config file or environment variables
///
/// Config file search order:
/// 1. `CONDUCTOR_CONFIG_PATH` environment variable (explicit path)
/// 2. ./config.yaml (current working directory)
/// 3. /config/config.yaml (Kubernetes mount path)
/// 4. Fall back to environment variables only
///
/// Runs before logging is initialised, so progress goes to stderr.
pub fn load_config() -> Result<Config> {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| std::path::Path::new(p).exists())
        .or_else(|| existing_path("config.yaml"))
        .or_else(|| existing_path("/config/config.yaml"));

    let config = if let Some(path) = config_path {
        eprintln!("Loading config from {path}");
        Config::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load {path}: {e}"))?
    } else {
        eprintln!("No config file found, using environment variables");
        Config::from_env()?
    };

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    Ok(config)
}

fn existing_path(path: &str) -> Option<String> {
    std::path::Path::new(path).exists().then(|| path.to_string())
}
