//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable naming the data root folder
pub const ROOT_ENV_VAR: &str = "CLINMIND_ROOT";

/// Environment variable holding the generative-AI credential
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Sentinel credential selecting the local deterministic analyzer
pub const LOCAL_MODE_KEY: &str = "demo_local_key";

/// File name of the measurement slot inside the data root
pub const SLOT_FILE_NAME: &str = "measurements.json";

/// Data root resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. CLINMIND_ROOT environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Path of the measurement slot inside a resolved data root
pub fn slot_path(root: &std::path::Path) -> PathBuf {
    root.join(SLOT_FILE_NAME)
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/clinmind/config.toml first, then /etc/clinmind/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("clinmind").join("config.toml"));
        let system_config = PathBuf::from("/etc/clinmind/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("clinmind").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// OS-dependent default data root
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/clinmind (or /var/lib/clinmind for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("clinmind"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/clinmind"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/clinmind
        dirs::data_dir()
            .map(|d| d.join("clinmind"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/clinmind"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\clinmind
        dirs::data_local_dir()
            .map(|d| d.join("clinmind"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\clinmind"))
    } else {
        PathBuf::from("./clinmind_data")
    }
}

/// Remote analysis credential state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisCredential {
    /// Real credential for the remote generative-AI service
    Remote(String),
    /// No usable credential; the deterministic local analyzer stands in
    LocalMode,
}

/// Read the analysis credential from the environment.
///
/// An absent, blank, or `demo_local_key` value selects local mode so that
/// development environments without a real key never hard-fail.
pub fn analysis_credential() -> AnalysisCredential {
    match std::env::var(API_KEY_ENV_VAR) {
        Ok(key) if !key.trim().is_empty() && key != LOCAL_MODE_KEY => {
            AnalysisCredential::Remote(key)
        }
        _ => AnalysisCredential::LocalMode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_takes_priority() {
        let root = resolve_root_folder(Some("/tmp/clinmind-test"));
        assert_eq!(root, PathBuf::from("/tmp/clinmind-test"));
    }

    #[test]
    fn test_default_root_is_non_empty() {
        let root = resolve_root_folder(None);
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn test_slot_path_appends_file_name() {
        let slot = slot_path(std::path::Path::new("/data/clinmind"));
        assert_eq!(slot, PathBuf::from("/data/clinmind/measurements.json"));
    }
}
