use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::error::{Result, BridgeError};
use crate::packages::PackageSpec;
use crate::translate::classify::DOWNLOAD_MARKERS;

fn default_download_markers() -> Vec<String> {
    DOWNLOAD_MARKERS.iter().map(|m| m.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: EnvironmentConfig,
    pub packages: PackagesConfig,
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Directory holding the virtual environment
    pub root: PathBuf,
    /// System interpreter used to create the environment (e.g., python3)
    pub system_interpreter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// How the required packages are installed during setup
    pub policy: InstallPolicy,
    /// Packages that must be present before any translation
    pub required: Vec<PackageSpec>,
    /// Time budget for a single `pip install`, unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallPolicy {
    /// Sequential: one package at a time, stop at the first failure
    Sequential,
    /// Concurrent: all packages at once against the same environment
    Concurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation script run with the environment interpreter; setup
    /// writes the bundled script here when the file is missing
    pub script_path: PathBuf,
    /// Model identifiers, index 0 is the default
    pub models: Vec<String>,
    /// JSON language table overriding the built-in FLORES-200 table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages_path: Option<PathBuf>,
    /// Time budget for a single translation run, unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Lines on stdout that report a first-run model download
    #[serde(default = "default_download_markers")]
    pub download_markers: Vec<String>,
}

impl PackagesConfig {
    pub fn install_timeout(&self) -> Option<Duration> {
        self.install_timeout_secs.map(Duration::from_secs)
    }
}

impl TranslateConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig {
                root: PathBuf::from(".nllb-bridge").join("venv"),
                system_interpreter: default_system_interpreter().to_string(),
            },
            packages: PackagesConfig {
                policy: InstallPolicy::Sequential,
                required: vec![
                    PackageSpec::new("transformers"),
                    PackageSpec::new("numpy").with_requirement("<2"),
                    PackageSpec::new("torch"),
                    PackageSpec::new("torchvision"),
                    PackageSpec::new("torchaudio"),
                ],
                install_timeout_secs: None,
            },
            translate: TranslateConfig {
                script_path: PathBuf::from(".nllb-bridge").join("translate.py"),
                models: vec![
                    "facebook/nllb-200-distilled-600M".to_string(),
                    "facebook/nllb-200-distilled-1.3B".to_string(),
                    "facebook/nllb-200-1.3B".to_string(),
                    "facebook/nllb-200-3.3B".to_string(),
                ],
                languages_path: None,
                timeout_secs: None,
                download_markers: default_download_markers(),
            },
        }
    }
}

fn default_system_interpreter() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BridgeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| BridgeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
