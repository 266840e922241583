#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::{PythonVersion, RunContext};
use crate::utils::error::{LaunchError, Result};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_url, Validate,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "launcher.toml";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://www.python.org/downloads/";

/// launcher.toml 的內容；所有欄位皆可省略
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub python: PythonConfig,
    pub paths: PathsConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    pub min_version: PythonVersion,
    pub candidates: Vec<String>,
    pub download_url: String,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            min_version: PythonVersion::default(),
            candidates: default_candidates(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }
}

// Windows 上 python3 常是 Microsoft Store 的轉址程式，所以先試 python
fn default_candidates() -> Vec<String> {
    let names: &[&str] = if cfg!(windows) {
        &["python", "python3"]
    } else {
        &["python3", "python"]
    };
    names.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub env_dir: String,
    pub manifest: String,
    pub entry_point: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            env_dir: "venv".to_string(),
            manifest: "requirements.txt".to_string(),
            entry_point: "main.py".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub pause_on_error: bool,
    pub upgrade_installer: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            pause_on_error: true,
            upgrade_installer: true,
        }
    }
}

impl LauncherConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LaunchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LaunchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 檔案存在時載入，否則使用預設值
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.is_file() {
            tracing::debug!("Loading launcher config from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No launcher config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// 將相對路徑解析到工作目錄下，產生單次執行的 RunContext
    pub fn to_context(&self, workdir: &Path) -> RunContext {
        let resolve = |p: &str| -> PathBuf {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                workdir.join(path)
            }
        };

        RunContext {
            workdir: workdir.to_path_buf(),
            env_dir: resolve(&self.paths.env_dir),
            manifest: resolve(&self.paths.manifest),
            entry_point: resolve(&self.paths.entry_point),
            min_version: self.python.min_version,
            candidates: self.python.candidates.clone(),
            download_url: self.python.download_url.clone(),
            upgrade_installer: self.behavior.upgrade_installer,
            interpreter: None,
        }
    }
}

impl Validate for LauncherConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_list("python.candidates", &self.python.candidates)?;
        for candidate in &self.python.candidates {
            validate_non_empty_string("python.candidates", candidate)?;
        }
        validate_url("python.download_url", &self.python.download_url)?;

        validate_path("paths.env_dir", &self.paths.env_dir)?;
        validate_path("paths.manifest", &self.paths.manifest)?;
        validate_path("paths.entry_point", &self.paths.entry_point)?;

        if self.python.min_version.major < 3 {
            return Err(LaunchError::InvalidConfigValueError {
                field: "python.min_version".to_string(),
                value: self.python.min_version.to_string(),
                reason: "the venv module requires Python 3".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = LauncherConfig::default();
        assert_eq!(config.python.min_version, PythonVersion::new(3, 8, 0));
        assert_eq!(config.paths.env_dir, "venv");
        assert_eq!(config.paths.manifest, "requirements.txt");
        assert_eq!(config.paths.entry_point, "main.py");
        assert!(config.behavior.pause_on_error);
        assert!(config.behavior.upgrade_installer);
        assert!(config.python.candidates.contains(&"python".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LauncherConfig::from_toml_str(
            r#"
[python]
min_version = "3.10"

[paths]
entry_point = "app.py"
"#,
        )
        .unwrap();

        assert_eq!(config.python.min_version, PythonVersion::new(3, 10, 0));
        assert_eq!(config.paths.entry_point, "app.py");
        assert_eq!(config.paths.env_dir, "venv");
        assert_eq!(config.python.download_url, DEFAULT_DOWNLOAD_URL);
        assert!(config.behavior.pause_on_error);
    }

    #[test]
    fn test_invalid_toml() {
        let result = LauncherConfig::from_toml_str("[python]\nmin_version = \"three\"\n");
        assert!(matches!(result, Err(LaunchError::ConfigError { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = LauncherConfig::default();
        config.python.candidates.clear();
        assert!(config.validate().is_err());

        let mut config = LauncherConfig::default();
        config.paths.manifest = String::new();
        assert!(config.validate().is_err());

        let mut config = LauncherConfig::default();
        config.python.min_version = PythonVersion::new(2, 7, 0);
        assert!(config.validate().is_err());

        let mut config = LauncherConfig::default();
        config.python.download_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_optional_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = LauncherConfig::load_optional(&temp_dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn test_load_optional_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[behavior]\npause_on_error = false\n").unwrap();

        let config = LauncherConfig::load_optional(&path).unwrap();
        assert!(!config.behavior.pause_on_error);
        assert!(config.behavior.upgrade_installer);
    }

    #[test]
    fn test_to_context_resolves_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = LauncherConfig::default().to_context(temp_dir.path());

        assert_eq!(ctx.env_dir, temp_dir.path().join("venv"));
        assert_eq!(ctx.manifest, temp_dir.path().join("requirements.txt"));
        assert_eq!(ctx.entry_point, temp_dir.path().join("main.py"));
        assert_eq!(ctx.manifest_name(), "requirements.txt");
        assert!(ctx.interpreter.is_none());
    }
}
