use crate::domain::model::{PythonVersion, Stage};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Python {min_version} or newer was not found (tried: {tried})")]
    InterpreterNotFound {
        min_version: PythonVersion,
        tried: String,
        download_url: String,
    },

    #[error("Python {} at {} is too old, {} or newer is required", .found, .path.display(), .min_version)]
    InterpreterTooOld {
        path: PathBuf,
        found: PythonVersion,
        min_version: PythonVersion,
        download_url: String,
    },

    #[error("Failed to create virtual environment at {}: {}", .path.display(), .reason)]
    EnvCreationError { path: PathBuf, reason: String },

    #[error("Failed to activate virtual environment at {}: {}", .path.display(), .reason)]
    ActivationError { path: PathBuf, reason: String },

    #[error("Failed to upgrade pip: {reason}")]
    InstallerUpgradeError { reason: String },

    #[error("Failed to install dependencies from {}: {}", .manifest.display(), .reason)]
    DependencyInstallError { manifest: PathBuf, reason: String },

    #[error("Entry point {} was not found", .path.display())]
    EntryPointMissing { path: PathBuf },

    #[error("Application exited with {status}")]
    EntryPointFailed { status: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 直譯器或虛擬環境問題
    Environment,
    /// requirements 安裝失敗
    Dependency,
    /// 應用程式本身失敗
    Delegation,
    Configuration,
}

impl LaunchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LaunchError::InterpreterNotFound { .. }
            | LaunchError::InterpreterTooOld { .. }
            | LaunchError::EnvCreationError { .. }
            | LaunchError::ActivationError { .. }
            | LaunchError::IoError(_) => ErrorCategory::Environment,
            LaunchError::InstallerUpgradeError { .. }
            | LaunchError::DependencyInstallError { .. } => ErrorCategory::Dependency,
            LaunchError::EntryPointMissing { .. } | LaunchError::EntryPointFailed { .. } => {
                ErrorCategory::Delegation
            }
            LaunchError::ConfigError { .. } | LaunchError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// 錯誤所屬的啟動階段；配置錯誤發生在任何階段之前
    pub fn stage(&self) -> Option<Stage> {
        match self {
            LaunchError::InterpreterNotFound { .. } | LaunchError::InterpreterTooOld { .. } => {
                Some(Stage::CheckInterpreter)
            }
            LaunchError::EnvCreationError { .. } => Some(Stage::ProvisionEnv),
            LaunchError::ActivationError { .. } => Some(Stage::Activate),
            LaunchError::InstallerUpgradeError { .. }
            | LaunchError::DependencyInstallError { .. } => Some(Stage::InstallDeps),
            LaunchError::EntryPointMissing { .. } | LaunchError::EntryPointFailed { .. } => {
                Some(Stage::RunEntryPoint)
            }
            LaunchError::ConfigError { .. }
            | LaunchError::InvalidConfigValueError { .. }
            | LaunchError::IoError(_) => None,
        }
    }

    /// 所有失敗的結束碼都是 1，類別只由訊息區分
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LaunchError::InterpreterNotFound {
                min_version,
                download_url,
                ..
            }
            | LaunchError::InterpreterTooOld {
                min_version,
                download_url,
                ..
            } => format!(
                "Install Python {} or newer from {} and make sure it is on PATH",
                min_version, download_url
            ),
            LaunchError::EnvCreationError { path, .. } => format!(
                "Check that the venv module is available and that {} is writable",
                path.display()
            ),
            LaunchError::ActivationError { path, .. } => format!(
                "Delete {} and run the launcher again to recreate it",
                path.display()
            ),
            LaunchError::InstallerUpgradeError { .. } => {
                "Check your network connection or proxy settings".to_string()
            }
            LaunchError::DependencyInstallError { manifest, .. } => format!(
                "Check the package names and versions listed in {}",
                manifest.display()
            ),
            LaunchError::EntryPointMissing { .. } => {
                "Run the launcher from the application directory".to_string()
            }
            LaunchError::EntryPointFailed { .. } => {
                "See the application output above for details".to_string()
            }
            LaunchError::ConfigError { .. } | LaunchError::InvalidConfigValueError { .. } => {
                "Fix launcher.toml or remove it to use the defaults".to_string()
            }
            LaunchError::IoError(_) => "Check file permissions in the working directory".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
