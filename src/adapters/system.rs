use crate::domain::model::{ActivatedEnv, ChildExit, Interpreter, PythonVersion, RunContext};
use crate::domain::ports::Toolchain;
use crate::utils::error::{LaunchError, Result};
use std::path::Path;
use std::process::{Command, Output};

/// 以子行程執行真正的直譯器、`venv` 與 `pip`
#[derive(Debug, Clone, Default)]
pub struct SystemToolchain;

impl SystemToolchain {
    pub fn new() -> Self {
        Self
    }

    /// 以已啟用的 venv 執行 python：PATH、VIRTUAL_ENV 只設定在子行程上
    fn in_env(ctx: &RunContext, env: &ActivatedEnv) -> Command {
        let mut cmd = Command::new(&env.python);
        cmd.current_dir(&ctx.workdir);
        for (key, value) in env.child_vars(std::env::var_os("PATH")) {
            match value {
                Some(value) => {
                    cmd.env(key, value);
                }
                None => {
                    cmd.env_remove(key);
                }
            }
        }
        cmd
    }

    fn probe_version(path: &Path) -> Option<PythonVersion> {
        let output = Command::new(path).arg("--version").output().ok()?;
        if !output.status.success() {
            tracing::debug!("{} --version exited with {}", path.display(), output.status);
            return None;
        }
        // Python 2 prints the version on stderr
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        PythonVersion::from_version_output(&text)
    }
}

fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let last = stderr.lines().rev().find(|l| !l.trim().is_empty());
    match last {
        Some(line) => format!("{} ({})", output.status, line.trim()),
        None => output.status.to_string(),
    }
}

impl Toolchain for SystemToolchain {
    fn find_interpreter(&self, ctx: &RunContext) -> Result<Interpreter> {
        let mut too_old: Option<Interpreter> = None;

        for candidate in &ctx.candidates {
            let path = match which::which(candidate) {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("Interpreter candidate '{}' not found: {}", candidate, e);
                    continue;
                }
            };

            let Some(version) = Self::probe_version(&path) else {
                tracing::debug!("Could not read a version from {}", path.display());
                continue;
            };
            tracing::debug!("Found Python {} at {}", version, path.display());

            if version >= ctx.min_version {
                return Ok(Interpreter { path, version });
            }
            too_old.get_or_insert(Interpreter { path, version });
        }

        match too_old {
            Some(found) => Err(LaunchError::InterpreterTooOld {
                path: found.path,
                found: found.version,
                min_version: ctx.min_version,
                download_url: ctx.download_url.clone(),
            }),
            None => Err(LaunchError::InterpreterNotFound {
                min_version: ctx.min_version,
                tried: ctx.candidates.join(", "),
                download_url: ctx.download_url.clone(),
            }),
        }
    }

    fn create_env(&self, ctx: &RunContext, interpreter: &Interpreter) -> Result<()> {
        let output = Command::new(&interpreter.path)
            .arg("-m")
            .arg("venv")
            .arg(&ctx.env_dir)
            .current_dir(&ctx.workdir)
            .output()
            .map_err(|e| LaunchError::EnvCreationError {
                path: ctx.env_dir.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(LaunchError::EnvCreationError {
                path: ctx.env_dir.clone(),
                reason: stderr_tail(&output),
            });
        }
        Ok(())
    }

    fn upgrade_installer(&self, ctx: &RunContext, env: &ActivatedEnv) -> Result<()> {
        let status = Self::in_env(ctx, env)
            .args(["-m", "pip", "install", "--upgrade", "pip"])
            .status()
            .map_err(|e| LaunchError::InstallerUpgradeError {
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(LaunchError::InstallerUpgradeError {
                reason: ChildExit::from(status).to_string(),
            });
        }
        Ok(())
    }

    fn install_manifest(&self, ctx: &RunContext, env: &ActivatedEnv) -> Result<()> {
        let status = Self::in_env(ctx, env)
            .args(["-m", "pip", "install", "-r"])
            .arg(&ctx.manifest)
            .status()
            .map_err(|e| LaunchError::DependencyInstallError {
                manifest: ctx.manifest.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(LaunchError::DependencyInstallError {
                manifest: ctx.manifest.clone(),
                reason: ChildExit::from(status).to_string(),
            });
        }
        Ok(())
    }

    fn run_entry_point(&self, ctx: &RunContext, env: &ActivatedEnv) -> Result<ChildExit> {
        let status = Self::in_env(ctx, env)
            .arg(&ctx.entry_point)
            .status()
            .map_err(|e| LaunchError::EntryPointFailed {
                status: format!("failed to start: {}", e),
            })?;
        Ok(status.into())
    }
}
