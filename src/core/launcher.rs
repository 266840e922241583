use crate::domain::model::{count_requirements, ActivatedEnv, Outcome, RunContext, Stage};
use crate::domain::ports::{Console, Level, Toolchain};
use crate::utils::error::{LaunchError, Result};

pub const APP_NAME: &str = "PI Data Extractor Pro";

/// 啟動器：依序執行各階段，任何一步失敗就停止，不重試
pub struct Launcher<T: Toolchain> {
    toolchain: T,
}

/// 輸出到主控台；日誌只留 debug 紀錄，避免預設 filter 下重複顯示
fn say(console: &mut dyn Console, level: Level, message: &str) {
    tracing::debug!("{} {}", level.prefix(), message);
    console.line(level, message);
}

impl<T: Toolchain> Launcher<T> {
    pub fn new(toolchain: T) -> Self {
        Self { toolchain }
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// 依序執行所有階段，不論成功或失敗都會回報結果
    pub fn run(&self, mut ctx: RunContext, console: &mut dyn Console) -> Outcome {
        say(console, Level::Info, &format!("{} launcher", APP_NAME));
        tracing::debug!("Run context: {:?}", ctx);

        let mut completed = Vec::new();
        let result = self.run_stages(&mut ctx, console, &mut completed);

        let outcome = match result {
            Ok(()) => Outcome {
                exit_code: 0,
                completed,
                failed_stage: None,
            },
            Err(e) => {
                let failed_stage = e.stage();
                tracing::error!(
                    "❌ Launch failed: {} (Category: {:?}, Stage: {:?})",
                    e,
                    e.category(),
                    failed_stage
                );
                say(console, Level::Error, &e.to_string());
                console.info(&e.recovery_suggestion());
                console.pause();

                Outcome {
                    exit_code: e.exit_code(),
                    completed,
                    failed_stage,
                }
            }
        };

        tracing::info!(
            "Launcher finished with exit code {} (completed: {:?}, failed: {:?})",
            outcome.exit_code,
            outcome.completed,
            outcome.failed_stage
        );
        outcome
    }

    fn run_stages(
        &self,
        ctx: &mut RunContext,
        console: &mut dyn Console,
        completed: &mut Vec<Stage>,
    ) -> Result<()> {
        // 1. 直譯器
        say(console, Level::Info, "Checking Python installation...");
        let interpreter = self.toolchain.find_interpreter(ctx)?;
        say(
            console,
            Level::Info,
            &format!(
                "Found Python {} at {}",
                interpreter.version,
                interpreter.path.display()
            ),
        );
        ctx.interpreter = Some(interpreter.clone());
        completed.push(Stage::CheckInterpreter);

        // 2. venv 只在不存在時建立
        if ctx.env_exists() {
            tracing::debug!("Reusing virtual environment at {}", ctx.env_dir.display());
        } else {
            say(
                console,
                Level::Info,
                &format!("Creating virtual environment in {}...", ctx.env_name()),
            );
            self.toolchain.create_env(ctx, &interpreter)?;
        }
        completed.push(Stage::ProvisionEnv);

        // 3. 啟用
        say(console, Level::Info, "Activating virtual environment...");
        let env = ActivatedEnv::locate(&ctx.env_dir).ok_or_else(|| LaunchError::ActivationError {
            path: ctx.env_dir.clone(),
            reason: "no Python interpreter under bin/ or Scripts/".to_string(),
        })?;
        tracing::debug!("Environment interpreter: {}", env.python.display());
        completed.push(Stage::Activate);

        // 4. 依賴
        self.install_dependencies(ctx, &env, console)?;
        completed.push(Stage::InstallDeps);

        // 5. 應用程式
        if !ctx.entry_point.is_file() {
            return Err(LaunchError::EntryPointMissing {
                path: ctx.entry_point.clone(),
            });
        }
        say(console, Level::Info, &format!("Starting {}...", APP_NAME));
        let exit = self.toolchain.run_entry_point(ctx, &env)?;
        if !exit.success() {
            return Err(LaunchError::EntryPointFailed {
                status: exit.to_string(),
            });
        }
        completed.push(Stage::RunEntryPoint);

        Ok(())
    }

    fn install_dependencies(
        &self,
        ctx: &RunContext,
        env: &ActivatedEnv,
        console: &mut dyn Console,
    ) -> Result<()> {
        let manifest = ctx.manifest_name();

        if !ctx.manifest.is_file() {
            say(
                console,
                Level::Warning,
                &format!("{} not found, skipping dependency installation", manifest),
            );
            return Ok(());
        }

        match std::fs::read_to_string(&ctx.manifest) {
            Ok(content) => tracing::debug!(
                "{} lists {} requirement(s)",
                manifest,
                count_requirements(&content)
            ),
            Err(e) => tracing::debug!("Could not read {}: {}", manifest, e),
        }

        if ctx.upgrade_installer {
            say(console, Level::Info, "Upgrading pip...");
            self.toolchain.upgrade_installer(ctx, env)?;
        }

        say(
            console,
            Level::Info,
            &format!("Installing dependencies from {}...", manifest),
        );
        self.toolchain.install_manifest(ctx, env)?;
        say(console, Level::Info, "Dependencies installed");

        Ok(())
    }
}
