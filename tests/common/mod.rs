#![allow(dead_code)]

use pi_launcher::domain::model::{ActivatedEnv, ChildExit, Interpreter, PythonVersion, RunContext};
use pi_launcher::domain::ports::{Console, Level, Toolchain};
use pi_launcher::{LaunchError, LauncherConfig, Result};
use std::cell::RefCell;
use std::path::Path;

/// 記錄所有輸出與暫停次數
#[derive(Default)]
pub struct RecordingConsole {
    pub lines: Vec<(Level, String)>,
    pub pauses: usize,
}

impl RecordingConsole {
    pub fn has(&self, level: Level, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|(l, text)| *l == level && text.contains(needle))
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, text)| text.contains(needle))
    }

    /// 以終端機格式（含前綴）比對
    pub fn rendered_has(&self, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|(level, text)| format!("{} {}", level.prefix(), text).starts_with(needle))
    }
}

impl Console for RecordingConsole {
    fn line(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }
}

/// 不啟動任何行程的假工具鏈
pub struct FakeToolchain {
    pub interpreter_found: bool,
    pub create_ok: bool,
    pub upgrade_ok: bool,
    pub install_ok: bool,
    pub entry_exit: i32,
    pub calls: RefCell<Vec<&'static str>>,
}

impl Default for FakeToolchain {
    fn default() -> Self {
        Self {
            interpreter_found: true,
            create_ok: true,
            upgrade_ok: true,
            install_ok: true,
            entry_exit: 0,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeToolchain {
    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    pub fn called(&self, call: &str) -> bool {
        self.count(call) > 0
    }
}

impl Toolchain for FakeToolchain {
    fn find_interpreter(&self, ctx: &RunContext) -> Result<Interpreter> {
        self.calls.borrow_mut().push("find_interpreter");
        if self.interpreter_found {
            Ok(Interpreter {
                path: "/usr/bin/python3".into(),
                version: PythonVersion::new(3, 11, 4),
            })
        } else {
            Err(LaunchError::InterpreterNotFound {
                min_version: ctx.min_version,
                tried: ctx.candidates.join(", "),
                download_url: ctx.download_url.clone(),
            })
        }
    }

    fn create_env(&self, ctx: &RunContext, _interpreter: &Interpreter) -> Result<()> {
        self.calls.borrow_mut().push("create_env");
        if !self.create_ok {
            return Err(LaunchError::EnvCreationError {
                path: ctx.env_dir.clone(),
                reason: "exit status: 1".to_string(),
            });
        }
        seed_env(&ctx.env_dir);
        Ok(())
    }

    fn upgrade_installer(&self, _ctx: &RunContext, _env: &ActivatedEnv) -> Result<()> {
        self.calls.borrow_mut().push("upgrade_installer");
        if self.upgrade_ok {
            Ok(())
        } else {
            Err(LaunchError::InstallerUpgradeError {
                reason: "exit code 1".to_string(),
            })
        }
    }

    fn install_manifest(&self, ctx: &RunContext, _env: &ActivatedEnv) -> Result<()> {
        self.calls.borrow_mut().push("install_manifest");
        if self.install_ok {
            Ok(())
        } else {
            Err(LaunchError::DependencyInstallError {
                manifest: ctx.manifest.clone(),
                reason: "exit code 1".to_string(),
            })
        }
    }

    fn run_entry_point(&self, _ctx: &RunContext, _env: &ActivatedEnv) -> Result<ChildExit> {
        self.calls.borrow_mut().push("run_entry_point");
        Ok(ChildExit::exited(self.entry_exit))
    }
}

/// 建立一個看起來已完成的 venv（含 bin/python）
pub fn seed_env(env_dir: &Path) {
    std::fs::create_dir_all(env_dir.join("bin")).unwrap();
    std::fs::write(env_dir.join("bin").join("python"), "").unwrap();
}

pub fn write_entry_point(workdir: &Path) {
    std::fs::write(workdir.join("main.py"), "import sys\nsys.exit(0)\n").unwrap();
}

pub fn write_manifest(workdir: &Path) {
    std::fs::write(
        workdir.join("requirements.txt"),
        "PyQt6>=6.5\npandas\nmatplotlib\n",
    )
    .unwrap();
}

pub fn context(workdir: &Path) -> RunContext {
    LauncherConfig::default().to_context(workdir)
}
