use crate::domain::model::{ActivatedEnv, ChildExit, Interpreter, RunContext};
use crate::utils::error::Result;

/// 外部程序：直譯器、venv、pip、應用程式進入點
pub trait Toolchain {
    /// 找出版本不低於 `ctx.min_version` 的基礎直譯器
    fn find_interpreter(&self, ctx: &RunContext) -> Result<Interpreter>;
    fn create_env(&self, ctx: &RunContext, interpreter: &Interpreter) -> Result<()>;
    fn upgrade_installer(&self, ctx: &RunContext, env: &ActivatedEnv) -> Result<()>;
    fn install_manifest(&self, ctx: &RunContext, env: &ActivatedEnv) -> Result<()>;
    fn run_entry_point(&self, ctx: &RunContext, env: &ActivatedEnv) -> Result<ChildExit>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    /// 主控台輸出的前綴
    pub fn prefix(&self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Warning => "[WARNING]",
            Level::Error => "[ERROR]",
        }
    }
}

/// 使用者看得到的輸出與「按任意鍵」暫停
pub trait Console {
    fn line(&mut self, level: Level, message: &str);
    fn pause(&mut self);

    fn info(&mut self, message: &str) {
        self.line(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.line(Level::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.line(Level::Error, message);
    }
}
