use crate::domain::ports::{Console, Level};
use std::io::{self, BufRead, Write};

/// 互動式終端機：訊息寫到 stdout，暫停時等待 Enter
pub struct TerminalConsole<W = io::Stdout, R = io::StdinLock<'static>> {
    out: W,
    input: R,
    pause_enabled: bool,
}

impl TerminalConsole {
    pub fn new(pause_enabled: bool) -> Self {
        Self::with_io(io::stdout(), io::stdin().lock(), pause_enabled)
    }
}

impl<W: Write, R: BufRead> TerminalConsole<W, R> {
    pub fn with_io(out: W, input: R, pause_enabled: bool) -> Self {
        Self {
            out,
            input,
            pause_enabled,
        }
    }
}

impl<W: Write, R: BufRead> Console for TerminalConsole<W, R> {
    fn line(&mut self, level: Level, message: &str) {
        // 主控台寫入失敗時沒有其他地方可回報
        let _ = writeln!(self.out, "{} {}", level.prefix(), message);
        let _ = self.out.flush();
    }

    fn pause(&mut self) {
        if !self.pause_enabled {
            return;
        }
        let _ = write!(self.out, "Press Enter to exit...");
        let _ = self.out.flush();
        let mut buf = String::new();
        let _ = self.input.read_line(&mut buf);
    }
}
