use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 啟動流程的各階段，依序執行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CheckInterpreter,
    ProvisionEnv,
    Activate,
    InstallDeps,
    RunEntryPoint,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::CheckInterpreter,
        Stage::ProvisionEnv,
        Stage::Activate,
        Stage::InstallDeps,
        Stage::RunEntryPoint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::CheckInterpreter => "check-interpreter",
            Stage::ProvisionEnv => "provision-env",
            Stage::Activate => "activate",
            Stage::InstallDeps => "install-deps",
            Stage::RunEntryPoint => "run-entry-point",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PythonVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// 從 `python --version` 的輸出解析版本（舊版直譯器會寫到 stderr）
    pub fn from_version_output(output: &str) -> Option<Self> {
        let re = Regex::new(r"Python\s+(\d+)\.(\d+)(?:\.(\d+))?").ok()?;
        let caps = re.captures(output)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        let patch = caps
            .get(3)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::new(3, 8, 0)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for PythonVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(format!("expected MAJOR[.MINOR[.PATCH]], got '{}'", s));
        }
        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("'{}' is not a number in version '{}'", part, s))?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl<'de> Deserialize<'de> for PythonVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 找到且符合版本需求的基礎直譯器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub path: PathBuf,
    pub version: PythonVersion,
}

/// 單次執行的所有路徑。各階段只讀取這個值，不修改行程全域狀態（cwd、PATH）。
#[derive(Debug, Clone)]
pub struct RunContext {
    pub workdir: PathBuf,
    pub env_dir: PathBuf,
    pub manifest: PathBuf,
    pub entry_point: PathBuf,
    pub min_version: PythonVersion,
    pub candidates: Vec<String>,
    pub download_url: String,
    pub upgrade_installer: bool,
    pub interpreter: Option<Interpreter>,
}

impl RunContext {
    /// 顯示給使用者的 requirements 檔名
    pub fn manifest_name(&self) -> String {
        display_name(&self.manifest)
    }

    pub fn env_name(&self) -> String {
        display_name(&self.env_dir)
    }

    pub fn env_exists(&self) -> bool {
        self.env_dir.is_dir()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 已啟用的虛擬環境。只套用到子行程，不改動本行程的環境變數。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedEnv {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub python: PathBuf,
}

impl ActivatedEnv {
    /// 依 venv 目錄結構找出直譯器：POSIX 為 bin/，Windows 為 Scripts/
    pub fn locate(root: &Path) -> Option<Self> {
        let layouts = [
            ("Scripts", "python.exe"),
            ("bin", "python"),
            ("bin", "python3"),
        ];
        layouts.iter().find_map(|(bin, exe)| {
            let python = root.join(bin).join(exe);
            python.is_file().then(|| Self {
                root: root.to_path_buf(),
                bin_dir: root.join(bin),
                python,
            })
        })
    }

    /// 子行程需要的環境變數，效果等同在 shell 中 activate；`None` 表示移除該變數
    pub fn child_vars(&self, inherited_path: Option<OsString>) -> Vec<(OsString, Option<OsString>)> {
        let mut entries = vec![self.bin_dir.clone()];
        if let Some(path) = inherited_path {
            entries.extend(std::env::split_paths(&path));
        }
        let path = std::env::join_paths(entries)
            .unwrap_or_else(|_| self.bin_dir.clone().into_os_string());

        vec![
            (OsString::from("VIRTUAL_ENV"), Some(self.root.clone().into_os_string())),
            (OsString::from("PATH"), Some(path)),
            (OsString::from("PYTHONHOME"), None),
        ]
    }
}

/// requirements 檔案中的有效項目數（略過空行與註解）
pub fn count_requirements(content: &str) -> usize {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .count()
}

/// 子行程結束狀態；`code` 為 `None` 表示被訊號終止
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    pub code: Option<i32>,
}

impl ChildExit {
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ChildExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("no exit code (terminated by a signal)"),
        }
    }
}

/// 單次啟動的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub exit_code: i32,
    pub completed: Vec<Stage>,
    pub failed_stage: Option<Stage>,
}

impl Outcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
