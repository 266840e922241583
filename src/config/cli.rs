use crate::config::{LauncherConfig, DEFAULT_CONFIG_FILE};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pi-launcher")]
#[command(about = "Sets up the Python environment for PI Data Extractor Pro and starts it")]
pub struct CliArgs {
    #[arg(long, default_value = ".", help = "Application directory")]
    pub workdir: PathBuf,

    #[arg(long, help = "Launcher config file (default: <workdir>/launcher.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Exit immediately on errors instead of waiting for Enter")]
    pub no_pause: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.workdir.join(DEFAULT_CONFIG_FILE))
    }

    /// 載入設定檔並套用命令列覆寫
    pub fn load_config(&self) -> Result<LauncherConfig> {
        let path = self.config_path();
        let mut config = match &self.config {
            // 明確指定的檔案必須存在
            Some(_) => LauncherConfig::from_file(&path)?,
            None => LauncherConfig::load_optional(&path)?,
        };
        if self.no_pause {
            config.behavior.pause_on_error = false;
        }
        Ok(config)
    }
}
