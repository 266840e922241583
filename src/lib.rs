pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{SystemToolchain, TerminalConsole};
pub use config::LauncherConfig;
pub use core::launcher::{Launcher, APP_NAME};
pub use utils::error::{LaunchError, Result};
