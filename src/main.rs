use anyhow::Context;
use clap::Parser;
use pi_launcher::domain::ports::Console;
use pi_launcher::utils::{logger, validation::Validate};
use pi_launcher::{CliArgs, Launcher, SystemToolchain, TerminalConsole};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);
    tracing::debug!("CLI args: {:?}", args);

    let workdir = std::path::absolute(&args.workdir)
        .with_context(|| format!("Cannot resolve working directory {}", args.workdir.display()))?;

    // 載入並驗證配置
    let config = match args.load_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            let mut console = TerminalConsole::new(!args.no_pause);
            console.error(&e.to_string());
            console.info(&e.recovery_suggestion());
            console.pause();
            std::process::exit(e.exit_code());
        }
    };

    let mut console = TerminalConsole::new(config.behavior.pause_on_error);
    let ctx = config.to_context(&workdir);

    let launcher = Launcher::new(SystemToolchain::new());
    let outcome = launcher.run(ctx, &mut console);

    std::process::exit(outcome.exit_code);
}

