//! tetron - 无头运行内置动画场景。

use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use tetron_host::{AppConfig, Cli, logging};

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("tetron error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, load_error) = match AppConfig::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    cli.apply(&mut config);

    logging::init(config.log_level()?);
    match load_error {
        Some(e) => warn!(error = %e, "配置文件加载失败，使用默认配置"),
        None => info!(path = %cli.config.display(), "配置文件加载成功"),
    }

    let outcome = tetron_host::run(&config)?;
    info!(frames = outcome.frames, draws = outcome.draws, "运行结束");
    println!("{}", outcome.summary);
    Ok(())
}
