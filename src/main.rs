use anyhow::Context;
use city_info::utils::{logger, validation::Validate};
use city_info::{AppConfig, CliArgs};
use clap::Parser;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入設定檔，不存在時使用預設值
    let config_exists = Path::new(&args.config).exists();
    let mut config = if config_exists {
        match AppConfig::from_file(&args.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    } else {
        AppConfig::default()
    };
    args.apply_overrides(&mut config);

    // 初始化日誌
    logger::init_logger(&config.logging, args.verbose);

    tracing::info!("Starting city-info");
    if config_exists {
        tracing::info!("📁 Loaded configuration from: {}", args.config);
    } else {
        tracing::warn!("Config file '{}' not found, using defaults", args.config);
    }
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    city_info::app::run(&config)
        .await
        .context("city-info server stopped with an error")
}
