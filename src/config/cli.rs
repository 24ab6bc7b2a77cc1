use crate::config::toml_config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "city-info")]
#[command(about = "Cities and points of interest over HTTP")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "city-info.toml")]
    pub config: String,

    /// Override server.bind_address from the config file
    #[arg(long)]
    pub bind: Option<String>,

    /// Drop the stored snapshot and reseed on startup
    #[arg(long)]
    pub reset_store: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if self.reset_store {
            config.storage.reset_on_startup = true;
        }
    }
}
