//! Configuration loading and the service handle shared by command handlers.

use anyhow::Context;
use rct_config::RctConfig;
use rct_db::service::RctService;

use crate::cli::GlobalFlags;

/// Load configuration (with `.env`) and apply the `--database` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<RctConfig> {
    let mut config = RctConfig::load_with_dotenv().context("failed to load rct configuration")?;
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
    Ok(config)
}

pub struct AppContext {
    pub service: RctService,
    pub config: RctConfig,
}

impl AppContext {
    pub async fn init(config: RctConfig) -> anyhow::Result<Self> {
        let offset = config.server.fixed_offset()?;
        let service = RctService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?
            .with_fixed_offset(offset);
        Ok(Self { service, config })
    }
}
