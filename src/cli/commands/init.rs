//! Init command - write a default configuration and prepare the cache

use crate::cache::LayerCache;
use crate::cli::args::InitArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{LayeredError, LayeredResult};
use crate::ui::{self, UiContext};

/// Execute the init command
pub async fn execute(args: InitArgs, manager: &ConfigManager) -> LayeredResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    let config = if path.exists() && !args.force {
        ui::step_info(
            &ctx,
            &format!("Using existing config at {}", path.display()),
        );
        manager.load().await?
    } else {
        let config = Config::default();
        manager.save(&config).await?;
        ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
        config
    };

    let cache = LayerCache::from_config(&config);
    if cache.init()? {
        ui::step_ok_detail(&ctx, "Cache directory created", &cache.dir().display().to_string());
    } else if cache.dir().is_dir() {
        ui::step_info(
            &ctx,
            &format!("Cache directory exists: {}", cache.dir().display()),
        );
    } else {
        return Err(LayeredError::User(format!(
            "{} exists but is not a directory",
            cache.dir().display()
        )));
    }

    Ok(())
}
