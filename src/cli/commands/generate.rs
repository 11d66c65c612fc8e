//! Generate command - build the layered cache file for one stylesheet

use crate::cache::LayerCache;
use crate::cli::args::GenerateArgs;
use crate::config::Config;
use crate::error::LayeredResult;
use crate::render::resolve_source;
use crate::ui::{self, UiContext};

/// Execute the generate command
pub async fn execute(args: GenerateArgs, config: &Config) -> LayeredResult<()> {
    let ctx = UiContext::detect();

    let source = resolve_source(&args.source, &config.site);
    let cache = LayerCache::from_config(config);
    cache.init()?;

    let generation = cache.generate(&args.handle, &source, &config.layer.name)?;
    let published = cache.publish(generation.path())?;

    if generation.was_regenerated() {
        ui::step_ok_detail(&ctx, "Generated", &generation.path().display().to_string());
    } else {
        ui::step_info(&ctx, "Cache is up to date");
    }
    ui::key_value(&ctx, "Layer", &config.layer.name);
    ui::key_value(&ctx, "URL", &published.url);
    ui::key_value(&ctx, "Version", &published.version.to_string());

    Ok(())
}
