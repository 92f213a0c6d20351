use anyhow::Context;
use cryptodash::analytics::FilterCriteria;
use cryptodash::config::ConfigManager;
use cryptodash::data::{DatasetCache, DatasetMetadata};
use cryptodash::view;
use log::info;
use std::path::Path;

const CONFIG_FILE: &str = "cryptodash.toml";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if Path::new(CONFIG_FILE).exists() {
        manager
            .load_from_file(CONFIG_FILE)
            .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;
    }
    let config = manager.get().dashboard;

    let cache = DatasetCache::new();
    let dataset = cache.get_or_load(&config.data_path, &config.date_column)?;

    let metadata = DatasetMetadata::describe(&config.data_path, &dataset);
    info!(
        "{}: {} rows, {} assets",
        metadata.source,
        metadata.num_rows,
        metadata.assets.len()
    );

    let criteria = FilterCriteria::default_for(&dataset, config.selection_limit)
        .ok_or_else(|| anyhow::anyhow!("{} contains no rows", config.data_path.display()))?;

    let dashboard = view::render(&dataset, &criteria)?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}
