use anyhow::Context;
use runboard_core::{CardCatalog, CommandLimits};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a JSON object of card id to display name.
pub fn load_card_catalog(path: &Path) -> anyhow::Result<CardCatalog> {
    let catalog: CardCatalog = load_json(path)?;
    debug!(path = %path.display(), cards = catalog.len(), "card catalog loaded");
    Ok(catalog)
}

pub fn load_limits(path: &Path) -> anyhow::Result<CommandLimits> {
    load_json(path)
}

/// Like [`load_limits`], but a missing file yields the default limits.
pub fn load_limits_or_default(path: &Path) -> anyhow::Result<CommandLimits> {
    if path.exists() {
        load_limits(path)
    } else {
        debug!(path = %path.display(), "no limits file, using defaults");
        Ok(CommandLimits::default())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
