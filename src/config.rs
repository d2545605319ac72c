use crate::error::{BubblexanError, Result};
use crate::types::config::BubblexanConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "bubblexan.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".bubblexan/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/bubblexan/config.toml";

/// Global, project and local layers, later ones overriding earlier ones key by key.
pub fn load_config(root: &Path) -> Result<BubblexanConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<BubblexanConfig> {
    let layers: Vec<PathBuf> = global_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain([root.join(DEFAULT_CONFIG_FILE), root.join(DEFAULT_LOCAL_FILE)])
        .filter(|path| path.is_file())
        .collect();
    if layers.is_empty() {
        tracing::debug!("no configuration files found; using defaults");
        return Ok(BubblexanConfig::default());
    }

    let mut merged = Map::new();
    for path in &layers {
        overlay_table(&mut merged, read_layer(path)?);
        tracing::debug!(path = %path.display(), "configuration layer applied");
    }

    let cfg: BubblexanConfig = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| BubblexanError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn read_layer(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| BubblexanError::ConfigParse(format!("{}: {e}", path.display())))
}

// Nested tables merge recursively; any other value replaces what was there.
fn overlay_table(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match value {
            Value::Table(nested) => match base.get_mut(&key) {
                Some(Value::Table(existing)) => overlay_table(existing, nested),
                _ => {
                    base.insert(key, Value::Table(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}
