//! Shared command context: effective configuration plus the storage it points at.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use junkyard_core::config::JunkyardConfig;
use junkyard_core::error::{ConfigError, JunkyardError};
use junkyard_inventory::{FileStorage, InventoryStore, PartsCatalog, StoreOptions};
use junkyard_vin::{VinDecoder, VinResolver, VpicClient};

use crate::error::CliError;

/// Loads the effective configuration.
///
/// A missing file is only tolerated when the path was not given explicitly;
/// defaults (plus environment overrides) are used instead. `log_level`
/// overrides `[general] log_level` before validation.
pub async fn load_config(
    path: &Path,
    explicit: bool,
    log_level: Option<&str>,
) -> Result<JunkyardConfig, CliError> {
    let mut config = match JunkyardConfig::load(path).await {
        Ok(config) => config,
        Err(JunkyardError::Config(ConfigError::FileNotFound { .. })) if !explicit => {
            debug!(path = %path.display(), "no config file, using defaults");
            let mut config = JunkyardConfig::default();
            config.apply_env_overrides();
            config
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    config.validate()?;
    Ok(config)
}

/// Storage-backed state shared by the inventory commands.
pub struct AppState {
    pub config: JunkyardConfig,
    storage: Arc<FileStorage>,
}

impl AppState {
    pub fn new(config: JunkyardConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.storage.data_path()));
        Self { config, storage }
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Loads the inventory from the data directory.
    pub fn open_store(&self) -> Result<InventoryStore<Arc<FileStorage>>, CliError> {
        let options = StoreOptions::from_config(&self.config.storage, &self.config.inventory);
        let store = InventoryStore::load(Arc::clone(&self.storage), options)?;
        info!(
            data_dir = %self.storage.data_dir().display(),
            vehicles = store.len(),
            "inventory opened"
        );
        Ok(store)
    }

    /// Loads the parts catalog, seeding it on first use.
    pub fn load_catalog(&self) -> Result<PartsCatalog, CliError> {
        Ok(PartsCatalog::load_or_seed(
            self.storage.as_ref(),
            &self.config.storage.catalog_key,
        )?)
    }

    /// VIN resolver honoring `[lookup]`; `offline` forces the local decoder.
    pub fn resolver(&self, offline: bool) -> VinResolver<VpicClient> {
        if offline {
            VinResolver::local_only(VinDecoder::new())
        } else {
            VinResolver::from_config(&self.config.lookup)
        }
    }
}
