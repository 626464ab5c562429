//! Shared upgrade query service
//!
//! Holds the current [`DimensionIndex`] behind a lock-swapped `Arc`. Queries
//! take a snapshot and never hold the lock while evaluating formulas; a
//! reload builds a complete new index before swapping it in.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::{Catalog, ConfigError, UpgradeConfig};
use crate::formula::EvalError;
use crate::tiers::{Dimension, DimensionIndex, Quote};
use crate::upgrade::UpgradeOffer;

pub struct UpgradeService {
    index: RwLock<Arc<DimensionIndex>>,
    catalog: Arc<dyn Catalog + Send + Sync>,
}

impl UpgradeService {
    /// Service with an empty index; call [`reload`](Self::reload) to fill it
    pub fn new(catalog: Arc<dyn Catalog + Send + Sync>) -> Self {
        Self {
            index: RwLock::new(Arc::new(DimensionIndex::new())),
            catalog,
        }
    }

    /// Service built from `config`, returning the entries that were skipped
    pub fn from_config(
        config: &UpgradeConfig,
        catalog: Arc<dyn Catalog + Send + Sync>,
    ) -> Result<(Self, Vec<ConfigError>), ConfigError> {
        let service = Self::new(catalog);
        let diagnostics = service.reload(config)?;
        Ok((service, diagnostics))
    }

    /// The current index. Later reloads do not affect a snapshot already taken.
    pub fn snapshot(&self) -> Arc<DimensionIndex> {
        Arc::clone(&self.index.read())
    }

    /// Swap in `index`, returning the previous one
    pub fn replace(&self, index: DimensionIndex) -> Arc<DimensionIndex> {
        std::mem::replace(&mut *self.index.write(), Arc::new(index))
    }

    /// Rebuild the index from `config`. Bad entries are skipped and returned;
    /// only an unusable tree (root not a map) keeps the old index.
    pub fn reload(&self, config: &UpgradeConfig) -> Result<Vec<ConfigError>, ConfigError> {
        let (index, diagnostics) = config.build_index(self.catalog.as_ref())?;
        self.replace(index);
        log::info!("Upgrade tiers reloaded");
        Ok(diagnostics)
    }

    /// Reload from a file. A file that cannot be read or parsed keeps the old index.
    pub fn reload_from_path(&self, path: &Path) -> Result<Vec<ConfigError>, ConfigError> {
        let config = UpgradeConfig::load(path)?;
        self.reload(&config)
    }

    pub fn is_enabled(&self, namespace: &str) -> bool {
        self.snapshot().is_enabled(namespace)
    }

    pub fn quote(
        &self,
        dimension: &Dimension,
        namespace: &str,
        level: i64,
        island_level: i64,
        players: i64,
    ) -> Result<Option<Quote>, EvalError> {
        self.snapshot().quote(dimension, namespace, level, island_level, players)
    }

    pub fn offer(
        &self,
        dimension: &Dimension,
        namespace: &str,
        level: i64,
        island_level: i64,
        players: i64,
    ) -> Result<Option<UpgradeOffer>, EvalError> {
        UpgradeOffer::new(&self.snapshot(), dimension, namespace, level, island_level, players)
    }

    pub fn max_level(&self, dimension: &Dimension, namespace: &str) -> i64 {
        self.snapshot().max_level(dimension, namespace)
    }
}
