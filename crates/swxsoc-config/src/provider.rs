//! Mission providers
//!
//! The codec reads the active mission through [`MissionProvider`] on every
//! call. [`ConfigHandle`] is the reconfigurable provider: readers take an
//! `Arc` snapshot, writers swap the whole mission atomically. A fixed
//! mission is provided as `Arc<MissionConfig>`, so a snapshot is a
//! reference count bump.

use crate::error::ConfigResult;
use crate::loader::ConfigLoader;
use crate::mission::MissionConfig;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

/// Source of the active mission
pub trait MissionProvider: Send + Sync {
    /// Current mission snapshot
    fn mission(&self) -> Arc<MissionConfig>;
}

impl MissionProvider for Arc<MissionConfig> {
    fn mission(&self) -> Arc<MissionConfig> {
        Arc::clone(self)
    }
}

impl MissionProvider for Arc<ConfigHandle> {
    fn mission(&self) -> Arc<MissionConfig> {
        (**self).mission()
    }
}

impl<P: MissionProvider + ?Sized> MissionProvider for &P {
    fn mission(&self) -> Arc<MissionConfig> {
        (**self).mission()
    }
}

/// Reconfigurable mission provider
#[derive(Debug)]
pub struct ConfigHandle {
    loader: RwLock<ConfigLoader>,
    active: RwLock<Arc<MissionConfig>>,
}

impl ConfigHandle {
    /// Handle serving a fixed mission until reconfigured
    #[must_use]
    pub fn new(mission: MissionConfig) -> Self {
        Self {
            loader: RwLock::new(ConfigLoader::new()),
            active: RwLock::new(Arc::new(mission)),
        }
    }

    /// Handle loaded through `loader`; `reload` re-runs the same loader
    ///
    /// # Errors
    /// Any error from [`ConfigLoader::load_mission`].
    pub fn load(loader: ConfigLoader) -> ConfigResult<Self> {
        let mission = loader.load_mission()?;
        Ok(Self {
            loader: RwLock::new(loader),
            active: RwLock::new(Arc::new(mission)),
        })
    }

    /// Replace the active mission
    pub fn reconfigure(&self, mission: MissionConfig) {
        tracing::info!(
            mission = mission.mission_prefix(),
            instruments = mission.instruments().len(),
            "mission reconfigured"
        );
        *self.active.write() = Arc::new(mission);
    }

    /// Replace the loader and load the mission it selects
    ///
    /// The active mission is left untouched when loading fails.
    ///
    /// # Errors
    /// Any error from [`ConfigLoader::load_mission`].
    pub fn reconfigure_with(&self, loader: ConfigLoader) -> ConfigResult<()> {
        let mission = loader.load_mission()?;
        *self.loader.write() = loader;
        self.reconfigure(mission);
        Ok(())
    }

    /// Re-run the current loader
    ///
    /// # Errors
    /// Any error from [`ConfigLoader::load_mission`].
    pub fn reload(&self) -> ConfigResult<()> {
        let loader = self.loader.read().clone();
        let mission = loader.load_mission()?;
        self.reconfigure(mission);
        Ok(())
    }
}

impl MissionProvider for ConfigHandle {
    fn mission(&self) -> Arc<MissionConfig> {
        Arc::clone(&self.active.read())
    }
}

static GLOBAL: OnceCell<ConfigHandle> = OnceCell::new();

/// Process-wide provider, loaded from the environment on first use
///
/// A failed load is not cached: every call retries until the environment
/// selects a valid mission.
///
/// # Errors
/// Any error from [`ConfigLoader::load_mission`] for
/// [`ConfigLoader::from_env`].
pub fn global() -> ConfigResult<&'static ConfigHandle> {
    GLOBAL
        .get_or_try_init(|| ConfigHandle::load(ConfigLoader::from_env()))
        .map_err(|e| {
            tracing::error!(error = %e, "environment configuration rejected");
            e
        })
}

/// Reload the process-wide provider from the environment
///
/// # Errors
/// Any error from [`ConfigLoader::load_mission`]; the previous mission
/// stays active.
pub fn reconfigure() -> ConfigResult<()> {
    global()?.reconfigure_with(ConfigLoader::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::InstrumentConfig;

    fn mission(name: &str) -> MissionConfig {
        MissionConfig::new(
            name,
            ".txt",
            vec![InstrumentConfig::new("instrument1", "ins1", "Instrument 1", "INS1")],
        )
        .unwrap()
    }

    #[test]
    fn handle_serves_snapshots() {
        let handle = ConfigHandle::new(mission("alpha"));
        let before = handle.mission();
        handle.reconfigure(mission("beta"));
        let after = handle.mission();

        assert_eq!(before.mission_prefix(), "alpha");
        assert_eq!(after.mission_prefix(), "beta");
    }

    #[test]
    fn failed_reconfigure_keeps_active_mission() {
        let handle = ConfigHandle::new(mission("alpha"));
        let result = handle.reconfigure_with(ConfigLoader::new().with_mission("veeger"));
        assert!(result.is_err());
        assert_eq!(handle.mission().mission_prefix(), "alpha");
    }

    #[test]
    fn reload_reruns_loader() {
        let handle = ConfigHandle::load(ConfigLoader::new().with_mission("hermes")).unwrap();
        handle.reconfigure(mission("alpha"));
        handle.reload().unwrap();
        assert_eq!(handle.mission().mission_prefix(), "hermes");
    }

    #[test]
    fn fixed_mission_snapshot_is_shared() {
        let fixed = Arc::new(mission("gamma"));
        let snapshot = fixed.mission();
        assert!(Arc::ptr_eq(&snapshot, &fixed));
        assert!(Arc::ptr_eq(&snapshot, &fixed.mission()));
    }

    #[test]
    fn provider_impls() {
        let handle = Arc::new(ConfigHandle::new(mission("alpha")));
        fn prefix(p: impl MissionProvider) -> String {
            p.mission().mission_prefix().to_string()
        }
        assert_eq!(prefix(Arc::clone(&handle)), "alpha");
        assert_eq!(prefix(&*handle), "alpha");
        assert_eq!(prefix(Arc::new(mission("gamma"))), "gamma");
    }
}
