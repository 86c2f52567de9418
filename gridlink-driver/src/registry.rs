use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument, warn};

use crate::{Conn, Driver, DriverError};

#[derive(Clone, Default)]
/// A set of named [Driver]s.
///
/// The registry is created once at startup and handed to whatever needs
/// to open connections. Clones share the same set of drivers.
pub struct DriverRegistry {
    drivers: Arc<RwLock<ahash::HashMap<String, Arc<dyn Driver>>>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a driver under the given name.
    ///
    /// Registering a second driver with the same name replaces the first.
    pub fn register(&self, name: impl Into<String>, driver: impl Driver + 'static) {
        let name = name.into();
        let mut lock = self.drivers.write();
        if lock.insert(name.clone(), Arc::new(driver)).is_some() {
            warn!(driver = %name, "Replaced existing driver registration");
        } else {
            info!(driver = %name, "Registered driver");
        }
    }

    /// Returns the driver registered under the given name.
    pub fn driver(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.read().get(name).cloned()
    }

    /// Returns the names of all registered drivers in sorted order.
    pub fn drivers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }

    #[instrument(skip(self, dsn))]
    /// Opens a connection using the named driver.
    pub async fn open(&self, name: &str, dsn: &str) -> Result<Box<dyn Conn>, DriverError> {
        let driver = self
            .driver(name)
            .ok_or_else(|| DriverError::UnknownDriver(name.to_string()))?;
        driver.open(dsn).await
    }
}
