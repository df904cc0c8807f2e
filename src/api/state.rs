//! Application state for the HR Payroll Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::lifecycle::LetterRenderer;
use crate::report::{SlipCalculator, StructureSlipCalculator};
use crate::store::{InMemoryStore, PayrollStore};

/// Shared application state.
///
/// Holds the live configuration, the document store and the optional
/// external collaborators. Handlers read the current [`ConfigLoader`] on
/// every request, but it is a snapshot: edits to the YAML files on disk are
/// not seen until [`AppState::reload_config`] (`POST /config/reload`) runs,
/// after which the next request uses them without a restart.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<Arc<ConfigLoader>>>,
    store: Arc<dyn PayrollStore>,
    renderer: Option<Arc<dyn LetterRenderer>>,
    calculator: Option<Arc<dyn SlipCalculator>>,
}

impl AppState {
    /// Creates a state backed by a fresh [`InMemoryStore`].
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    /// Creates a state backed by the given store.
    pub fn with_store(config: ConfigLoader, store: Arc<dyn PayrollStore>) -> Self {
        Self {
            config: Arc::new(RwLock::new(Arc::new(config))),
            store,
            renderer: None,
            calculator: None,
        }
    }

    /// Sets the renderer used for experience letters.
    pub fn with_renderer(mut self, renderer: Arc<dyn LetterRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Sets the salary slip calculator used by the comparison report.
    ///
    /// Without one, slips are built from the configured structures.
    pub fn with_slip_calculator(mut self, calculator: Arc<dyn SlipCalculator>) -> Self {
        self.calculator = Some(calculator);
        self
    }

    /// Returns the current configuration.
    pub fn config(&self) -> EngineResult<Arc<ConfigLoader>> {
        self.config
            .read()
            .map(|config| Arc::clone(&*config))
            .map_err(|_| EngineError::Storage {
                message: "configuration lock poisoned".to_string(),
            })
    }

    /// Re-reads the configuration from disk and makes it current.
    ///
    /// On failure the previous configuration stays in effect.
    pub fn reload_config(&self) -> EngineResult<Arc<ConfigLoader>> {
        let reloaded = Arc::new(self.config()?.reload()?);
        let mut current = self.config.write().map_err(|_| EngineError::Storage {
            message: "configuration lock poisoned".to_string(),
        })?;
        *current = Arc::clone(&reloaded);
        info!(
            source = ?reloaded.source(),
            "Configuration reloaded"
        );
        Ok(reloaded)
    }

    /// Returns the document store.
    pub fn store(&self) -> &dyn PayrollStore {
        self.store.as_ref()
    }

    /// Returns the experience letter renderer, if configured.
    pub fn renderer(&self) -> Option<&dyn LetterRenderer> {
        self.renderer.as_deref()
    }

    /// Returns the slip calculator for the comparison report.
    pub fn slip_calculator(&self) -> EngineResult<Arc<dyn SlipCalculator>> {
        match &self.calculator {
            Some(calculator) => Ok(Arc::clone(calculator)),
            None => Ok(Arc::new(StructureSlipCalculator::from_config(
                self.config()?.config(),
            ))),
        }
    }
}
