//! Process-wide rendering engine configuration
//!
//! The engine is configured exactly once per process. The first call to
//! [`init`] (or [`ensure_initialized`]) wins; later calls return the
//! configuration that is already installed.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// pdf.js release whose worker is served to the browser page
pub const DEFAULT_ENGINE_VERSION: &str = "4.4.168";

static ENGINE: OnceLock<EngineConfig> = OnceLock::new();

/// Rendering engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Engine release version
    pub engine_version: String,
    /// URL of the worker script handed to the browser-side renderer
    pub worker_src: String,
}

impl EngineConfig {
    /// Configuration pointing at the CDN worker for `version`
    pub fn for_version(version: &str) -> Self {
        Self {
            engine_version: version.to_string(),
            worker_src: format!(
                "https://cdnjs.cloudflare.com/ajax/libs/pdf.js/{}/pdf.worker.min.mjs",
                version
            ),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_version(DEFAULT_ENGINE_VERSION)
    }
}

/// Install the engine configuration
///
/// Idempotent: returns the installed configuration, which is `config` only
/// on the first call.
pub fn init(config: EngineConfig) -> &'static EngineConfig {
    let mut installed = false;
    let current = ENGINE.get_or_init(|| {
        installed = true;
        config.clone()
    });

    if installed {
        log::info!(
            "Rendering engine {} initialized (worker: {})",
            current.engine_version,
            current.worker_src
        );
    } else if *current != config {
        log::debug!(
            "Rendering engine already initialized with {}; ignoring {}",
            current.engine_version,
            config.engine_version
        );
    }

    current
}

/// Install the default configuration unless one is already present
pub fn ensure_initialized() -> &'static EngineConfig {
    match ENGINE.get() {
        Some(config) => config,
        None => init(EngineConfig::default()),
    }
}

/// The installed configuration, if any
pub fn current() -> Option<&'static EngineConfig> {
    ENGINE.get()
}
