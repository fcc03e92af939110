//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::crypto::{KeySource, OsKeySource};
use crate::envelope::{UnsealPolicy, WireFormat};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request. There is no mutable state; the key source is the only shared
/// resource.
#[derive(Clone)]
pub struct AppState {
    /// Source of fresh keys for `POST /encrypt`.
    pub key_source: Arc<dyn KeySource>,
    /// Layout written by `POST /encrypt` and expected by `POST /decrypt`.
    pub wire_format: WireFormat,
    /// Strictness applied by `POST /decrypt`.
    pub unseal_policy: UnsealPolicy,
    /// Treat `keyIndex: 0` as missing.
    pub reject_zero_key_index: bool,
}

impl AppState {
    /// Create a new [`AppState`] with the provided key source and switches.
    pub fn new(
        key_source: Arc<dyn KeySource>,
        wire_format: WireFormat,
        unseal_policy: UnsealPolicy,
        reject_zero_key_index: bool,
    ) -> Self {
        Self {
            key_source,
            wire_format,
            unseal_policy,
            reject_zero_key_index,
        }
    }

    /// Build the state described by `cfg`, drawing keys from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns an error if `WIRE_FORMAT` names an unknown layout.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(OsKeySource),
            cfg.wire_format()?,
            cfg.unseal_policy(),
            cfg.reject_zero_key_index,
        ))
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with the wire-compatible defaults, suitable for tests.
    fn default() -> Self {
        Self::new(
            Arc::new(OsKeySource),
            WireFormat::default(),
            UnsealPolicy::default(),
            true,
        )
    }
}
