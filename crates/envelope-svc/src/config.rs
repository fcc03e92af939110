//! Configuration loading and validation for the envelope service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::PaddingMode;
use crate::envelope::{UnsealPolicy, WireFormat};

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP/gRPC endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Treat `keyIndex: 0` as a missing field, as existing callers expect.
    #[serde(default = "default_true")]
    pub reject_zero_key_index: bool,

    /// Reject envelopes whose pad bytes are inconsistent.
    #[serde(default)]
    pub strict_padding: bool,

    /// Reject envelopes whose header length field disagrees with the body.
    #[serde(default)]
    pub verify_header: bool,

    /// Envelope layout: `legacy` (double padding, two-block tag) or
    /// `compact`.
    #[serde(default = "default_wire_format")]
    pub wire_format: String,
}

fn default_port() -> u16 {
    3001
}
fn default_log_level() -> String {
    "info".into()
}
fn default_true() -> bool {
    true
}
fn default_wire_format() -> String {
    "legacy".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            if endpoint.trim().is_empty() {
                anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be empty when set");
            }
        }
        self.wire_format()?;
        Ok(())
    }

    /// The envelope layout named by `WIRE_FORMAT`.
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than `legacy` or `compact`.
    pub fn wire_format(&self) -> Result<WireFormat> {
        WireFormat::from_name(&self.wire_format).ok_or_else(|| {
            anyhow::anyhow!(
                "WIRE_FORMAT must be `legacy` or `compact`, got {:?}",
                self.wire_format
            )
        })
    }

    /// Unseal strictness derived from the `STRICT_PADDING` and
    /// `VERIFY_HEADER` switches.
    pub fn unseal_policy(&self) -> UnsealPolicy {
        UnsealPolicy {
            padding: if self.strict_padding {
                PaddingMode::Strict
            } else {
                PaddingMode::Lenient
            },
            verify_header: self.verify_header,
        }
    }
}
