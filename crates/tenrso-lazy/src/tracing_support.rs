//! Structured logging setup for lazy shape transforms
//!
//! The transform crates only emit events through `tracing`; nothing is
//! printed until a subscriber is installed. This module installs one with
//! `tracing-subscriber`, configured from the environment by default.
//!
//! # Events
//!
//! | target | level | event |
//! |--------|-------|-------|
//! | `tenrso_graph` | trace | `registered tensor` |
//! | `tenrso_transform` | debug | `transform_built` |
//! | `tenrso_transform` | warn | undecidable shape check accepted |
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive (default: `tenrso_transform=info,warn`)
//! - `TENRSO_LOG_FORMAT`: `pretty`, `json` or `compact` (default: `pretty`)
//!
//! # Example
//!
//! ```no_run
//! use tenrso_lazy::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(
//!     TracingConfig::default()
//!         .with_format(TracingFormat::Json)
//!         .with_filter("tenrso_transform=debug,warn"),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
#[cfg(feature = "tracing")]
use tenrso_graph::ComputeGraph;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "tenrso_transform=info,warn";

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Multi-line human-readable output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line per event
    Compact,
}

impl TracingFormat {
    /// Parse a format name; anything unrecognised falls back to `Pretty`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// `EnvFilter` directive
    pub filter: String,
    /// ANSI colours (ignored for JSON)
    pub with_ansi: bool,
    /// Show event targets
    pub with_target: bool,
    /// Show source file and line
    pub with_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_env_values(
            std::env::var("TENRSO_LOG_FORMAT").ok().as_deref(),
            std::env::var("RUST_LOG").ok().as_deref(),
        )
    }
}

impl TracingConfig {
    /// Build from optional `TENRSO_LOG_FORMAT` and `RUST_LOG` values
    pub fn from_env_values(format: Option<&str>, filter: Option<&str>) -> Self {
        Self {
            format: format.map(TracingFormat::parse).unwrap_or_default(),
            filter: filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(DEFAULT_FILTER)
                .to_string(),
            with_ansi: true,
            with_target: true,
            with_location: false,
        }
    }

    /// Set the output format
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the filter directive
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Toggle ANSI colours
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.with_ansi = enabled;
        self
    }

    /// Toggle source locations
    pub fn with_location(mut self, enabled: bool) -> Self {
        self.with_location = enabled;
        self
    }
}

/// Install the global subscriber.
///
/// Fails on an invalid filter directive or if a global subscriber is
/// already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }

    Ok(())
}

/// No-op without the `tracing` feature
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}

/// Log the size of a graph: total nodes and how many are placeholders
#[cfg(feature = "tracing")]
pub fn record_graph(graph: &ComputeGraph) {
    let nodes = graph.nodes();
    let placeholders = nodes.iter().filter(|n| n.is_placeholder()).count();
    tracing::info!(
        nodes = nodes.len(),
        placeholders = placeholders,
        computes = nodes.len() - placeholders,
        "graph_summary"
    );
}

/// No-op without the `tracing` feature
#[cfg(not(feature = "tracing"))]
pub fn record_graph(_graph: &tenrso_graph::ComputeGraph) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(TracingFormat::parse("json"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse(" Compact "), TracingFormat::Compact);
        assert_eq!(TracingFormat::parse("pretty"), TracingFormat::Pretty);
        assert_eq!(TracingFormat::parse("xml"), TracingFormat::Pretty);
    }

    #[test]
    fn test_config_from_env_values() {
        let config = TracingConfig::from_env_values(Some("json"), Some("tenrso_graph=trace"));
        assert_eq!(config.format, TracingFormat::Json);
        assert_eq!(config.filter, "tenrso_graph=trace");

        let fallback = TracingConfig::from_env_values(None, Some("  "));
        assert_eq!(fallback.format, TracingFormat::Pretty);
        assert_eq!(fallback.filter, DEFAULT_FILTER);
    }

    #[test]
    fn test_builder_methods() {
        let config = TracingConfig::from_env_values(None, None)
            .with_format(TracingFormat::Compact)
            .with_filter("debug")
            .with_ansi(false)
            .with_location(true);
        assert_eq!(config.format, TracingFormat::Compact);
        assert_eq!(config.filter, "debug");
        assert!(!config.with_ansi);
        assert!(config.with_location);
    }

    #[test]
    fn test_record_graph_without_subscriber() {
        let graph = tenrso_graph::ComputeGraph::new();
        record_graph(&graph);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_invalid_filter_rejected() {
        let config = TracingConfig::from_env_values(None, Some("tenrso_transform=loud"));
        assert!(init_tracing(config).is_err());
    }

    #[cfg(not(feature = "tracing"))]
    #[test]
    fn test_init_is_noop() {
        assert!(init_tracing(TracingConfig::default()).is_ok());
        assert!(init_tracing(TracingConfig::default()).is_ok());
    }
}
