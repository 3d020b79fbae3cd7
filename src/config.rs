//! Configuration for the depth feed.
//!
//! This module provides the [`Config`] struct describing which instrument to
//! track and where to reach the venue.

use std::time::Duration;

/// API environment (production or testnet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production coin-margined futures endpoints
    #[default]
    Production,
    /// Futures testnet
    Testnet,
}

impl Environment {
    /// Get the base URL for the REST API
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://dapi.binance.com",
            Environment::Testnet => "https://testnet.binancefuture.com",
        }
    }

    /// Get the base URL for raw WebSocket streams
    pub fn websocket_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "wss://dstream.binance.com/ws",
            Environment::Testnet => "wss://dstream.binancefuture.com/ws",
        }
    }
}

/// How often the venue pushes diff events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateSpeed {
    /// 100ms updates
    Ms100,
    /// 250ms updates (venue default, no suffix on the stream name)
    #[default]
    Ms250,
    /// 500ms updates
    Ms500,
}

impl UpdateSpeed {
    /// Stream name suffix for this speed
    pub fn suffix(&self) -> &'static str {
        match self {
            UpdateSpeed::Ms100 => "@100ms",
            UpdateSpeed::Ms250 => "",
            UpdateSpeed::Ms500 => "@500ms",
        }
    }
}

/// Configuration for a depth feed
///
/// # Example
///
/// ```rust
/// use binance_depth::Config;
/// use binance_depth::config::UpdateSpeed;
///
/// let config = Config::new("BTCUSD_PERP");
///
/// // Slower stream, shallower snapshot
/// let config = Config::new("BTCUSD_PERP")
///     .with_update_speed(UpdateSpeed::Ms500)
///     .with_snapshot_limit(500);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Contract symbol, e.g. `BTCUSD_PERP`
    symbol: String,

    /// API environment
    environment: Environment,

    /// Diff stream push interval
    update_speed: UpdateSpeed,

    /// Depth of the REST snapshot (levels per side)
    snapshot_limit: u32,

    /// HTTP request timeout
    timeout: Duration,
}

impl Config {
    /// Snapshot depth used when none is configured.
    ///
    /// The deepest the venue serves; anything shallower risks the snapshot
    /// missing levels that later receive removal diffs.
    pub const DEFAULT_SNAPSHOT_LIMIT: u32 = 1000;

    /// Create a configuration for the given contract symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            environment: Environment::default(),
            update_speed: UpdateSpeed::default(),
            snapshot_limit: Self::DEFAULT_SNAPSHOT_LIMIT,
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the API environment (production or testnet)
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the diff stream push interval
    #[must_use]
    pub fn with_update_speed(mut self, update_speed: UpdateSpeed) -> Self {
        self.update_speed = update_speed;
        self
    }

    /// Set the REST snapshot depth (levels per side)
    #[must_use]
    pub fn with_snapshot_limit(mut self, limit: u32) -> Self {
        self.snapshot_limit = limit;
        self
    }

    /// Set the HTTP request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the contract symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the environment
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Get the diff stream push interval
    pub fn update_speed(&self) -> UpdateSpeed {
        self.update_speed
    }

    /// Get the snapshot depth
    pub fn snapshot_limit(&self) -> u32 {
        self.snapshot_limit
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the REST API base URL
    pub fn rest_base_url(&self) -> &'static str {
        self.environment.rest_base_url()
    }

    /// Full name of the diff depth stream, e.g. `btcusd_perp@depth@500ms`
    pub fn stream_name(&self) -> String {
        format!(
            "{}@depth{}",
            self.symbol.to_lowercase(),
            self.update_speed.suffix()
        )
    }

    /// Full WebSocket URL for the diff depth stream
    pub fn websocket_url(&self) -> String {
        format!(
            "{}/{}",
            self.environment.websocket_base_url(),
            self.stream_name()
        )
    }
}
