//! Centralized configuration for rill pairs buffers.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - RillConfig::from_env() reads RILL_PAIRS_MIN_CAP / RILL_PAIRS_MAX_CAP.
//! - PairsBuilder returns a RillConfig which Pairs::with_config consumes.
//!
//! The C ABI has no way to pass a config, so it uses `global()`: env is read
//! once per process and cached.

use std::fmt;
use std::sync::OnceLock;

use crate::consts::{
    ENV_PAIRS_MAX_CAP, ENV_PAIRS_MIN_CAP, PAIRS_DEFAULT_MIN_CAP, PAIRS_HARD_MAX_CAP,
};

/// Tunables for pairs allocation and growth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RillConfig {
    /// Smallest capacity a buffer is allocated with (requests below are raised).
    /// Env: RILL_PAIRS_MIN_CAP (default 1, never below 1)
    pub pairs_min_cap: usize,

    /// Largest capacity a buffer may grow to. Push past it fails with CapExceeded.
    /// Env: RILL_PAIRS_MAX_CAP (default: largest allocatable Vec<Kv>)
    pub pairs_max_cap: usize,
}

impl Default for RillConfig {
    fn default() -> Self {
        Self {
            pairs_min_cap: PAIRS_DEFAULT_MIN_CAP,
            pairs_max_cap: PAIRS_HARD_MAX_CAP,
        }
    }
}

impl RillConfig {
    /// Load configuration from environment variables; unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(n) = crate::util::env_usize(ENV_PAIRS_MIN_CAP) {
            cfg.pairs_min_cap = n;
        }
        if let Some(n) = crate::util::env_usize(ENV_PAIRS_MAX_CAP) {
            cfg.pairs_max_cap = n;
        }

        cfg.normalized()
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_pairs_min_cap(mut self, cap: usize) -> Self {
        self.pairs_min_cap = cap;
        self
    }

    pub fn with_pairs_max_cap(mut self, cap: usize) -> Self {
        self.pairs_max_cap = cap;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self.normalized()
    }

    // min >= 1, min <= max <= PAIRS_HARD_MAX_CAP
    fn normalized(mut self) -> Self {
        self.pairs_max_cap = self.pairs_max_cap.min(PAIRS_HARD_MAX_CAP);
        self.pairs_min_cap = self.pairs_min_cap.clamp(1, PAIRS_HARD_MAX_CAP);
        if self.pairs_max_cap < self.pairs_min_cap {
            self.pairs_max_cap = self.pairs_min_cap;
        }
        self
    }
}

impl fmt::Display for RillConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RillConfig {{ pairs_min_cap: {}, pairs_max_cap: {} }}",
            self.pairs_min_cap,
            if self.pairs_max_cap == PAIRS_HARD_MAX_CAP {
                "default(unbounded)".to_string()
            } else {
                self.pairs_max_cap.to_string()
            },
        )
    }
}

/// Lightweight builder that produces a RillConfig.
#[derive(Clone, Debug)]
pub struct PairsBuilder {
    cfg: RillConfig,
}

impl Default for PairsBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: RillConfig::from_env(),
        }
    }
}

impl PairsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: RillConfig::default(),
        }
    }

    pub fn min_cap(mut self, cap: usize) -> Self {
        self.cfg.pairs_min_cap = cap;
        self
    }

    pub fn max_cap(mut self, cap: usize) -> Self {
        self.cfg.pairs_max_cap = cap;
        self
    }

    pub fn build(self) -> RillConfig {
        self.cfg.build()
    }
}

static GLOBAL: OnceLock<RillConfig> = OnceLock::new();

/// Process-wide configuration, read from env on first use.
pub fn global() -> &'static RillConfig {
    GLOBAL.get_or_init(|| {
        let cfg = RillConfig::from_env();
        log::debug!("rill config: {}", cfg);
        cfg
    })
}
