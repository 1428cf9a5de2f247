//! Named breaker registry.
//!
//! # Responsibilities
//! - Hold one breaker per protected dependency
//! - Build breakers from validated configuration
//! - Hand out shared handles by name
//!
//! # Design Decisions
//! - Lookups are lock-free per shard (DashMap)
//! - Handles are cheap clones sharing state with the registry's copy

use std::sync::Arc;

use dashmap::DashMap;

use crate::breaker::{CircuitBreaker, Settings, State};
use crate::clock::Clock;
use crate::config::BreakersConfig;

/// Collection of circuit breakers keyed by name.
#[derive(Debug, Default)]
pub struct BreakerRegistry {
    breakers: DashMap<String, CircuitBreaker>,
}

impl BreakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one breaker per configured entry.
    pub fn from_config(config: &BreakersConfig) -> Self {
        Self::from_config_with(config, |settings| settings)
    }

    /// Like [`from_config`](Self::from_config), with a hook to attach
    /// callbacks or a clock to each breaker's settings.
    pub fn from_config_with<F>(config: &BreakersConfig, mut customize: F) -> Self
    where
        F: FnMut(Settings) -> Settings,
    {
        let registry = Self::new();
        for breaker in &config.breakers {
            registry.insert(CircuitBreaker::new(customize(breaker.to_settings())));
        }
        tracing::info!(count = registry.len(), "Circuit breakers registered");
        registry
    }

    /// Build every configured breaker on a shared clock.
    pub fn from_config_with_clock(config: &BreakersConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_config_with(config, |settings| settings.clock(clock.clone()))
    }

    /// Add a breaker, replacing any existing one with the same name.
    pub fn insert(&self, breaker: CircuitBreaker) -> Option<CircuitBreaker> {
        self.breakers.insert(breaker.name().to_string(), breaker)
    }

    pub fn get(&self, name: &str) -> Option<CircuitBreaker> {
        self.breakers.get(name).map(|entry| entry.value().clone())
    }

    /// Existing breaker for `name`, or a new one built from `settings`.
    pub fn get_or_insert_with<F>(&self, name: &str, settings: F) -> CircuitBreaker
    where
        F: FnOnce() -> Settings,
    {
        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                let mut settings = settings();
                settings.name = name.to_string();
                CircuitBreaker::new(settings)
            })
            .value()
            .clone()
    }

    pub fn remove(&self, name: &str) -> Option<CircuitBreaker> {
        self.breakers.remove(name).map(|(_, breaker)| breaker)
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }

    /// Name and current state of every breaker, sorted by name.
    pub fn states(&self) -> Vec<(String, State)> {
        let mut states: Vec<_> = self
            .breakers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().state()))
            .collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        states
    }
}
