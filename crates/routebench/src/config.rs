//! Harness configuration.

use serde::Serialize;

use crate::adapters::AdapterKind;
use crate::fixture::Scenario;

/// What a suite run does.
#[derive(Debug, Clone, Serialize)]
pub struct HarnessConfig {
    /// Timed iterations per entry point (default: 100 000).
    pub iterations: u64,

    /// Untimed iterations before the timed loop (default: 1 000).
    pub warmup_iterations: u64,

    /// Routers to benchmark (default: all).
    pub adapters: Vec<AdapterKind>,

    /// Scenarios to run against each router (default: all).
    pub scenarios: Vec<Scenario>,

    /// Query string appended to every request target.
    pub query: Option<String>,

    /// `METHOD /pattern` lines replacing the built-in multi-route table.
    pub routes: Option<Vec<String>>,

    /// Stop after the correctness gate; nothing is timed.
    pub verify_only: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            warmup_iterations: 1_000,
            adapters: AdapterKind::ALL.to_vec(),
            scenarios: Scenario::ALL.to_vec(),
            query: None,
            routes: None,
            verify_only: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_warmup_iterations(mut self, iterations: u64) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Restrict to these adapters. An empty list keeps the current set.
    pub fn with_adapters(mut self, adapters: impl IntoIterator<Item = AdapterKind>) -> Self {
        let adapters: Vec<_> = adapters.into_iter().collect();
        if !adapters.is_empty() {
            self.adapters = adapters;
        }
        self
    }

    /// Restrict to these scenarios. An empty list keeps the current set.
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        let scenarios: Vec<_> = scenarios.into_iter().collect();
        if !scenarios.is_empty() {
            self.scenarios = scenarios;
        }
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes = Some(routes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_verify_only(mut self, verify_only: bool) -> Self {
        self.verify_only = verify_only;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.iterations, 100_000);
        assert_eq!(config.warmup_iterations, 1_000);
        assert_eq!(config.adapters, AdapterKind::ALL.to_vec());
        assert_eq!(config.scenarios, Scenario::ALL.to_vec());
        assert!(config.query.is_none());
        assert!(config.routes.is_none());
        assert!(!config.verify_only);
    }

    #[test]
    fn test_config_builder() {
        let config = HarnessConfig::new()
            .with_iterations(10)
            .with_warmup_iterations(0)
            .with_adapters([AdapterKind::Matchit])
            .with_scenarios([Scenario::MultiRoute])
            .with_query("lang=en")
            .with_routes(["GET /a/:id"])
            .with_verify_only(true);

        assert_eq!(config.iterations, 10);
        assert_eq!(config.warmup_iterations, 0);
        assert_eq!(config.adapters, vec![AdapterKind::Matchit]);
        assert_eq!(config.scenarios, vec![Scenario::MultiRoute]);
        assert_eq!(config.query.as_deref(), Some("lang=en"));
        assert_eq!(config.routes, Some(vec!["GET /a/:id".to_string()]));
        assert!(config.verify_only);
    }

    #[test]
    fn test_empty_selection_keeps_defaults() {
        let config = HarnessConfig::new()
            .with_adapters(Vec::<AdapterKind>::new())
            .with_scenarios(Vec::<Scenario>::new());
        assert_eq!(config.adapters.len(), AdapterKind::ALL.len());
        assert_eq!(config.scenarios.len(), Scenario::ALL.len());
    }
}
