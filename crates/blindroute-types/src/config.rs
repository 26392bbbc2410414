//! Configuration for a BlindRoute router instance.

use serde::{Deserialize, Serialize};

use crate::{BlindRouteError, Principal, Result, constants};

/// Configuration for a single router instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// The administrative principal (agent upserts, rotation, dev reveals).
    pub owner: Principal,
    /// Second grantee on every routed winner, next to the requester.
    pub router_principal: Principal,
    /// Capacity of the active-agent index. Never above [`constants::MAX_AGENTS`].
    #[serde(default = "default_max_agents")]
    pub max_agents: usize,
    /// Enables plaintext inputs and `force_public`. Never set in production.
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_max_agents() -> usize {
    constants::MAX_AGENTS
}

impl RouterConfig {
    /// Production configuration with the default agent capacity.
    #[must_use]
    pub fn new(owner: Principal, router_principal: Principal) -> Self {
        Self {
            owner,
            router_principal,
            max_agents: constants::MAX_AGENTS,
            dev_mode: false,
        }
    }

    /// Same as [`RouterConfig::new`] with development paths enabled.
    #[must_use]
    pub fn development(owner: Principal, router_principal: Principal) -> Self {
        Self {
            dev_mode: true,
            ..Self::new(owner, router_principal)
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| BlindRouteError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check limits.
    ///
    /// # Errors
    /// Returns `Configuration` if `max_agents` is zero or above `MAX_AGENTS`.
    pub fn validate(&self) -> Result<()> {
        if self.max_agents == 0 || self.max_agents > constants::MAX_AGENTS {
            return Err(BlindRouteError::Configuration(format!(
                "max_agents must be in 1..={}, got {}",
                constants::MAX_AGENTS,
                self.max_agents
            )));
        }
        Ok(())
    }
}
