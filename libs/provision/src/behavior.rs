//! Worker behavior configuration.
//!
//! The document the controller stores for its worker fleet: how tasks are
//! placed (`selectStrategy`) and how the fleet is scaled (`autoScaler`).
//!
//! Like [`AutoScalerPolicy`], this type is decoded only through
//! [`WorkerBehaviorConfig::from_json`] and [`WorkerBehaviorConfig::from_value`]
//! so a nested unknown provider keeps its error kind.

use std::sync::Arc;

use hoist_select::WorkerSelectStrategy;
use serde::Serialize;

use crate::{AutoScalerPolicy, ClientHandle, ProvisionError, Provisioner, RegionalClient};

/// Selection strategy plus optional autoscaler policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerBehaviorConfig {
    select_strategy: WorkerSelectStrategy,
    auto_scaler: Option<AutoScalerPolicy>,
}

impl WorkerBehaviorConfig {
    pub fn new(select_strategy: WorkerSelectStrategy, auto_scaler: Option<AutoScalerPolicy>) -> Self {
        Self {
            select_strategy,
            auto_scaler,
        }
    }

    /// Decode a behavior document.
    pub fn from_json(json: &str) -> Result<Self, ProvisionError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Decode a parsed behavior document.
    ///
    /// Missing or `null` sections take their defaults. The autoscaler section
    /// is decoded through the provider registry so an unknown provider
    /// surfaces as [`ProvisionError::UnsupportedProviderType`].
    pub fn from_value(mut value: serde_json::Value) -> Result<Self, ProvisionError> {
        let Some(object) = value.as_object_mut() else {
            return Err(ProvisionError::InvalidConfiguration(
                "worker behavior config must be a JSON object".to_string(),
            ));
        };

        let select_strategy = match object.remove("selectStrategy") {
            None | Some(serde_json::Value::Null) => WorkerSelectStrategy::default(),
            Some(strategy) => serde_json::from_value(strategy)?,
        };

        let auto_scaler = match object.remove("autoScaler") {
            None | Some(serde_json::Value::Null) => None,
            Some(policy) => Some(AutoScalerPolicy::from_value(policy)?),
        };

        Ok(Self::new(select_strategy, auto_scaler))
    }

    /// Encode to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ProvisionError> {
        serde_json::to_string_pretty(self).map_err(ProvisionError::encode)
    }

    pub fn select_strategy(&self) -> &WorkerSelectStrategy {
        &self.select_strategy
    }

    pub fn auto_scaler(&self) -> Option<&AutoScalerPolicy> {
        self.auto_scaler.as_ref()
    }

    /// Bind the autoscaler policy, if any, to a provider client.
    pub fn provisioner<C: RegionalClient>(
        &self,
        client: Arc<ClientHandle<C>>,
    ) -> Option<Provisioner<C>> {
        self.auto_scaler
            .clone()
            .map(|policy| Provisioner::new(policy, client))
    }
}
