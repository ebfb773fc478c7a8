//! Provider environment binding.
//!
//! Region handling carries a compatibility contract with documents written
//! before `region` existed:
//!
//! | on the wire            | decoded        | re-encoded       |
//! |------------------------|----------------|------------------|
//! | `"region": "us-east-1"`| `Some(..)`     | `"us-east-1"`    |
//! | `"region": null`       | `None`         | `"region": null` |
//! | field missing          | `None`         | `"region": null` |
//!
//! Older readers require the field, so an unset region is never omitted.

use serde::{Deserialize, Serialize};

use crate::{NodeSpecification, UserData};

/// Binds a node specification and user data to a provider region and zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    #[serde(default)]
    region: Option<String>,
    availability_zone: String,
    node_data: NodeSpecification,
    user_data: UserData,
}

impl EnvironmentConfig {
    /// `region: None` leaves the provider client on its default region.
    pub fn new(
        region: Option<String>,
        availability_zone: impl Into<String>,
        node_data: NodeSpecification,
        user_data: UserData,
    ) -> Self {
        Self {
            region,
            availability_zone: availability_zone.into(),
            node_data,
            user_data,
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn availability_zone(&self) -> &str {
        &self.availability_zone
    }

    pub fn node_data(&self) -> &NodeSpecification {
        &self.node_data
    }

    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }
}
