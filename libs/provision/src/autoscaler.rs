//! Autoscaler policies.
//!
//! A policy is tagged by provider family. Decoding reads the `type` tag and
//! dispatches through [`PROVIDER_DECODERS`]; a tag with no registered decoder
//! fails with [`ProvisionError::UnsupportedProviderType`] instead of falling
//! back to a default family.
//!
//! There is no `Deserialize` impl: a serde error cannot carry the error
//! kind, so decoding goes through [`AutoScalerPolicy::from_json`],
//! [`AutoScalerPolicy::from_slice`] or [`AutoScalerPolicy::from_value`].

use serde::{Deserialize, Serialize};

use crate::error::check_bounds;
use crate::{EnvironmentConfig, ProvisionError};

/// Discriminator for EC2-style providers.
pub const EC2_TYPE: &str = "ec2";

type Decoder = fn(serde_json::Value) -> Result<AutoScalerPolicy, ProvisionError>;

/// Registered provider families. Adding a family means adding a variant to
/// [`AutoScalerPolicy`] and an entry here.
const PROVIDER_DECODERS: &[(&str, Decoder)] = &[(EC2_TYPE, decode_ec2)];

fn decode_ec2(value: serde_json::Value) -> Result<AutoScalerPolicy, ProvisionError> {
    Ok(AutoScalerPolicy::Ec2(serde_json::from_value(value)?))
}

/// Autoscaling bounds and provisioning template for one provider family.
///
/// Equality is structural across every nested attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum AutoScalerPolicy {
    #[serde(rename = "ec2")]
    Ec2(Ec2AutoScalerConfig),
}

impl AutoScalerPolicy {
    /// Build an EC2 policy.
    pub fn ec2(
        min_num_workers: i32,
        max_num_workers: i32,
        env_config: EnvironmentConfig,
    ) -> Result<Self, ProvisionError> {
        Ok(Self::Ec2(Ec2AutoScalerConfig::new(
            min_num_workers,
            max_num_workers,
            env_config,
        )?))
    }

    /// Decode a policy document.
    pub fn from_json(json: &str) -> Result<Self, ProvisionError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Decode a policy document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProvisionError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    /// Decode a parsed policy document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProvisionError> {
        let tag = match value.get("type") {
            Some(serde_json::Value::String(tag)) => tag.clone(),
            Some(other) => {
                return Err(ProvisionError::invalid_field(
                    "type",
                    format_args!("must be a string, got {other}"),
                ))
            }
            None => return Err(ProvisionError::invalid_field("type", "is missing")),
        };

        let decoder = PROVIDER_DECODERS
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, decoder)| *decoder)
            .ok_or(ProvisionError::UnsupportedProviderType(tag))?;

        decoder(value)
    }

    /// Encode to the canonical JSON document.
    pub fn to_json(&self) -> Result<String, ProvisionError> {
        serde_json::to_string(self).map_err(ProvisionError::encode)
    }

    /// Encode to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ProvisionError> {
        serde_json::to_string_pretty(self).map_err(ProvisionError::encode)
    }

    /// Encode to raw bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>, ProvisionError> {
        serde_json::to_vec(self).map_err(ProvisionError::encode)
    }

    /// Tags that [`AutoScalerPolicy::from_value`] accepts.
    pub fn supported_provider_types() -> impl Iterator<Item = &'static str> {
        PROVIDER_DECODERS.iter().map(|(tag, _)| *tag)
    }

    /// The discriminator written to the `type` field.
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::Ec2(_) => EC2_TYPE,
        }
    }

    pub fn min_num_workers(&self) -> i32 {
        match self {
            Self::Ec2(config) => config.min_num_workers,
        }
    }

    pub fn max_num_workers(&self) -> i32 {
        match self {
            Self::Ec2(config) => config.max_num_workers,
        }
    }

    pub fn env_config(&self) -> &EnvironmentConfig {
        match self {
            Self::Ec2(config) => &config.env_config,
        }
    }

    /// Bound a desired worker count into `[min, max]`.
    pub fn clamp_workers(&self, desired: i32) -> i32 {
        desired.clamp(self.min_num_workers(), self.max_num_workers())
    }
}

/// Worker bounds and environment for an EC2-style provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Ec2AutoScalerConfigDef")]
pub struct Ec2AutoScalerConfig {
    min_num_workers: i32,
    max_num_workers: i32,
    env_config: EnvironmentConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ec2AutoScalerConfigDef {
    min_num_workers: i32,
    max_num_workers: i32,
    env_config: EnvironmentConfig,
}

impl TryFrom<Ec2AutoScalerConfigDef> for Ec2AutoScalerConfig {
    type Error = ProvisionError;

    fn try_from(def: Ec2AutoScalerConfigDef) -> Result<Self, Self::Error> {
        Self::new(def.min_num_workers, def.max_num_workers, def.env_config)
    }
}

impl Ec2AutoScalerConfig {
    /// Fails if either bound is negative or `min_num_workers > max_num_workers`.
    pub fn new(
        min_num_workers: i32,
        max_num_workers: i32,
        env_config: EnvironmentConfig,
    ) -> Result<Self, ProvisionError> {
        check_bounds(
            "minNumWorkers",
            min_num_workers,
            "maxNumWorkers",
            max_num_workers,
        )?;

        Ok(Self {
            min_num_workers,
            max_num_workers,
            env_config,
        })
    }

    pub fn min_num_workers(&self) -> i32 {
        self.min_num_workers
    }

    pub fn max_num_workers(&self) -> i32 {
        self.max_num_workers
    }

    pub fn env_config(&self) -> &EnvironmentConfig {
        &self.env_config
    }
}
