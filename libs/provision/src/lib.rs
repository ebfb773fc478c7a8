//! # hoist-provision
//!
//! Configuration model for elastically provisioned workers.
//!
//! ## Document shape
//!
//! An [`AutoScalerPolicy`] is persisted as JSON and tagged by provider family
//! (`"type": "ec2"`). It owns an [`EnvironmentConfig`], which owns a
//! [`NodeSpecification`] and a [`UserData`] template:
//!
//! ```text
//! AutoScalerPolicy { type, minNumWorkers, maxNumWorkers,
//!   envConfig: EnvironmentConfig { region, availabilityZone,
//!     nodeData: NodeSpecification, userData: UserData } }
//! ```
//!
//! ## Design Principles
//!
//! - Values are validated on construction and on decode; once built they are
//!   never mutated, updates replace the whole policy
//! - Decode then encode is lossless, equality is structural
//! - An unset region is always written as an explicit `null`; older documents
//!   that omit the field decode to the same value
//! - This crate produces provisioning intent ([`LaunchRequest`]); it never
//!   talks to a cloud provider

mod autoscaler;
mod behavior;
mod environment;
mod error;
mod node;
mod provisioner;
mod region;
mod user_data;

pub use autoscaler::{AutoScalerPolicy, Ec2AutoScalerConfig, EC2_TYPE};
pub use behavior::WorkerBehaviorConfig;
pub use environment::EnvironmentConfig;
pub use error::ProvisionError;
pub use node::{IamProfile, InstanceProfileSpecification, NodeSpecification};
pub use provisioner::{LaunchRequest, Provisioner, ResourceTag};
pub use region::{
    BindOutcome, ClientHandle, DryRunClient, Region, RegionBinder, RegionError, RegionalClient,
};
pub use user_data::{RenderUserData, StringUserData, UserData};
