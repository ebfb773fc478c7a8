//! Launch intent for new workers.
//!
//! A [`Provisioner`] pairs a policy with the provider client it will be
//! executed against. The client is passed in explicitly at decode time; the
//! provisioner never issues provider calls itself, it only describes them.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    AutoScalerPolicy, BindOutcome, ClientHandle, EnvironmentConfig, InstanceProfileSpecification,
    ProvisionError, RegionBinder, RegionalClient, RenderUserData,
};

/// A single key/value resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

/// Everything the provider needs to launch a batch of worker nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub image_id: String,
    pub instance_type: String,
    pub min_count: i32,
    pub max_count: i32,
    pub availability_zone: String,
    pub key_name: String,
    pub subnet_id: String,
    pub security_group_ids: Vec<String>,
    pub iam_instance_profile: Option<InstanceProfileSpecification>,
    pub associate_public_ip_address: Option<bool>,
    pub tags: Vec<ResourceTag>,
    /// Base64 user data rendered for the requested worker version.
    pub user_data: String,
}

impl LaunchRequest {
    /// Describe a launch for `env` with user data bound to `worker_version`.
    pub fn for_environment(env: &EnvironmentConfig, worker_version: &str) -> Self {
        let node = env.node_data();

        // Tag maps are flattened in list order, keys sorted within each map.
        let tags = node
            .tags()
            .unwrap_or_default()
            .iter()
            .flat_map(|map| {
                map.iter().map(|(key, value)| ResourceTag {
                    key: key.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        Self {
            image_id: node.ami_id().to_string(),
            instance_type: node.instance_type().to_string(),
            min_count: node.min_instances(),
            max_count: node.max_instances(),
            availability_zone: env.availability_zone().to_string(),
            key_name: node.key_name().to_string(),
            subnet_id: node.subnet_id().to_string(),
            security_group_ids: node.security_group_ids().to_vec(),
            iam_instance_profile: node.iam_profile().map(|p| p.to_instance_profile_spec()),
            associate_public_ip_address: node.associate_public_ip_address(),
            tags,
            user_data: env.user_data().render(worker_version),
        }
    }
}

/// An autoscaler policy bound to a provider client.
pub struct Provisioner<C> {
    policy: AutoScalerPolicy,
    client: Arc<ClientHandle<C>>,
    binder: RegionBinder,
}

impl<C: RegionalClient> Provisioner<C> {
    pub fn new(policy: AutoScalerPolicy, client: Arc<ClientHandle<C>>) -> Self {
        Self {
            policy,
            client,
            binder: RegionBinder::new(),
        }
    }

    /// Decode a policy document and bind it to `client`.
    pub fn from_json(json: &str, client: Arc<ClientHandle<C>>) -> Result<Self, ProvisionError> {
        Ok(Self::new(AutoScalerPolicy::from_json(json)?, client))
    }

    pub fn policy(&self) -> &AutoScalerPolicy {
        &self.policy
    }

    pub fn client(&self) -> &Arc<ClientHandle<C>> {
        &self.client
    }

    /// Apply the policy's region to the client. Repeated calls are no-ops.
    pub fn bind_region(&self) -> BindOutcome {
        self.binder
            .bind(&self.client, self.policy.env_config().region())
    }

    /// Describe a launch of new workers running `worker_version`.
    ///
    /// Binds the client region first if that has not happened yet.
    #[instrument(skip(self), fields(provider = self.policy.provider_type()))]
    pub fn launch_request(&self, worker_version: &str) -> LaunchRequest {
        let outcome = self.bind_region();
        debug!(?outcome, "Region binding checked");
        LaunchRequest::for_environment(self.policy.env_config(), worker_version)
    }
}

impl<C> std::fmt::Debug for Provisioner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provisioner")
            .field("policy", &self.policy)
            .field("client", &self.client)
            .finish()
    }
}
