//! Node specifications.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::check_bounds;
use crate::ProvisionError;

/// Delegated identity a launched node assumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IamProfile {
    name: String,
    arn: String,
}

impl IamProfile {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Convert to the shape the provider's launch call expects.
    pub fn to_instance_profile_spec(&self) -> InstanceProfileSpecification {
        InstanceProfileSpecification {
            arn: Some(self.arn.clone()),
            name: Some(self.name.clone()),
        }
    }
}

/// Provider-native instance profile reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct InstanceProfileSpecification {
    pub arn: Option<String>,
    pub name: Option<String>,
}

/// Static description of a provisionable node.
///
/// Built with [`NodeSpecification::new`] and the `with_*` methods; the
/// instance bounds are checked once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NodeSpecificationDef")]
pub struct NodeSpecification {
    ami_id: String,
    instance_type: String,
    min_instances: i32,
    max_instances: i32,
    security_group_ids: Vec<String>,
    key_name: String,
    subnet_id: String,
    iam_profile: Option<IamProfile>,
    associate_public_ip_address: Option<bool>,
    tags: Option<Vec<BTreeMap<String, String>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeSpecificationDef {
    ami_id: String,
    instance_type: String,
    min_instances: i32,
    max_instances: i32,
    security_group_ids: Vec<String>,
    key_name: String,
    subnet_id: String,
    iam_profile: Option<IamProfile>,
    associate_public_ip_address: Option<bool>,
    tags: Option<Vec<BTreeMap<String, String>>>,
}

impl TryFrom<NodeSpecificationDef> for NodeSpecification {
    type Error = ProvisionError;

    fn try_from(def: NodeSpecificationDef) -> Result<Self, Self::Error> {
        let mut spec = Self::new(
            def.ami_id,
            def.instance_type,
            def.min_instances,
            def.max_instances,
        )?
        .with_security_group_ids(def.security_group_ids)
        .with_key_name(def.key_name)
        .with_subnet_id(def.subnet_id);

        spec.iam_profile = def.iam_profile;
        spec.associate_public_ip_address = def.associate_public_ip_address;
        spec.tags = def.tags;
        Ok(spec)
    }
}

impl NodeSpecification {
    /// Create a node specification.
    ///
    /// Fails if the image or instance type is empty, or if the instance
    /// bounds are negative or inverted.
    pub fn new(
        ami_id: impl Into<String>,
        instance_type: impl Into<String>,
        min_instances: i32,
        max_instances: i32,
    ) -> Result<Self, ProvisionError> {
        let ami_id = ami_id.into();
        let instance_type = instance_type.into();

        if ami_id.is_empty() {
            return Err(ProvisionError::invalid_field("amiId", "must not be empty"));
        }
        if instance_type.is_empty() {
            return Err(ProvisionError::invalid_field(
                "instanceType",
                "must not be empty",
            ));
        }
        check_bounds("minInstances", min_instances, "maxInstances", max_instances)?;

        Ok(Self {
            ami_id,
            instance_type,
            min_instances,
            max_instances,
            security_group_ids: Vec::new(),
            key_name: String::new(),
            subnet_id: String::new(),
            iam_profile: None,
            associate_public_ip_address: None,
            tags: None,
        })
    }

    #[must_use]
    pub fn with_security_group_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.security_group_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = key_name.into();
        self
    }

    #[must_use]
    pub fn with_subnet_id(mut self, subnet_id: impl Into<String>) -> Self {
        self.subnet_id = subnet_id.into();
        self
    }

    #[must_use]
    pub fn with_iam_profile(mut self, profile: IamProfile) -> Self {
        self.iam_profile = Some(profile);
        self
    }

    #[must_use]
    pub fn with_associate_public_ip_address(mut self, associate: bool) -> Self {
        self.associate_public_ip_address = Some(associate);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<BTreeMap<String, String>>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn ami_id(&self) -> &str {
        &self.ami_id
    }

    pub fn instance_type(&self) -> &str {
        &self.instance_type
    }

    pub fn min_instances(&self) -> i32 {
        self.min_instances
    }

    pub fn max_instances(&self) -> i32 {
        self.max_instances
    }

    /// Security groups in configured order.
    pub fn security_group_ids(&self) -> &[String] {
        &self.security_group_ids
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn subnet_id(&self) -> &str {
        &self.subnet_id
    }

    pub fn iam_profile(&self) -> Option<&IamProfile> {
        self.iam_profile.as_ref()
    }

    pub fn associate_public_ip_address(&self) -> Option<bool> {
        self.associate_public_ip_address
    }

    pub fn tags(&self) -> Option<&[BTreeMap<String, String>]> {
        self.tags.as_deref()
    }
}
