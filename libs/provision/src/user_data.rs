//! Boot-time user data templates.
//!
//! A template carries a placeholder token that is replaced by the worker
//! version when a node is provisioned. The rendered text is base64 encoded
//! for the provider's launch call.

use std::borrow::Cow;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::ProvisionError;

/// Capability shared by all user data variants.
pub trait RenderUserData: Sized {
    /// Returns a copy bound to `version`.
    #[must_use]
    fn with_version(&self, version: &str) -> Self;

    /// Base64 encoding of the rendered payload.
    fn user_data_base64(&self) -> String;

    /// Bind `version` and encode in one step.
    fn render(&self, version: &str) -> String {
        self.with_version(version).user_data_base64()
    }
}

/// User data template, tagged by `impl` in configuration documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "impl", rename_all = "camelCase")]
pub enum UserData {
    /// Plain text template with a version placeholder.
    String(StringUserData),
}

impl UserData {
    /// Shorthand for a string template.
    pub fn string(
        data: impl Into<String>,
        version_replacement_string: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        Ok(Self::String(StringUserData::new(
            data,
            version_replacement_string,
        )?))
    }

    /// Rendered text before encoding.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::String(s) => s.text(),
        }
    }
}

impl RenderUserData for UserData {
    fn with_version(&self, version: &str) -> Self {
        match self {
            Self::String(s) => Self::String(s.with_version(version)),
        }
    }

    fn user_data_base64(&self) -> String {
        match self {
            Self::String(s) => s.user_data_base64(),
        }
    }
}

/// Text template whose `version_replacement_string` occurrences are
/// replaced by the bound version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StringUserDataDef")]
pub struct StringUserData {
    data: String,
    version_replacement_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StringUserDataDef {
    data: String,
    version_replacement_string: String,
    version: Option<String>,
}

impl TryFrom<StringUserDataDef> for StringUserData {
    type Error = ProvisionError;

    fn try_from(def: StringUserDataDef) -> Result<Self, Self::Error> {
        let template = Self::new(def.data, def.version_replacement_string)?;
        Ok(match def.version {
            Some(version) => template.with_version(&version),
            None => template,
        })
    }
}

impl StringUserData {
    /// Create an unbound template.
    ///
    /// Stricter than a plain string replace: the placeholder token must be
    /// non-empty, both here and on decode. An empty token would splice the
    /// version between every character of the template.
    pub fn new(
        data: impl Into<String>,
        version_replacement_string: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        let version_replacement_string = version_replacement_string.into();
        if version_replacement_string.is_empty() {
            return Err(ProvisionError::invalid_field(
                "versionReplacementString",
                "must not be empty",
            ));
        }

        Ok(Self {
            data: data.into(),
            version_replacement_string,
            version: None,
        })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn version_replacement_string(&self) -> &str {
        &self.version_replacement_string
    }

    /// The bound version, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Template text with every placeholder replaced by the bound version.
    /// Unbound templates and templates without the token are returned as is.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.version {
            Some(version) if self.data.contains(&self.version_replacement_string) => {
                Cow::Owned(self.data.replace(&self.version_replacement_string, version))
            }
            _ => Cow::Borrowed(&self.data),
        }
    }
}

impl RenderUserData for StringUserData {
    fn with_version(&self, version: &str) -> Self {
        Self {
            data: self.data.clone(),
            version_replacement_string: self.version_replacement_string.clone(),
            version: Some(version.to_string()),
        }
    }

    fn user_data_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.text().as_bytes())
    }
}
