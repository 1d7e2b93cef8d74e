//! Serde model of an AWS service reference document.
//!
//! One document describes one service. Only the fields the query model needs are
//! kept; everything else in the published files (`Operations`, `SupportedBy`, ...)
//! is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// A single service reference document (`<service>.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReference {
    /// Service prefix, e.g. `s3`
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub actions: Vec<ServiceReferenceAction>,
    #[serde(default)]
    pub resources: Vec<ServiceReferenceResource>,
    #[serde(default)]
    pub condition_keys: Vec<ServiceReferenceConditionKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceAction {
    pub name: String,
    /// Explicit canonical access level; wins over `annotations` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    #[serde(default)]
    pub action_condition_keys: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Annotations {
    pub properties: AnnotationProperties,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnnotationProperties {
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_permission_management: bool,
    #[serde(default)]
    pub is_tagging_only: bool,
    #[serde(default)]
    pub is_write: bool,
}

/// A resource type an action can be scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceReference {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceResource {
    pub name: String,
    #[serde(rename = "ARNFormats", default)]
    pub arn_formats: Vec<String>,
    #[serde(default)]
    pub condition_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceConditionKey {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub description: String,
}
