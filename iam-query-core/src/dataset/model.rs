//! Entity records exposed by the query model.

use serde::Serialize;

use crate::access_level::AccessLevel;

/// A resource type an action can be scoped to, with its "required" flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceTypeRef {
    pub resource_type: String,
    pub required: bool,
}

/// An IAM action of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub service: String,
    pub name: String,
    pub access_level: AccessLevel,
    pub resource_types: Vec<ResourceTypeRef>,
    pub condition_keys: Vec<String>,
}

impl Action {
    /// `service:Name`, the form used in policy documents.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.service, self.name)
    }

    /// Actions without resource types can only be granted on `"Resource": "*"`.
    #[must_use]
    pub fn is_wildcard_only(&self) -> bool {
        self.resource_types.is_empty()
    }

    #[must_use]
    pub fn supports_resource_type(&self, short_name: &str) -> bool {
        self.resource_types
            .iter()
            .any(|r| r.resource_type.eq_ignore_ascii_case(short_name))
    }

    #[must_use]
    pub fn supports_condition_key(&self, key: &str) -> bool {
        self.condition_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// A resource ARN type of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArnType {
    pub service: String,
    pub short_name: String,
    pub raw_arn_template: String,
    pub condition_keys: Vec<String>,
}

/// A condition key of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionKey {
    pub service: String,
    pub name: String,
    pub description: String,
    pub value_type: String,
}
