//! Per-service view of the dataset with prebuilt lookup indexes.
//!
//! Entities are kept in document order. Indexes map ASCII-lowercased names to
//! positions in those vectors, so lookups are case-insensitive and filters never
//! rescan the action list.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::model::{Action, ArnType, ConditionKey, ResourceTypeRef};
use super::service_reference::{ServiceReference, ServiceReferenceAction};
use crate::access_level::AccessLevel;
use crate::errors::{EntityKind, QueryError, Result};

const DEFAULT_VALUE_TYPE: &str = "String";

/// All actions, ARN types and condition keys of a single service.
#[derive(Debug, Clone)]
pub struct ServiceScope {
    name: String,
    version: Option<String>,
    actions: Vec<Action>,
    arn_types: Vec<ArnType>,
    condition_keys: Vec<ConditionKey>,
    action_index: HashMap<String, usize>,
    arn_type_index: HashMap<String, usize>,
    condition_key_index: HashMap<String, usize>,
    by_access_level: HashMap<AccessLevel, Vec<usize>>,
    by_condition_key: HashMap<String, Vec<usize>>,
    wildcard_only: Vec<usize>,
}

impl ServiceScope {
    /// Build a scope from a service reference document, validating data integrity.
    pub fn from_reference(reference: ServiceReference) -> Result<Self> {
        let service = reference.name.trim().to_string();
        if service.is_empty() {
            return Err(QueryError::DatasetUnavailable(
                "service reference document without a service name".to_string(),
            ));
        }

        let mut condition_keys = Vec::with_capacity(reference.condition_keys.len());
        let mut condition_key_index = HashMap::new();
        for key in reference.condition_keys {
            let position = condition_keys.len();
            if condition_key_index
                .insert(key.name.to_ascii_lowercase(), position)
                .is_some()
            {
                return Err(QueryError::integrity(
                    &service,
                    format!("duplicate condition key '{}'", key.name),
                ));
            }
            let value_type = key
                .types
                .into_iter()
                .next()
                .unwrap_or_else(|| DEFAULT_VALUE_TYPE.to_string());
            condition_keys.push(ConditionKey {
                service: service.clone(),
                name: key.name,
                description: key.description,
                value_type,
            });
        }

        let mut arn_types = Vec::with_capacity(reference.resources.len());
        let mut arn_type_index = HashMap::new();
        for resource in reference.resources {
            let position = arn_types.len();
            if arn_type_index
                .insert(resource.name.to_ascii_lowercase(), position)
                .is_some()
            {
                return Err(QueryError::integrity(
                    &service,
                    format!("duplicate resource type '{}'", resource.name),
                ));
            }
            let mut formats = resource.arn_formats.into_iter();
            let raw_arn_template = formats.next().ok_or_else(|| {
                QueryError::integrity(
                    &service,
                    format!("resource type '{}' has no ARN format", resource.name),
                )
            })?;
            let ignored = formats.count();
            if ignored > 0 {
                debug!(
                    "{}: resource type '{}' has {} additional ARN formats, keeping the first",
                    service, resource.name, ignored
                );
            }
            arn_types.push(ArnType {
                service: service.clone(),
                short_name: resource.name,
                raw_arn_template,
                condition_keys: dedup_preserving_order(resource.condition_keys),
            });
        }

        let mut actions = Vec::with_capacity(reference.actions.len());
        let mut action_index = HashMap::new();
        for raw_action in reference.actions {
            let position = actions.len();
            if action_index
                .insert(raw_action.name.to_ascii_lowercase(), position)
                .is_some()
            {
                return Err(QueryError::integrity(
                    &service,
                    format!("duplicate action '{}'", raw_action.name),
                ));
            }
            let action = build_action(&service, raw_action)?;
            for resource in &action.resource_types {
                if !arn_type_index.contains_key(&resource.resource_type.to_ascii_lowercase()) {
                    warn!(
                        "Action '{}' references undefined resource type '{}'",
                        action.qualified_name(),
                        resource.resource_type
                    );
                }
            }
            actions.push(action);
        }

        let mut by_access_level: HashMap<AccessLevel, Vec<usize>> = HashMap::new();
        let mut by_condition_key: HashMap<String, Vec<usize>> = HashMap::new();
        let mut wildcard_only = Vec::new();
        for (position, action) in actions.iter().enumerate() {
            by_access_level
                .entry(action.access_level)
                .or_default()
                .push(position);
            for key in &action.condition_keys {
                by_condition_key
                    .entry(key.to_ascii_lowercase())
                    .or_default()
                    .push(position);
            }
            if action.is_wildcard_only() {
                wildcard_only.push(position);
            }
        }

        debug!(
            "Indexed service {}: {} actions ({} wildcard-only), {} ARN types, {} condition keys",
            service,
            actions.len(),
            wildcard_only.len(),
            arn_types.len(),
            condition_keys.len()
        );

        Ok(Self {
            name: service,
            version: reference.version,
            actions,
            arn_types,
            condition_keys,
            action_index,
            arn_type_index,
            condition_key_index,
            by_access_level,
            by_condition_key,
            wildcard_only,
        })
    }

    /// True when the document defined no actions, resource types or condition keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.arn_types.is_empty() && self.condition_keys.is_empty()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version string of the service reference document, when published.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[must_use]
    pub fn arn_types(&self) -> &[ArnType] {
        &self.arn_types
    }

    #[must_use]
    pub fn condition_keys(&self) -> &[ConditionKey] {
        &self.condition_keys
    }

    /// Look up an action by name, with or without the `service:` prefix.
    pub fn action(&self, name: &str) -> Result<&Action> {
        let bare = match name.split_once(':') {
            Some((prefix, rest)) if prefix.eq_ignore_ascii_case(&self.name) => rest,
            Some(_) => return Err(self.unknown(EntityKind::Action, name)),
            None => name,
        };
        self.action_index
            .get(&bare.to_ascii_lowercase())
            .map(|&position| &self.actions[position])
            .ok_or_else(|| self.unknown(EntityKind::Action, name))
    }

    pub fn arn_type(&self, short_name: &str) -> Result<&ArnType> {
        self.arn_type_index
            .get(&short_name.to_ascii_lowercase())
            .map(|&position| &self.arn_types[position])
            .ok_or_else(|| self.unknown(EntityKind::ArnType, short_name))
    }

    pub fn condition_key(&self, name: &str) -> Result<&ConditionKey> {
        self.condition_key_index
            .get(&name.to_ascii_lowercase())
            .map(|&position| &self.condition_keys[position])
            .ok_or_else(|| self.unknown(EntityKind::ConditionKey, name))
    }

    /// Actions whose access level equals `level`, in document order.
    pub fn actions_with_access_level(&self, level: AccessLevel) -> impl Iterator<Item = &Action> {
        self.positions(self.by_access_level.get(&level))
    }

    /// Actions that list `key` among their condition keys. An undefined key matches nothing.
    pub fn actions_with_condition_key(&self, key: &str) -> impl Iterator<Item = &Action> {
        self.positions(self.by_condition_key.get(&key.to_ascii_lowercase()))
    }

    /// Actions with no resource types.
    pub fn wildcard_only_actions(&self) -> impl Iterator<Item = &Action> {
        self.positions(Some(&self.wildcard_only))
    }

    fn positions<'a>(&'a self, positions: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a Action> {
        positions
            .into_iter()
            .flatten()
            .map(move |&position| &self.actions[position])
    }

    fn unknown(&self, kind: EntityKind, name: &str) -> QueryError {
        QueryError::unknown_name(kind, self.name.clone(), name)
    }
}

fn build_action(service: &str, raw: ServiceReferenceAction) -> Result<Action> {
    let access_level = resolve_access_level(service, &raw)?;
    let mut seen = HashSet::new();
    let resource_types = raw
        .resources
        .into_iter()
        .filter(|r| seen.insert(r.name.to_ascii_lowercase()))
        .map(|r| ResourceTypeRef {
            resource_type: r.name,
            required: r.required,
        })
        .collect();

    Ok(Action {
        service: service.to_string(),
        name: raw.name,
        access_level,
        resource_types,
        condition_keys: dedup_preserving_order(raw.action_condition_keys),
    })
}

/// An explicit `AccessLevel` wins; otherwise the level follows the annotation flags,
/// most privileged first. Actions with neither are rejected.
fn resolve_access_level(service: &str, raw: &ServiceReferenceAction) -> Result<AccessLevel> {
    if let Some(label) = &raw.access_level {
        return label.parse().map_err(|_| {
            QueryError::integrity(
                service,
                format!(
                    "action '{}' has unrecognized access level '{}'",
                    raw.name, label
                ),
            )
        });
    }

    let properties = raw
        .annotations
        .as_ref()
        .map(|annotations| annotations.properties)
        .ok_or_else(|| {
            QueryError::integrity(service, format!("action '{}' has no access level", raw.name))
        })?;

    let level = if properties.is_permission_management {
        AccessLevel::PermissionsManagement
    } else if properties.is_tagging_only {
        AccessLevel::Tagging
    } else if properties.is_write {
        AccessLevel::Write
    } else if properties.is_list {
        AccessLevel::List
    } else {
        AccessLevel::Read
    };
    Ok(level)
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_ascii_lowercase()))
        .collect()
}
