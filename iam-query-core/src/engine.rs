//! Query engine over a loaded [`Dataset`].
//!
//! Every operation is a pure read against the immutable dataset, scoped to one
//! service. Unknown services and names are errors; filters that match nothing
//! return an empty sequence.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::access_level::AccessLevel;
use crate::dataset::{Action, ArnType, ConditionKey, Dataset};
use crate::errors::Result;
use crate::request::{ActionQuery, ArnQuery, ConditionQuery, Query, QueryKind};

/// Result of a single query.
///
/// Serializes untagged, so a presentation layer prints the bare value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    /// A sequence of names or raw ARN templates
    Names(Vec<String>),
    /// ARN type short name to raw ARN template
    ArnTypes(BTreeMap<String, String>),
    Action(Action),
    ArnType(ArnType),
    ConditionKey(ConditionKey),
}

/// Stateless query engine borrowing a dataset.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> QueryEngine<'a> {
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Run the single operation `query` names.
    pub fn execute(&self, query: &Query) -> Result<QueryOutput> {
        debug!("Executing {:?} for service {}", query.kind, query.service);
        let service = query.service.as_str();

        let output = match &query.kind {
            QueryKind::Action(action_query) => match action_query {
                ActionQuery::All => QueryOutput::Names(self.list_actions(service)?),
                ActionQuery::ByName(name) => QueryOutput::Action(self.action_detail(service, name)?),
                ActionQuery::ByAccessLevel(level) => {
                    QueryOutput::Names(self.actions_by_access_level(service, *level)?)
                }
                ActionQuery::ByConditionKey(key) => {
                    QueryOutput::Names(self.actions_by_condition_key(service, key)?)
                }
                ActionQuery::WildcardOnly => {
                    QueryOutput::Names(self.wildcard_only_actions(service)?)
                }
                ActionQuery::ByArnTypeAndAccessLevel { arn_type, level } => QueryOutput::Names(
                    self.actions_by_arn_type_and_access_level(service, arn_type, *level)?,
                ),
            },
            QueryKind::Arn(arn_query) => match arn_query {
                ArnQuery::RawTemplates => QueryOutput::Names(self.list_raw_arn_templates(service)?),
                ArnQuery::Types => QueryOutput::ArnTypes(self.list_arn_types(service)?),
                ArnQuery::ByName(name) => QueryOutput::ArnType(self.arn_type_detail(service, name)?),
            },
            QueryKind::Condition(condition_query) => match condition_query {
                ConditionQuery::All => QueryOutput::Names(self.list_condition_keys(service)?),
                ConditionQuery::ByName(name) => {
                    QueryOutput::ConditionKey(self.condition_key_detail(service, name)?)
                }
            },
        };
        Ok(output)
    }

    /// Every service in the dataset, sorted.
    #[must_use]
    pub fn list_services(&self) -> Vec<String> {
        self.dataset.services().map(str::to_string).collect()
    }

    pub fn list_condition_keys(&self, service: &str) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(scope.condition_keys().iter().map(|k| k.name.clone()).collect())
    }

    pub fn condition_key_detail(&self, service: &str, name: &str) -> Result<ConditionKey> {
        Ok(self.dataset.for_service(service)?.condition_key(name)?.clone())
    }

    /// Raw ARN templates, one per ARN type.
    pub fn list_raw_arn_templates(&self, service: &str) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(scope
            .arn_types()
            .iter()
            .map(|arn_type| arn_type.raw_arn_template.clone())
            .collect())
    }

    /// ARN type short names mapped to their raw templates.
    pub fn list_arn_types(&self, service: &str) -> Result<BTreeMap<String, String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(scope
            .arn_types()
            .iter()
            .map(|arn_type| (arn_type.short_name.clone(), arn_type.raw_arn_template.clone()))
            .collect())
    }

    pub fn arn_type_detail(&self, service: &str, short_name: &str) -> Result<ArnType> {
        Ok(self.dataset.for_service(service)?.arn_type(short_name)?.clone())
    }

    pub fn list_actions(&self, service: &str) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(names(scope.actions().iter()))
    }

    /// Accepts `GetObject` as well as `s3:GetObject`.
    pub fn action_detail(&self, service: &str, name: &str) -> Result<Action> {
        Ok(self.dataset.for_service(service)?.action(name)?.clone())
    }

    pub fn actions_by_access_level(&self, service: &str, level: AccessLevel) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(names(scope.actions_with_access_level(level)))
    }

    /// Actions supporting condition key `key`. An undefined key yields no matches, not an error.
    pub fn actions_by_condition_key(&self, service: &str, key: &str) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(names(scope.actions_with_condition_key(key)))
    }

    /// Actions that cannot be restricted by resource ARN.
    pub fn wildcard_only_actions(&self, service: &str) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        Ok(names(scope.wildcard_only_actions()))
    }

    /// Actions at `level` that can be scoped to ARN type `arn_type`.
    ///
    /// Unlike the condition key filter, the ARN type must exist.
    pub fn actions_by_arn_type_and_access_level(
        &self,
        service: &str,
        arn_type: &str,
        level: AccessLevel,
    ) -> Result<Vec<String>> {
        let scope = self.dataset.for_service(service)?;
        let short_name = &scope.arn_type(arn_type)?.short_name;
        Ok(names(
            scope
                .actions_with_access_level(level)
                .filter(|action| action.supports_resource_type(short_name)),
        ))
    }
}

fn names<'a>(actions: impl Iterator<Item = &'a Action>) -> Vec<String> {
    actions.map(|action| action.name.clone()).collect()
}
