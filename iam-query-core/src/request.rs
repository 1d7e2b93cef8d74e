//! Request shapes accepted by the query engine.
//!
//! Callers describe a query with the flat [`QueryRequest`] (one field per command
//! line option). [`Query::try_from`] validates it once: conflicting options are
//! rejected with `ConflictingFilters`, access-level tokens are normalized, and the
//! result is a closed [`Query`] value naming exactly one operation.

use std::fmt;

use crate::access_level::{normalize, AccessLevel};
use crate::errors::{QueryError, Result};

/// The entity table a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Action,
    Arn,
    Condition,
}

impl Table {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Arn => "arn",
            Self::Condition => "condition",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat request as it arrives from the boundary layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub table: Table,
    pub service: String,
    pub name: Option<String>,
    /// User token such as `permissions-management`
    pub access_level: Option<String>,
    pub condition: Option<String>,
    pub wildcard_only: bool,
    pub list_arn_types: bool,
    /// ARN type short name, only valid together with `access_level`
    pub arn_type: Option<String>,
}

impl QueryRequest {
    /// A request for `table` in `service` with no filters set.
    pub fn new(table: Table, service: impl Into<String>) -> Self {
        Self {
            table,
            service: service.into(),
            name: None,
            access_level: None,
            condition: None,
            wildcard_only: false,
            list_arn_types: false,
            arn_type: None,
        }
    }

    /// Names of the options that are set, in command line spelling.
    fn set_options(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.name.is_some() {
            set.push("--name");
        }
        if self.access_level.is_some() {
            set.push("--access-level");
        }
        if self.condition.is_some() {
            set.push("--condition");
        }
        if self.wildcard_only {
            set.push("--wildcard-only");
        }
        if self.list_arn_types {
            set.push("--list-arn-types");
        }
        if self.arn_type.is_some() {
            set.push("--arn-type");
        }
        set
    }
}

/// A validated query: one service and exactly one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub service: String,
    pub kind: QueryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Action(ActionQuery),
    Arn(ArnQuery),
    Condition(ConditionQuery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionQuery {
    All,
    ByName(String),
    ByAccessLevel(AccessLevel),
    ByConditionKey(String),
    WildcardOnly,
    ByArnTypeAndAccessLevel { arn_type: String, level: AccessLevel },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArnQuery {
    RawTemplates,
    Types,
    ByName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionQuery {
    All,
    ByName(String),
}

impl Query {
    pub fn new(service: impl Into<String>, kind: QueryKind) -> Self {
        Self {
            service: service.into(),
            kind,
        }
    }
}

impl TryFrom<QueryRequest> for Query {
    type Error = QueryError;

    fn try_from(request: QueryRequest) -> Result<Self> {
        let options = request.set_options();
        let service = request.service.clone();
        let table = request.table;
        let kind = match table {
            Table::Action => QueryKind::Action(action_query(request, &options)?),
            Table::Arn => QueryKind::Arn(arn_query(request, &options)?),
            Table::Condition => QueryKind::Condition(condition_query(request, &options)?),
        };
        Ok(Self::new(service, kind))
    }
}

fn reject_outside(table: Table, options: &[&'static str], allowed: &[&str]) -> Result<()> {
    let rejected: Vec<_> = options
        .iter()
        .filter(|option| !allowed.contains(*option))
        .copied()
        .collect();
    if rejected.is_empty() {
        return Ok(());
    }
    Err(QueryError::conflicting(format!(
        "{} cannot be used with --table {}",
        rejected.join(", "),
        table
    )))
}

fn action_query(request: QueryRequest, options: &[&'static str]) -> Result<ActionQuery> {
    reject_outside(
        Table::Action,
        options,
        &["--name", "--access-level", "--condition", "--wildcard-only", "--arn-type"],
    )?;

    if let Some(arn_type) = request.arn_type {
        return match request.access_level {
            Some(token) if options.len() == 2 => Ok(ActionQuery::ByArnTypeAndAccessLevel {
                arn_type,
                level: normalize(&token)?,
            }),
            _ => Err(QueryError::conflicting(format!(
                "--arn-type must be combined with --access-level only (got {})",
                options.join(", ")
            ))),
        };
    }

    if options.len() > 1 {
        return Err(QueryError::conflicting(format!(
            "only one of --name, --access-level, --condition, --wildcard-only may be given (got {})",
            options.join(", ")
        )));
    }

    let query = if let Some(name) = request.name {
        ActionQuery::ByName(name)
    } else if let Some(token) = request.access_level {
        ActionQuery::ByAccessLevel(normalize(&token)?)
    } else if let Some(key) = request.condition {
        ActionQuery::ByConditionKey(key)
    } else if request.wildcard_only {
        ActionQuery::WildcardOnly
    } else {
        ActionQuery::All
    };
    Ok(query)
}

fn arn_query(request: QueryRequest, options: &[&'static str]) -> Result<ArnQuery> {
    reject_outside(Table::Arn, options, &["--name", "--list-arn-types"])?;

    match (request.name, request.list_arn_types) {
        (Some(_), true) => Err(QueryError::conflicting(
            "--name and --list-arn-types are mutually exclusive",
        )),
        (Some(name), false) => Ok(ArnQuery::ByName(name)),
        (None, true) => Ok(ArnQuery::Types),
        (None, false) => Ok(ArnQuery::RawTemplates),
    }
}

fn condition_query(request: QueryRequest, options: &[&'static str]) -> Result<ConditionQuery> {
    reject_outside(Table::Condition, options, &["--name"])?;

    Ok(match request.name {
        Some(name) => ConditionQuery::ByName(name),
        None => ConditionQuery::All,
    })
}
