//! Presentation of query results as text or JSON.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use iam_query_core::{ActionQuery, JsonProvider, Query, QueryKind, QueryOutput};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Listings one per line with a context header, records as JSON
    #[default]
    Text,
    /// Everything as indented JSON, no headers
    Json,
}

/// Render the result of `query`.
pub(crate) fn render(query: &Query, output: &QueryOutput, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(output);
    }

    let service = &query.service;
    let header = match &query.kind {
        QueryKind::Action(ActionQuery::All) => Some(format!("ALL {} actions:", service)),
        QueryKind::Action(ActionQuery::ByAccessLevel(level)) => Some(format!(
            "Service: {}\nAccess level: \"{}\"\nActions:",
            service, level
        )),
        QueryKind::Action(ActionQuery::ByConditionKey(key)) => Some(format!(
            "IAM actions under {} service that support the {} condition only:",
            service, key
        )),
        QueryKind::Action(ActionQuery::WildcardOnly) => Some(format!(
            "IAM actions under {} service that support wildcard resource values only:",
            service
        )),
        QueryKind::Action(ActionQuery::ByArnTypeAndAccessLevel { arn_type, level }) => Some(format!(
            "IAM actions under {} service with access level \"{}\" on ARN type {}:",
            service, level, arn_type
        )),
        _ => None,
    };

    // Bare listings print one item per line; filter results and records print as JSON.
    let body = match (&query.kind, output) {
        (
            QueryKind::Action(ActionQuery::All) | QueryKind::Arn(_) | QueryKind::Condition(_),
            QueryOutput::Names(names),
        ) => names.join("\n"),
        _ => to_json(output)?,
    };

    let mut rendered = String::new();
    if let Some(header) = header {
        writeln!(rendered, "{}", header)?;
    }
    rendered.push_str(&body);
    Ok(rendered)
}

/// Render the service listing.
pub(crate) fn render_services(services: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(services.join("\n")),
        OutputFormat::Json => to_json(services),
    }
}

fn to_json<T: ?Sized + Serialize>(value: &T) -> Result<String> {
    JsonProvider::stringify_pretty(value).context("Failed to serialize query result")
}
