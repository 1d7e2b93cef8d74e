//! `iam-query`: look up IAM actions, ARN types and condition keys per AWS service.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use iam_query_core::{AccessLevel, Dataset, Query, QueryEngine, QueryError, QueryRequest, Table};
use log::info;

mod config;
mod output;

use config::DATASET_DIR_ENV;
use output::OutputFormat;

/// Exit status for invalid requests: unknown names, conflicting or malformed options.
const EXIT_USER_ERROR: u8 = 2;
/// Exit status when the reference dataset cannot be loaded.
const EXIT_DATASET_ERROR: u8 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "iam-query",
    version,
    about = "Query AWS IAM actions, ARN types and condition keys per service"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory of service reference JSON documents to load instead of the bundled corpus
    #[arg(long, env = DATASET_DIR_ENV, global = true, value_name = "DIR")]
    dataset_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query one service's actions, ARN types or condition keys
    Query(QueryArgs),
    /// List the services in the dataset
    Services {
        #[arg(long, value_enum, default_value_t)]
        fmt: OutputFormat,
    },
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Which entity table to query
    #[arg(long, value_enum)]
    table: TableArg,

    /// Service prefix, e.g. s3 or cloud9
    #[arg(long)]
    service: String,

    /// Name of a single action, ARN type or condition key
    #[arg(long)]
    name: Option<String>,

    /// Restrict actions to one access level
    #[arg(long, value_parser = PossibleValuesParser::new(AccessLevel::tokens()))]
    access_level: Option<String>,

    /// Restrict actions to those supporting this condition key
    #[arg(long)]
    condition: Option<String>,

    /// Restrict actions to those that only accept a wildcard resource
    #[arg(long)]
    wildcard_only: bool,

    /// List ARN type short names with their templates
    #[arg(long)]
    list_arn_types: bool,

    /// Restrict actions to those applying to this ARN type (requires --access-level)
    #[arg(long)]
    arn_type: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    fmt: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum TableArg {
    Action,
    Arn,
    Condition,
}

impl From<TableArg> for Table {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Action => Self::Action,
            TableArg::Arn => Self::Arn,
            TableArg::Condition => Self::Condition,
        }
    }
}

impl From<QueryArgs> for QueryRequest {
    fn from(args: QueryArgs) -> Self {
        Self {
            name: args.name,
            access_level: args.access_level,
            condition: args.condition,
            wildcard_only: args.wildcard_only,
            list_arn_types: args.list_arn_types,
            arn_type: args.arn_type,
            ..Self::new(args.table.into(), args.service)
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn load_dataset(dataset_dir: Option<PathBuf>) -> Result<Dataset> {
    let home = config::home_dir();
    let source = config::resolve_dataset_source(dataset_dir, home.as_deref());

    let start = Instant::now();
    let dataset = Dataset::load(&source)
        .with_context(|| format!("Failed to load IAM reference dataset from {}", source))?;
    info!(
        "Loaded {} services from {} in {:?}",
        dataset.services().count(),
        dataset.source(),
        start.elapsed()
    );
    Ok(dataset)
}

fn run_query(dataset: &Dataset, args: QueryArgs) -> Result<String> {
    let format = args.fmt;
    let query = Query::try_from(QueryRequest::from(args))?;

    let result = QueryEngine::new(dataset).execute(&query)?;
    output::render(&query, &result, format)
}

fn run(cli: Cli) -> Result<()> {
    let dataset = load_dataset(cli.dataset_dir)?;

    let rendered = match cli.command {
        Commands::Query(args) => run_query(&dataset, args)?,
        Commands::Services { fmt } => {
            output::render_services(&QueryEngine::new(&dataset).list_services(), fmt)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).context("Failed to write to stdout")?;
    Ok(())
}

fn exit_code_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<QueryError>() {
        Some(query_error) if query_error.is_user_error() => EXIT_USER_ERROR,
        _ => EXIT_DATASET_ERROR,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_query_args_map_to_request() {
        let cli = Cli::try_parse_from([
            "iam-query",
            "query",
            "--table",
            "action",
            "--service",
            "s3",
            "--access-level",
            "write",
            "--arn-type",
            "object",
        ])
        .unwrap();

        let Commands::Query(args) = cli.command else {
            panic!("expected query subcommand");
        };
        let request = QueryRequest::from(args);
        assert_eq!(request.table, Table::Action);
        assert_eq!(request.service, "s3");
        assert_eq!(request.access_level.as_deref(), Some("write"));
        assert_eq!(request.arn_type.as_deref(), Some("object"));
        assert!(!request.wildcard_only);
    }

    #[test]
    fn test_unlisted_access_level_rejected_at_parse() {
        let result = Cli::try_parse_from([
            "iam-query",
            "query",
            "--table",
            "action",
            "--service",
            "s3",
            "--access-level",
            "admin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exit_codes() {
        let user: anyhow::Error = QueryError::UnknownService("notaservice".to_string()).into();
        assert_eq!(exit_code_for(&user), EXIT_USER_ERROR);

        let dataset: anyhow::Error = QueryError::DatasetUnavailable("missing".to_string()).into();
        let dataset = dataset.context("Failed to load IAM reference dataset");
        assert_eq!(exit_code_for(&dataset), EXIT_DATASET_ERROR);
    }
}
