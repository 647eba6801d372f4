mod cli;

use anyhow::{Context, Result};
use caseflow::import::{run_import, validate, ImportOutcome, ImportRequest, ValidationResult};
use caseflow::schema::RecordType;
use caseflow::store::{RecordStore, SqliteStore};
use caseflow::tenant::TenantContext;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::info;

/// How many row errors the terminal shows; the full list is always computed.
const ERROR_DISPLAY_CAP: usize = 50;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            // Opening applies the schema; this just makes it explicit
            let _ = SqliteStore::open(cli.db.clone())?;
            println!("Record store initialized");
            Ok(())
        }

        Commands::Import {
            record_type,
            file,
            org,
            user,
            year,
            dry_run,
        } => {
            handle_import(
                cli.db,
                cli.json,
                record_type.into(),
                &file,
                org,
                user,
                year,
                dry_run,
            )
            .await
        }

        Commands::List {
            record_type,
            org,
            year,
        } => handle_list(cli.db, cli.json, record_type.into(), &org, year).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_import(
    db: Option<PathBuf>,
    json: bool,
    record_type: RecordType,
    file: &PathBuf,
    org: String,
    user: Option<String>,
    year: Option<i32>,
    dry_run: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read CSV file {:?}", file))?;
    let filename = file.file_name().and_then(|n| n.to_str());

    let request = ImportRequest {
        record_type,
        text: &text,
        filename,
        year_override: year,
    };

    if dry_run {
        info!("dry run, nothing will be inserted");
        let outcome = match validate(&request) {
            ValidationResult::Blocked { errors } => ImportOutcome::Blocked { errors },
            ValidationResult::Empty => ImportOutcome::Empty,
            ValidationResult::Valid { records } => ImportOutcome::Accepted {
                inserted: records.len(),
            },
        };
        return report_outcome(outcome, json, true);
    }

    let store = SqliteStore::open(db)?;
    let tenant = TenantContext::new(org, user);
    let outcome = run_import(&store, &tenant, request).await?;
    report_outcome(outcome, json, false)
}

fn report_outcome(outcome: ImportOutcome, json: bool, dry_run: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if matches!(outcome, ImportOutcome::Blocked { .. }) {
            std::process::exit(1);
        }
        return Ok(());
    }

    match outcome {
        ImportOutcome::Accepted { inserted } if dry_run => {
            println!("Dry run: {inserted} row(s) validated, nothing inserted");
        }
        ImportOutcome::Accepted { inserted } => {
            println!("Imported {inserted} rows");
        }
        ImportOutcome::Empty => {
            println!("No valid rows found in CSV");
        }
        ImportOutcome::Blocked { errors } => {
            println!(
                "Import blocked - found {} validation error(s). Fix these and try again.",
                errors.len()
            );
            for error in errors.iter().take(ERROR_DISPLAY_CAP) {
                println!("  {error}");
            }
            if errors.len() > ERROR_DISPLAY_CAP {
                println!("  ...and {} more", errors.len() - ERROR_DISPLAY_CAP);
            }
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn handle_list(
    db: Option<PathBuf>,
    json: bool,
    record_type: RecordType,
    org: &str,
    year: Option<i32>,
) -> Result<()> {
    let store = SqliteStore::open(db)?;
    let schema = record_type.schema();

    let mut filters = vec![("organization_id".to_string(), org.to_string())];
    if let Some(y) = year {
        let partition = schema
            .partition
            .as_ref()
            .with_context(|| format!("{} records are not bucketed by year", schema.label))?;
        filters.push((partition.field.to_string(), y.to_string()));
    }

    let rows = store.select(schema, &filters, Some("id")).await?;

    let mut columns: Vec<&str> = schema.fields.iter().map(|f| f.name).collect();
    if let Some(p) = &schema.partition {
        columns.push(p.field);
    }

    if json {
        let out: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                obj.insert("id".to_string(), row.id.into());
                for (name, value) in columns.iter().zip(&row.fields) {
                    obj.insert(
                        name.to_string(),
                        value
                            .clone()
                            .map(serde_json::Value::String)
                            .unwrap_or(serde_json::Value::Null),
                    );
                }
                serde_json::Value::Object(obj)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No {} records found", schema.label);
        return Ok(());
    }

    let mut builder = Builder::default();
    let mut header = vec!["id".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    builder.push_record(header);
    for row in &rows {
        let mut cells = vec![row.id.to_string()];
        cells.extend(
            row.fields
                .iter()
                .map(|v| v.clone().unwrap_or_else(|| "NULL".to_string())),
        );
        builder.push_record(cells);
    }
    println!("{}", builder.build().with(Style::sharp()));
    Ok(())
}
