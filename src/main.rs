//! gridline - Entry Point

use clap::Parser;
use gridline::config::CliOverrides;
use gridline::model::{CellValue, ColumnError, ColumnKey, GridError, RowId};
use gridline::pipeline::{SortDirection, SortState};
use gridline::records::{infer_columns, read_rows};
use gridline::state::{SelectionAction, Table};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

/// gridline - filter, sort and page a JSON array of objects
#[derive(Parser, Debug)]
#[command(name = "gridline")]
#[command(version)]
#[command(about = "Derive one page of a JSON table and print it as JSON lines")]
pub struct Args {
    /// Path to a JSON array of objects (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Column to sort by
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Filter as KEY=VALUE; repeat to combine filters
    #[arg(short, long, value_parser = parse_filter)]
    pub filter: Vec<(String, String)>,

    /// Page to print, starting at 1
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Print every matching row on one page
    #[arg(long, conflicts_with = "page_size")]
    pub no_pagination: bool,

    /// Mark a row as selected by id; repeatable
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Split `KEY=VALUE`.
fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

/// Interpret a filter value typed on the command line.
///
/// `true`/`false` filter booleans, numbers filter by numeric equality,
/// anything else is a case-insensitive substring.
fn filter_value(raw: &str) -> CellValue {
    match raw {
        "true" => CellValue::Bool(true),
        "false" => CellValue::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::text(raw),
        },
    }
}

/// Apply sort, filters, selection and page from the command line.
fn apply_args(table: &mut Table<Value>, args: &Args) -> Result<(), GridError> {
    for (key, value) in &args.filter {
        table.set_filter(key, filter_value(value))?;
    }

    if let Some(key) = &args.sort {
        let key = ColumnKey::new(key.as_str()).map_err(|_| ColumnError::MissingKey)?;
        let sort = if args.desc {
            SortState::descending(key)
        } else {
            SortState::ascending(key)
        };
        table.set_sort(sort)?;
    }

    for raw in &args.select {
        let id = raw.parse::<RowId>().unwrap_or_else(|_| RowId::Text(raw.clone()));
        table.apply_selection(SelectionAction::Select(id));
    }

    table.set_page(args.page.saturating_sub(1) as usize)
}

/// Write the displayed rows as JSON lines, then a summary line.
fn write_page<W: Write>(table: &Table<Value>, out: &mut W) -> io::Result<()> {
    for row in table.rows() {
        serde_json::to_writer(&mut *out, row.row)?;
        writeln!(out)?;
    }

    let sort = match (table.sort().column(), table.sort().direction()) {
        (Some(column), Some(direction)) => {
            let direction = match direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            json!(format!("{} {}", column, direction))
        }
        _ => Value::Null,
    };

    let summary = json!({
        "page": table.page() + 1,
        "total_pages": table.total_pages(),
        "total_items": table.total_items(),
        "displayed": table.len(),
        "selected": table.selection().len(),
        "sort": sort,
    });
    serde_json::to_writer(&mut *out, &summary)?;
    writeln!(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let overrides = CliOverrides {
        page_size: args.page_size.map(|n| n as usize),
        no_pagination: args.no_pagination,
    };
    let config = gridline::config::resolve(args.config.clone(), &overrides)?;

    gridline::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let rows = match &args.file {
        Some(path) => read_rows(BufReader::new(File::open(path)?))?,
        None => read_rows(io::stdin().lock())?,
    };
    let columns = infer_columns(&rows)?;

    let mut table = Table::new(rows, columns, config.table_options())?;
    apply_args(&mut table, &args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_page(&table, &mut out)?;

    Ok(())
}
