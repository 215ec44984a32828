use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use tracing::{info_span, warn};

use aero_cli::config::EtlConfig;
use aero_cli::pipeline::Orchestrator;
use aero_ingest::{FileKind, SourceFormat, classify_file, list_supported_files, preview_file};
use aero_load::MemoryStore;
use aero_model::{CanonicalMapping, RawRecord};

use crate::cli::DirArgs;
use crate::summary::{apply_table_style, dim_cell, header_cell};
use crate::types::EtlResult;

/// Configuration with the command-line directory overrides applied.
pub fn load_config(path: Option<&Path>, dirs: Option<&DirArgs>) -> Result<EtlConfig> {
    let mut config = EtlConfig::load(path)?;
    if let Some(dirs) = dirs {
        if let Some(dir) = &dirs.input_dir {
            config.paths.input_dir = dir.clone();
        }
        if let Some(dir) = &dirs.output_dir {
            config.paths.output_dir = dir.clone();
        }
        if let Some(dir) = &dirs.errors_dir {
            config.paths.errors_dir = dir.clone();
        }
    }
    Ok(config)
}

pub fn run_etl(config: &EtlConfig) -> Result<EtlResult> {
    config
        .ensure_directories()
        .context("prepare data directories")?;
    let mut store = MemoryStore::with_document_types(config.document_types.iter());
    let outcome = Orchestrator::new(config, &mut store).run()?;
    Ok(EtlResult {
        outcome,
        store_counts: store.counts(),
    })
}

pub fn run_files(config: &EtlConfig, rows: usize) -> Result<()> {
    let input_dir = &config.paths.input_dir;
    let _span = info_span!("files", dir = %input_dir.display()).entered();
    let files = list_supported_files(input_dir)
        .with_context(|| format!("list input directory {}", input_dir.display()))?;
    if files.is_empty() {
        println!("No supported files in {}", input_dir.display());
        return Ok(());
    }

    for path in &files {
        let kind = classify_file(path);
        let label = kind.map_or("skipped", FileKind::as_str);
        println!("{} [{label}]", path.display());

        let sections: Vec<Option<&str>> = match (kind, SourceFormat::from_path(path)) {
            (Some(FileKind::Flights), Ok(SourceFormat::Spreadsheet)) => vec![
                Some(config.processing.flights_sheet.as_str()),
                Some(config.processing.fares_sheet.as_str()),
            ],
            _ => vec![None],
        };
        for sheet in sections {
            match preview_file(path, sheet, rows) {
                Ok(preview) => {
                    if let Some(sheet) = sheet {
                        println!("  sheet: {sheet}");
                    }
                    print_preview(&preview.columns, &preview.rows);
                }
                Err(error) => {
                    warn!(file = %path.display(), %error, "preview failed");
                    eprintln!("  error: {error}");
                }
            }
        }
    }
    Ok(())
}

fn print_preview(columns: &[String], rows: &[RawRecord]) {
    let mut table = Table::new();
    table.set_header(columns.iter().map(|name| header_cell(name)));
    apply_table_style(&mut table);
    for record in rows {
        table.add_row(columns.iter().map(|name| {
            let value = record.get(name);
            if value.is_missing() {
                dim_cell("-")
            } else {
                Cell::new(value.render())
            }
        }));
    }
    println!("{table}");
}

pub fn run_mappings(config: &EtlConfig) -> Result<()> {
    let mappings = &config.mappings;
    for (name, mapping) in [
        ("document_type", &mappings.document_type),
        ("booking_status", &mappings.booking_status),
        ("fare_class", &mappings.fare_class),
    ] {
        println!("{name}");
        println!("{}", mapping_table(mapping));
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Name")]);
    apply_table_style(&mut table);
    for (code, name) in config.document_types.iter() {
        table.add_row(vec![code, name]);
    }
    println!("document_types");
    println!("{table}");
    Ok(())
}

fn mapping_table(mapping: &CanonicalMapping) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Raw"), header_cell("Canonical")]);
    apply_table_style(&mut table);
    for (raw, canonical) in mapping.iter() {
        table.add_row(vec![raw, canonical]);
    }
    table
}
