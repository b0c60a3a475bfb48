//! Command-line interface of the server binary.

use crate::db::lower;
use crate::models::NewIngredient;
use crate::schema::{ingredients, users};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use diesel::prelude::*;
use foodgram_core::{parse_ingredients, ImportFormat, IngredientRecord};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram recipe backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (the default)
    Serve,
    /// Print the OpenAPI document and exit
    Openapi,
    /// Load ingredients from a file, skipping ones that already exist
    ImportIngredients {
        /// JSON array or CSV file of ingredients
        path: PathBuf,
        /// File format (default: from the file extension)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Give an existing user admin rights
    GrantAdmin {
        /// Email address of the user
        email: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ImportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => ImportFormat::Json,
            FormatArg::Csv => ImportFormat::Csv,
        }
    }
}

/// Explicit format if given, else `.csv` files are CSV and everything else JSON.
pub fn resolve_format(path: &Path, explicit: Option<FormatArg>) -> ImportFormat {
    if let Some(format) = explicit {
        return format.into();
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => ImportFormat::Csv,
        _ => ImportFormat::Json,
    }
}

// Keeps each INSERT well under Postgres' bind parameter limit
const IMPORT_BATCH_SIZE: usize = 1000;

/// Read and insert ingredients. Returns (records read, rows inserted).
pub fn import_ingredients(
    conn: &mut PgConnection,
    path: &Path,
    format: Option<FormatArg>,
) -> Result<(usize, usize)> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = parse_ingredients(&input, resolve_format(path, format))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let inserted = insert_ingredients(conn, &records)?;
    Ok((records.len(), inserted))
}

fn insert_ingredients(conn: &mut PgConnection, records: &[IngredientRecord]) -> Result<usize> {
    conn.transaction::<_, anyhow::Error, _>(|conn| {
        let mut inserted = 0;
        for batch in records.chunks(IMPORT_BATCH_SIZE) {
            let rows: Vec<NewIngredient> = batch
                .iter()
                .map(|r| NewIngredient {
                    name: &r.name,
                    measurement_unit: &r.measurement_unit,
                })
                .collect();
            inserted += diesel::insert_into(ingredients::table)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(conn)?;
        }
        Ok(inserted)
    })
}

pub fn grant_admin(conn: &mut PgConnection, email: &str) -> Result<()> {
    let target = users::table.filter(lower(users::email).eq(email.trim().to_lowercase()));
    let updated = diesel::update(target)
        .set(users::is_admin.eq(true))
        .execute(conn)?;

    if updated == 0 {
        bail!("No user with email {}", email);
    }
    Ok(())
}
