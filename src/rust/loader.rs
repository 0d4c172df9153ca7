use std::fs::File;
use std::io::Read;
use std::path::Path;
use serde::Deserialize;

use crate::classifier::{ClassifierError, DepartmentEntry, KeywordEntry};

#[derive(Debug, Deserialize)]
struct KeywordRow {
    #[serde(rename = "Keyword")]
    keyword: String,
    #[serde(rename = "Tag")]
    tag: String,
}

#[derive(Debug, Deserialize)]
struct DepartmentRow {
    #[serde(rename = "Tag")]
    tag: String,
    #[serde(rename = "Department")]
    department: String,
}

fn open(path: &Path, table: &str) -> Result<File, ClassifierError> {
    File::open(path).map_err(|e| {
        log::error!("Failed to open {} table at {:?}: {}", table, path, e);
        ClassifierError::Configuration(format!("Cannot open {} table {:?}: {}", table, path, e))
    })
}

fn read_rows<R, T>(reader: R, table: &str) -> Result<Vec<T>, ClassifierError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in csv_reader.deserialize().enumerate() {
        let row: T = record.map_err(|e| ClassifierError::Configuration(
            format!("Malformed {} table at row {}: {}", table, i + 1, e)
        ))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ClassifierError::Configuration(format!("{} table has no rows", table)));
    }
    log::info!("Loaded {} rows from the {} table", rows.len(), table);
    Ok(rows)
}

/// Parses a `Keyword,Tag` table.
pub fn read_keywords<R: Read>(reader: R) -> Result<Vec<KeywordEntry>, ClassifierError> {
    let rows: Vec<KeywordRow> = read_rows(reader, "keyword")?;
    Ok(rows.into_iter().map(|r| KeywordEntry::new(r.keyword, r.tag)).collect())
}

/// Parses a `Tag,Department` table.
pub fn read_departments<R: Read>(reader: R) -> Result<Vec<DepartmentEntry>, ClassifierError> {
    let rows: Vec<DepartmentRow> = read_rows(reader, "department")?;
    Ok(rows.into_iter().map(|r| DepartmentEntry::new(r.tag, r.department)).collect())
}

pub fn load_keywords<P: AsRef<Path>>(path: P) -> Result<Vec<KeywordEntry>, ClassifierError> {
    read_keywords(open(path.as_ref(), "keyword")?)
}

pub fn load_departments<P: AsRef<Path>>(path: P) -> Result<Vec<DepartmentEntry>, ClassifierError> {
    read_departments(open(path.as_ref(), "department")?)
}
