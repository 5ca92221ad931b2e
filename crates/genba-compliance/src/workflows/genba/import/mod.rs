//! Offline ingestion of genba exports. Each file is read in full; one bad row
//! fails the whole import.

mod rows;

use super::domain::{parse_calendar_date, ActivityRecord, GenbaError};
use super::loader::{GenbaArea, UserProfile};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use rows::{ActivityRow, AreaRow, UserRow};

#[derive(Debug, thiserror::Error)]
pub enum ActivityImportError {
    #[error("failed to read genba export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid genba CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    InvalidDate {
        line: u64,
        #[source]
        source: GenbaError,
    },
}

pub struct ActivityCsvImporter;

impl ActivityCsvImporter {
    pub fn activities_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ActivityRecord>, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::activities_from_reader(file)
    }

    pub fn activities_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ActivityRecord>, ActivityImportError> {
        read_rows::<ActivityRow, _>(reader)?
            .into_iter()
            .map(|(line, row)| {
                let date = parse_calendar_date(&row.date)
                    .map_err(|source| ActivityImportError::InvalidDate { line, source })?;
                Ok(ActivityRecord {
                    id: row.id,
                    date,
                    reporter_id: row.reporter_id,
                    reporter_name: row.reporter_name,
                    nik: row.nik.unwrap_or_default(),
                    area_id: row.area_id,
                    area_name: row.area_name,
                    department_name: row.department_name,
                    description: row.description.unwrap_or_default(),
                    photos: Vec::new(),
                })
            })
            .collect()
    }

    pub fn areas_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<GenbaArea>, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::areas_from_reader(file)
    }

    pub fn areas_from_reader<R: Read>(reader: R) -> Result<Vec<GenbaArea>, ActivityImportError> {
        Ok(read_rows::<AreaRow, _>(reader)?
            .into_iter()
            .map(|(_, row)| GenbaArea {
                id: row.id,
                name: row.name,
                department_name: row.department_name,
                pic_id: row.pic_id,
                is_default: row.is_default,
            })
            .collect())
    }

    pub fn users_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<UserProfile>, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::users_from_reader(file)
    }

    pub fn users_from_reader<R: Read>(reader: R) -> Result<Vec<UserProfile>, ActivityImportError> {
        Ok(read_rows::<UserRow, _>(reader)?
            .into_iter()
            .map(|(_, row)| UserProfile {
                id: row.id,
                name: row.name,
                nik: row.nik.unwrap_or_default(),
                department_name: row.department_name,
                is_default: row.is_default,
            })
            .collect())
    }
}

fn read_rows<T, R>(reader: R) -> Result<Vec<(u64, T)>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        rows.push((line, record.deserialize(Some(&headers))?));
    }

    Ok(rows)
}
