//! Read-only access to the spreadsheet the reports are built from.
//!
//! A [`Workbook`] hands out whole [`Sheet`]s; each sheet is read once and then
//! scanned in memory. Rows and columns are 1-indexed like the spreadsheet UI.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use tracing::debug;

use crate::datekey::parse_date;
use crate::error::{AppError, Result};
use crate::models::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// A fully loaded sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last row holding any non-empty cell, or 0 for a blank sheet.
    pub fn last_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1)
    }

    pub fn last_column(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |i| i + 1)
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        if row == 0 || col == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .unwrap_or(&EMPTY)
    }

    /// Rectangular block starting at (`row`, `col`), padded with empty cells.
    pub fn get_cells(
        &self,
        row: usize,
        col: usize,
        row_count: usize,
        col_count: usize,
    ) -> Vec<Vec<CellValue>> {
        (row..row + row_count)
            .map(|r| (col..col + col_count).map(|c| self.cell(r, c).clone()).collect())
            .collect()
    }
}

pub trait Workbook {
    /// Load a sheet by name, failing with `MissingDataSource` when absent.
    fn sheet(&mut self, name: &str) -> Result<Sheet>;
}

// ---------------------------------------------------------------------------
// XLSX / ODS via calamine
// ---------------------------------------------------------------------------

pub struct XlsxWorkbook {
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::Settings(format!(
                "workbook not found: {}",
                path.display()
            )));
        }
        let inner = open_workbook_auto(path)?;
        Ok(Self { inner })
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet(&mut self, name: &str) -> Result<Sheet> {
        if !self.inner.sheet_names().iter().any(|n| n == name) {
            return Err(AppError::MissingDataSource(name.to_string()));
        }
        let range = self.inner.worksheet_range(name)?;
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row0 as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; col0 as usize];
            cells.extend(row.iter().map(convert_cell));
            rows.push(cells);
        }
        debug!(sheet = name, rows = rows.len(), "loaded sheet");
        Ok(Sheet::new(name, rows))
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        // as_datetime honours the workbook's 1900/1904 date system
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Date(value),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(value) => CellValue::Date(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

// ---------------------------------------------------------------------------
// In-memory workbook (demo data and tests)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct MemoryWorkbook {
    sheets: HashMap<String, Sheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.insert(sheet);
        self
    }

    pub fn insert(&mut self, sheet: Sheet) {
        self.sheets.insert(sheet.name().to_string(), sheet);
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::MissingDataSource(name.to_string()))
    }
}
