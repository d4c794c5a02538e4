//! Row storage behind a spreadsheet-shaped interface.
//!
//! The attendance core only ever sees rows of strings. [`RowStore`] is the
//! seam to whatever keeps those rows; ranges are addressed in A1 notation
//! (`Attendance!A2:I`). Two stores are provided: [`MemoryStore`] for tests
//! and embedding, and [`FileStore`] which keeps one tab-separated file per
//! sheet.

use crate::constants::{MAX_SHEET_COLUMNS, MAX_SHEET_ROWS, SHEET_FILE_EXTENSION};
use crate::error::{AttendanceError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Rows as kept by a store; rows may be ragged
pub type Grid = Vec<Vec<String>>;

// =============================================================================
// A1 Addressing
// =============================================================================

/// Zero-based cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Parse a cell such as `B3`
    pub fn parse(text: &str) -> Result<Self> {
        let captures = cell_pattern()
            .captures(text.trim())
            .ok_or_else(|| AttendanceError::invalid_range(text, "expected a cell like A1"))?;
        let column = parse_column(text, &captures[1])?;
        let row = parse_row_number(text, &captures[2])?;
        Ok(Self { column, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row + 1)
    }
}

/// Far corner of a range; a missing row means "to the last row"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEnd {
    pub column: usize,
    pub row: Option<usize>,
}

/// Sheet-qualified range in A1 notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub sheet: String,
    pub start: CellRef,
    /// `None` addresses the single start cell
    pub end: Option<RangeEnd>,
}

impl RangeSpec {
    /// Parse `Sheet!A2:I`, `'My Sheet'!A1:I10` or `Sheet!B3`
    pub fn parse(text: &str) -> Result<Self> {
        let (sheet, cells) = text
            .rsplit_once('!')
            .ok_or_else(|| AttendanceError::invalid_range(text, "missing sheet name"))?;
        Self::parse_in(sheet, cells)
    }

    /// Parse an unqualified range such as `A2:I` against a sheet
    pub fn parse_in(sheet: &str, cells: &str) -> Result<Self> {
        let sheet = sheet.trim().trim_matches('\'');
        if sheet.is_empty() {
            return Err(AttendanceError::invalid_range(cells, "empty sheet name"));
        }

        let captures = range_pattern().captures(cells.trim()).ok_or_else(|| {
            AttendanceError::invalid_range(cells, "expected A1 notation like A2:I")
        })?;

        let start = CellRef {
            column: parse_column(cells, &captures[1])?,
            row: parse_row_number(cells, &captures[2])?,
        };

        let end = match captures.get(3) {
            None => None,
            Some(end_column) => {
                let row = match captures.get(4) {
                    Some(row) => Some(parse_row_number(cells, row.as_str())?),
                    None => None,
                };
                Some(RangeEnd {
                    column: parse_column(cells, end_column.as_str())?,
                    row,
                })
            }
        };

        if let Some(end) = end {
            if end.column < start.column || end.row.is_some_and(|row| row < start.row) {
                return Err(AttendanceError::invalid_range(
                    cells,
                    "end lies before start",
                ));
            }
        }

        Ok(Self {
            sheet: sheet.to_string(),
            start,
            end,
        })
    }

    /// Range starting at `start` that exactly covers a block of rows
    pub fn covering(sheet: impl Into<String>, start: CellRef, rows: &[Vec<String>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let end = (!rows.is_empty() && width > 0).then(|| RangeEnd {
            column: start.column + width - 1,
            row: Some(start.row + rows.len() - 1),
        });
        Self {
            sheet: sheet.into(),
            start,
            end,
        }
    }

    fn last_column(&self) -> usize {
        self.end.map_or(self.start.column, |end| end.column)
    }

    fn last_row(&self) -> Option<usize> {
        match self.end {
            None => Some(self.start.row),
            Some(end) => end.row,
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sheet.contains(' ') {
            write!(f, "'{}'!{}", self.sheet, self.start)?;
        } else {
            write!(f, "{}!{}", self.sheet, self.start)?;
        }
        if let Some(end) = self.end {
            write!(f, ":{}", column_letters(end.column))?;
            if let Some(row) = end.row {
                write!(f, "{}", row + 1)?;
            }
        }
        Ok(())
    }
}

fn cell_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("valid cell pattern"))
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)([0-9]+)(?::([A-Za-z]+)([0-9]+)?)?$").expect("valid range pattern")
    })
}

fn parse_row_number(context: &str, digits: &str) -> Result<usize> {
    match digits.parse::<usize>() {
        Ok(row) if (1..=MAX_SHEET_ROWS).contains(&row) => Ok(row - 1),
        _ => Err(AttendanceError::invalid_range(
            context,
            format!("invalid row number '{}'", digits),
        )),
    }
}

fn parse_column(context: &str, letters: &str) -> Result<usize> {
    column_index(letters).ok_or_else(|| {
        AttendanceError::invalid_range(context, format!("invalid column '{}'", letters))
    })
}

/// Zero-based column index from letters (A = 0, Z = 25, AA = 26).
///
/// `None` for anything that is not letters or lies past the last sheet column.
pub fn column_index(letters: &str) -> Option<usize> {
    let number = letters.chars().try_fold(0usize, |acc, c| {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })?;
    number.checked_sub(1).filter(|&index| index < MAX_SHEET_COLUMNS)
}

/// Column letters from a zero-based index
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

// =============================================================================
// Store Interface
// =============================================================================

/// Spreadsheet-like storage of text rows
pub trait RowStore {
    /// Read the rows inside `range`
    fn fetch_rows(&self, range: &RangeSpec) -> Result<Grid>;

    /// Overwrite cells starting at the top-left of `location`; returns cells written
    fn write_rows(&mut self, rows: &[Vec<String>], location: &RangeSpec) -> Result<usize>;

    /// Add rows after the last row of `sheet`; returns rows appended
    fn append_rows(&mut self, rows: &[Vec<String>], sheet: &str) -> Result<usize>;

    /// Add an empty sheet; existing sheets are left alone
    fn create_sheet(&mut self, sheet: &str) -> Result<()>;

    fn has_sheet(&self, sheet: &str) -> Result<bool>;
}

/// Cut the rows and columns of `range` out of a sheet
fn slice_grid(grid: &Grid, range: &RangeSpec) -> Grid {
    let first_column = range.start.column;
    let last_column = range.last_column();
    let last_row = range
        .last_row()
        .unwrap_or_else(|| grid.len().saturating_sub(1));

    let mut rows: Grid = grid
        .iter()
        .enumerate()
        .skip(range.start.row)
        .take_while(|(index, _)| *index <= last_row)
        .map(|(_, row)| {
            row.iter()
                .skip(first_column)
                .take(last_column - first_column + 1)
                .cloned()
                .collect()
        })
        .collect();

    // Trailing blank rows are not reported
    while rows
        .last()
        .is_some_and(|row| row.iter().all(String::is_empty))
    {
        rows.pop();
    }
    rows
}

/// Write a block into a sheet, growing it where needed.
///
/// Blocks reaching past the sheet limits are refused before the grid grows.
fn write_block(grid: &mut Grid, start: CellRef, rows: &[Vec<String>]) -> Result<usize> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let rows_fit = start
        .row
        .checked_add(rows.len())
        .is_some_and(|end| end <= MAX_SHEET_ROWS);
    let columns_fit = start
        .column
        .checked_add(width)
        .is_some_and(|end| end <= MAX_SHEET_COLUMNS);
    if !rows_fit || !columns_fit {
        return Err(AttendanceError::invalid_range(
            format!("{:?}", start),
            format!(
                "a block of {} rows and {} columns does not fit in the sheet",
                rows.len(),
                width
            ),
        ));
    }

    let mut cells = 0;
    for (offset, row) in rows.iter().enumerate() {
        let row_index = start.row + offset;
        if grid.len() <= row_index {
            grid.resize_with(row_index + 1, Vec::new);
        }
        let target = &mut grid[row_index];
        if target.len() < start.column + row.len() {
            target.resize(start.column + row.len(), String::new());
        }
        for (column_offset, value) in row.iter().enumerate() {
            target[start.column + column_offset] = value.clone();
            cells += 1;
        }
    }
    Ok(cells)
}

// =============================================================================
// In-memory Store
// =============================================================================

/// Sheets held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sheets: BTreeMap<String, Grid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one sheet
    pub fn with_sheet(sheet: impl Into<String>, rows: Grid) -> Self {
        let mut sheets = BTreeMap::new();
        sheets.insert(sheet.into(), rows);
        Self { sheets }
    }

    fn sheet_mut(&mut self, sheet: &str) -> Result<&mut Grid> {
        self.sheets
            .get_mut(sheet)
            .ok_or_else(|| AttendanceError::SheetNotFound {
                sheet: sheet.to_string(),
            })
    }
}

impl RowStore for MemoryStore {
    fn fetch_rows(&self, range: &RangeSpec) -> Result<Grid> {
        let grid = self
            .sheets
            .get(&range.sheet)
            .ok_or_else(|| AttendanceError::SheetNotFound {
                sheet: range.sheet.clone(),
            })?;
        Ok(slice_grid(grid, range))
    }

    fn write_rows(&mut self, rows: &[Vec<String>], location: &RangeSpec) -> Result<usize> {
        let grid = self.sheet_mut(&location.sheet)?;
        write_block(grid, location.start, rows)
    }

    fn append_rows(&mut self, rows: &[Vec<String>], sheet: &str) -> Result<usize> {
        let grid = self.sheet_mut(sheet)?;
        grid.extend(rows.iter().cloned());
        Ok(rows.len())
    }

    fn create_sheet(&mut self, sheet: &str) -> Result<()> {
        self.sheets.entry(sheet.to_string()).or_default();
        Ok(())
    }

    fn has_sheet(&self, sheet: &str) -> Result<bool> {
        Ok(self.sheets.contains_key(sheet))
    }
}

// =============================================================================
// File-backed Store
// =============================================================================

/// One tab-separated file per sheet inside a directory.
///
/// Cells holding tabs, quotes or line breaks are quoted on disk. A row with
/// no cells is stored as a single empty cell and reads back that way.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `directory`, creating the directory if needed
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        debug!("Opened file store at {}", directory.display());
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn sheet_path(&self, sheet: &str) -> Result<PathBuf> {
        if sheet.is_empty() || sheet.contains(['/', '\\']) || sheet.starts_with('.') {
            return Err(AttendanceError::store(format!(
                "sheet name '{}' cannot be used as a file name",
                sheet
            )));
        }
        Ok(self
            .directory
            .join(format!("{}.{}", sheet, SHEET_FILE_EXTENSION)))
    }

    fn read_sheet(&self, sheet: &str) -> Result<Grid> {
        let path = self.sheet_path(sheet)?;
        if !path.exists() {
            return Err(AttendanceError::SheetNotFound {
                sheet: sheet.to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b'\t')
            .from_path(&path)?;

        reader
            .records()
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect()
    }

    fn write_sheet(&self, sheet: &str, grid: &Grid) -> Result<()> {
        let path = self.sheet_path(sheet)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b'\t')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&path)?;

        // Records without content are written as `""`, never as a blank line
        for row in grid {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl RowStore for FileStore {
    fn fetch_rows(&self, range: &RangeSpec) -> Result<Grid> {
        let grid = self.read_sheet(&range.sheet)?;
        let rows = slice_grid(&grid, range);
        debug!("Fetched {} rows from {}", rows.len(), range);
        Ok(rows)
    }

    fn write_rows(&mut self, rows: &[Vec<String>], location: &RangeSpec) -> Result<usize> {
        let mut grid = self.read_sheet(&location.sheet)?;
        let cells = write_block(&mut grid, location.start, rows)?;
        self.write_sheet(&location.sheet, &grid)?;
        info!("{} cells updated in {}", cells, location);
        Ok(cells)
    }

    fn append_rows(&mut self, rows: &[Vec<String>], sheet: &str) -> Result<usize> {
        let mut grid = self.read_sheet(sheet)?;
        grid.extend(rows.iter().cloned());
        self.write_sheet(sheet, &grid)?;
        info!("{} rows appended to the {} sheet", rows.len(), sheet);
        Ok(rows.len())
    }

    fn create_sheet(&mut self, sheet: &str) -> Result<()> {
        let path = self.sheet_path(sheet)?;
        if !path.exists() {
            fs::write(&path, "")?;
            info!("Created sheet {}", sheet);
        }
        Ok(())
    }

    fn has_sheet(&self, sheet: &str) -> Result<bool> {
        Ok(self.sheet_path(sheet)?.exists())
    }
}
