//! Spreadsheet parsing
//!
//! The first worksheet is read; its first row names the columns. Numbers
//! may be stored as numeric cells or as text.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

use super::import::UploadRow;
use crate::{ClientError, ClientResult};

const COL_ID: &str = "ID";
const COL_QUANTITY: &str = "Quantity";
const COL_DISCOUNT: &str = "Discount";
const COL_IS_EXIST: &str = "IsExist";
const COL_DRUG: &str = "drug";
const COL_NAME_AR: &str = "product_name";
const COL_NAME_EN: &str = "product_name_en";

#[derive(Debug, Default)]
struct Columns {
    id: usize,
    quantity: Option<usize>,
    discount: Option<usize>,
    is_exist: Option<usize>,
    drug: Option<usize>,
    name_ar: Option<usize>,
    name_en: Option<usize>,
}

impl Columns {
    fn from_header(header: &[Data]) -> ClientResult<Self> {
        let find = |name: &str| {
            header.iter().position(|cell| {
                cell_string(cell).is_some_and(|s| s.eq_ignore_ascii_case(name))
            })
        };
        let id = find(COL_ID)
            .ok_or_else(|| ClientError::Spreadsheet(format!("missing column {COL_ID}")))?;
        Ok(Self {
            id,
            quantity: find(COL_QUANTITY),
            discount: find(COL_DISCOUNT),
            is_exist: find(COL_IS_EXIST),
            drug: find(COL_DRUG),
            name_ar: find(COL_NAME_AR),
            name_en: find(COL_NAME_EN),
        })
    }
}

fn cell_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell_i64(cell: &Data) -> Option<i64> {
    cell_f64(cell).filter(|f| f.fract() == 0.0).map(|f| f as i64)
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|c| match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// One data row with its 1-based sheet line
struct SheetRow<'a> {
    line: usize,
    cells: &'a [Data],
}

impl SheetRow<'_> {
    fn cell(&self, idx: Option<usize>) -> Option<&Data> {
        idx.and_then(|i| self.cells.get(i))
            .filter(|c| cell_string(c).is_some())
    }

    fn invalid(&self, column: &str, cell: Option<&Data>) -> ClientError {
        match cell {
            Some(cell) => ClientError::Spreadsheet(format!(
                "row {}: invalid {column} {cell:?}",
                self.line
            )),
            None => ClientError::Spreadsheet(format!("row {}: missing {column}", self.line)),
        }
    }

    fn required<T>(
        &self,
        column: &str,
        idx: Option<usize>,
        parse: impl Fn(&Data) -> Option<T>,
    ) -> ClientResult<T> {
        let cell = self.cell(idx);
        cell.and_then(&parse).ok_or_else(|| self.invalid(column, cell))
    }

    fn optional<T>(
        &self,
        column: &str,
        idx: Option<usize>,
        parse: impl Fn(&Data) -> Option<T>,
    ) -> ClientResult<Option<T>> {
        match self.cell(idx) {
            None => Ok(None),
            Some(cell) => parse(cell)
                .map(Some)
                .ok_or_else(|| self.invalid(column, Some(cell))),
        }
    }

    fn text(&self, idx: Option<usize>) -> Option<String> {
        self.cell(idx).and_then(cell_string)
    }
}

/// Parse rows from an `.xlsx`, `.xls` or `.ods` workbook
///
/// Only rows with `IsExist = 1` are returned; other rows are not inspected.
/// On a returned row `ID`, `Quantity` and `Discount` must hold numbers, and
/// `ID`, `Quantity` and `drug` must be whole.
pub fn parse_workbook(bytes: &[u8]) -> ClientResult<Vec<UploadRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ClientError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ClientError::Spreadsheet("workbook has no sheets".into()))?
        .map_err(|e| ClientError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ClientError::Spreadsheet("sheet is empty".into()))?;
    let cols = Columns::from_header(header)?;

    let mut out = Vec::new();
    // Row numbers are 1-based with the header on row 1
    for (i, cells) in rows.enumerate() {
        if is_blank(cells) {
            continue;
        }
        let row = SheetRow { line: i + 2, cells };
        let is_exist = row.cell(cols.is_exist).and_then(cell_i64).unwrap_or_default();
        if is_exist != 1 {
            continue;
        }

        out.push(UploadRow {
            medicine_id: row.required(COL_ID, Some(cols.id), cell_i64)?,
            quantity: row.required(COL_QUANTITY, cols.quantity, cell_i64)?,
            discount: row.required(COL_DISCOUNT, cols.discount, cell_f64)?,
            drug: row
                .optional(COL_DRUG, cols.drug, cell_i64)?
                .map(|d| i32::try_from(d).map_err(|_| row.invalid(COL_DRUG, row.cell(cols.drug))))
                .transpose()?,
            is_exist,
            product_name: row.text(cols.name_ar),
            product_name_en: row.text(cols.name_en),
        });
    }
    Ok(out)
}

/// Parse rows from a JSON array of sheet rows
pub fn parse_json_rows(bytes: &[u8]) -> ClientResult<Vec<UploadRow>> {
    Ok(serde_json::from_slice(bytes)?)
}
