// Reading the organization sheet from an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::report::io_sheet::SheetSource;
use crate::report::*;

pub struct LocalXlsx {
    path: String,
    worksheet: Option<String>,
}

impl LocalXlsx {
    /// Without a worksheet name, the first worksheet is used.
    pub fn new(path: &str, worksheet: Option<String>) -> LocalXlsx {
        LocalXlsx {
            path: path.to_string(),
            worksheet,
        }
    }

    fn unreachable(&self, message: String) -> FetchError {
        FetchError::Unreachable {
            resource: self.path.clone(),
            message,
        }
    }
}

impl SheetSource for LocalXlsx {
    fn describe(&self) -> String {
        match &self.worksheet {
            Some(ws) => format!("{} [{}]", self.path, ws),
            None => self.path.clone(),
        }
    }

    fn fetch(&self) -> Result<RawSheet, FetchError> {
        info!("LocalXlsx: reading {}", self.describe());
        let mut workbook: Xlsx<_> =
            open_workbook(&self.path).map_err(|e: calamine::XlsxError| self.unreachable(e.to_string()))?;
        let wrange = match &self.worksheet {
            Some(ws) => workbook.worksheet_range(ws),
            None => workbook.worksheet_range_at(0),
        }
        .ok_or_else(|| self.unreachable("missing worksheet".to_string()))?
        .map_err(|e| self.unreachable(e.to_string()))?;

        let rows: Vec<Vec<Cell>> = wrange
            .rows()
            .map(|row| row.iter().map(read_cell).collect::<Vec<Cell>>())
            .filter(|cells| !is_blank(cells))
            .collect();
        debug!("LocalXlsx: {} non-blank rows", rows.len());
        Ok(RawSheet::Rows(rows))
    }
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::Int(i) => Cell::Text(i.to_string()),
        DataType::Float(f) => Cell::Text(f.to_string()),
        DataType::Empty => Cell::Text(String::new()),
        other => {
            debug!("read_cell: unsupported cell {:?}, read as blank", other);
            Cell::Text(String::new())
        }
    }
}

fn is_blank(cells: &[Cell]) -> bool {
    cells.iter().all(|c| match c {
        Cell::Text(s) => s.trim().is_empty(),
        Cell::Bool(_) => false,
    })
}
