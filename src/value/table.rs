//! Numeric CSV tables with named columns, shared by the material and sequence
//! loaders. Columns are looked up by header name; extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::DataFormatError;

pub fn read_columns<const N: usize>(
    path: &Path,
    names: [&'static str; N],
) -> Result<[Vec<f64>; N], DataFormatError> {
    let file = File::open(path).map_err(|source| DataFormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_columns(file, names)
}

pub fn parse_columns<R: Read, const N: usize>(
    reader: R,
    names: [&'static str; N],
) -> Result<[Vec<f64>; N], DataFormatError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    for (i, header) in headers.iter().enumerate() {
        if headers.iter().skip(i + 1).any(|other| other == header) {
            return Err(DataFormatError::DuplicateColumn(header.to_owned()));
        }
    }

    let mut indices = [0usize; N];
    for (slot, name) in indices.iter_mut().zip(names) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or(DataFormatError::MissingColumn(name))?;
    }

    let mut columns: [Vec<f64>; N] = std::array::from_fn(|_| Vec::new());
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        for ((column, &index), name) in columns.iter_mut().zip(&indices).zip(names) {
            let cell = record.get(index).unwrap_or_default();
            let value = cell.parse::<f64>().map_err(|_| DataFormatError::NotANumber {
                column: name,
                row: row + 1,
                cell: cell.to_owned(),
            })?;
            column.push(value);
        }
    }
    Ok(columns)
}
