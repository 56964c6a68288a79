// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use csv::{ReaderBuilder, StringRecord, Trim};
use logger::*;

use std::fs::File;
use std::io::Read;
use std::path::Path;

const COLUMNS: [&str; 3] = ["byte_size", "random_latency_ns", "sequential_latency_ns"];

/// One row of the latency benchmark output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub bytes: u64,
    pub random_ns: f64,
    pub sequential_ns: f64,
}

/// How the delimited input is laid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableOptions {
    header: bool,
    delimiter: u8,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            header: true,
            delimiter: b',',
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// whether the first line holds column names and must be skipped
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_header(&self) -> bool {
        self.header
    }

    pub fn field_delimiter(&self) -> u8 {
        self.delimiter
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementTable {
    rows: Vec<Measurement>,
}

impl MeasurementTable {
    pub fn load<P: AsRef<Path>>(path: P, options: TableOptions) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, options)?;
        info!(
            "loaded {} measurements from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, options: TableOptions) -> Result<Self, Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(options.header)
            .delimiter(options.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Measurement> = Vec::new();
        for record in reader.records() {
            let record = record?;
            // whitespace-only line, a row of empty cells still fails below
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row = parse_row(&record, line)?;

            if let Some(previous) = rows.last() {
                if row.bytes <= previous.bytes {
                    warn!(
                        "line {}: byte size {} does not increase (previous {})",
                        line, row.bytes, previous.bytes
                    );
                }
            }

            trace!("line {}: {:?}", line, row);
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(Error::EmptyTable);
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (byte size, random access latency) in input order
    pub fn random(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rows.iter().map(|r| (r.bytes as f64, r.random_ns))
    }

    /// (byte size, sequential access latency) in input order
    pub fn sequential(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rows.iter().map(|r| (r.bytes as f64, r.sequential_ns))
    }
}

fn parse_row(record: &StringRecord, line: u64) -> Result<Measurement, Error> {
    if record.len() < COLUMNS.len() {
        return Err(Error::DataFormat {
            line,
            column: COLUMNS[record.len()],
            reason: format!(
                "expected {} columns, found {}",
                COLUMNS.len(),
                record.len()
            ),
        });
    }

    let bytes: u64 = record[0].parse().map_err(|_| Error::DataFormat {
        line,
        column: COLUMNS[0],
        reason: format!("'{}' is not a byte count", &record[0]),
    })?;
    if bytes == 0 {
        return Err(Error::DataFormat {
            line,
            column: COLUMNS[0],
            reason: "byte size must be greater than zero".to_string(),
        });
    }

    Ok(Measurement {
        bytes,
        random_ns: parse_latency(record, 1, line)?,
        sequential_ns: parse_latency(record, 2, line)?,
    })
}

fn parse_latency(record: &StringRecord, index: usize, line: u64) -> Result<f64, Error> {
    let field = &record[index];
    let value: f64 = field.parse().map_err(|_| Error::DataFormat {
        line,
        column: COLUMNS[index],
        reason: format!("'{}' is not a number", field),
    })?;

    // log scale needs strictly positive values
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::DataFormat {
            line,
            column: COLUMNS[index],
            reason: format!("latency must be positive, got '{}'", field),
        });
    }

    Ok(value)
}
