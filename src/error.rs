// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

use std::io;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to read measurements: {0}")]
    Read(#[from] csv::Error),
    #[error("malformed measurement at line {line}, column {column}: {reason}")]
    DataFormat {
        line: u64,
        column: &'static str,
        reason: String,
    },
    #[error("measurement table is empty")]
    EmptyTable,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to load font: {0}")]
    Font(String),
    #[error("failed to render plot: {0}")]
    Render(String),
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}
