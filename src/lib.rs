// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Plot memory access latency against allocation size on log-log axes, with
//! reference lines at the L1d, L2 and L3 cache capacities.
//!
//! The input is the CSV written by the latency benchmark: one row per array
//! size holding the size in bytes, the random access latency and the
//! sequential access latency, both in nanoseconds.

mod colour;
mod display;
mod error;
mod figure;
mod image;
mod plot;
mod table;
mod thresholds;

pub mod config;

pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::figure::{Figure, Marker, Series};
pub use crate::image::ImageSettings;
pub use crate::plot::LatencyPlotter;
pub use crate::table::{Measurement, MeasurementTable, TableOptions};
pub use crate::thresholds::{
    format_bytes, parse_bytes, CacheLevel, CacheThresholds, PageEvictionThreshold, GIB, KIB,
    MIB,
};

/// Load the configured table, render it and write the image. Configuration
/// and input are fully validated before the output path is touched.
pub fn run(config: &Config) -> Result<(), Error> {
    let plotter = config.plotter()?;
    let table = MeasurementTable::load(config.input(), config.table_options()?)?;

    plotter.plot(&table, config.output())?;

    if config.show() {
        display::show(config.output());
    }

    Ok(())
}
