// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prints one record per level. Pass a level name (error, warn, info, debug,
//! trace) to change the filter, and `fatal` to finish through `fatal!`.

use logger::*;

mod loader {
    use logger::*;

    pub fn load(rows: usize) {
        info!("loaded {} rows", rows);
        debug!("records carry the module path at debug and below");
        trace!("row 1: 128 bytes");
    }
}

pub fn main() {
    let mut args = std::env::args().skip(1);
    let level = args
        .next()
        .and_then(|name| name.parse::<Level>().ok())
        .unwrap_or(Level::Debug);

    Logger::new()
        .label("demo")
        .level(level)
        .init()
        .expect("Failed to initialize logger");

    loader::load(8);
    warn!("byte size does not increase");
    error!("failed to write output");

    if args.next().as_deref() == Some("fatal") {
        fatal!("exiting with status 1");
    }
}
