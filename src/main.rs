// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cachegraph::config::VERSION;
use cachegraph::Config;
use logger::*;

pub fn main() {
    let config = Config::new();

    Logger::new()
        .label("cachegraph")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    info!("cachegraph {} initializing...", VERSION);

    config.print();

    if let Err(e) = cachegraph::run(&config) {
        fatal!("{}", e);
    }
}
