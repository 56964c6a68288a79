// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod cache;
mod general;
mod plot;

pub use self::cache::{Cache, Eviction};
pub use self::general::{General, Input};
pub use self::plot::Plot;

use crate::image::ImageSettings;
use crate::plot::LatencyPlotter;
use crate::table::TableOptions;
use crate::thresholds::{self, CacheThresholds, PageEvictionThreshold};
use crate::Error;

use clap::{App, Arg, ArgMatches};
use logger::*;
use serde_derive::*;

use std::ffi::OsString;
use std::path::Path;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    input: Input,
    #[serde(default)]
    cache: Cache,
    eviction: Option<Eviction>,
    #[serde(default)]
    plot: Plot,
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Config {
        let matches = app().get_matches();
        Self::from_matches(&matches).unwrap_or_else(|e| {
            println!("ERROR: {}", e);
            process::exit(1);
        })
    }

    /// parse an explicit argument list, the first item is the program name
    pub fn from_args<I, T>(args: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app()
            .get_matches_from_safe(args)
            .map_err(|e| Error::Config(e.message))?;
        Self::from_matches(&matches)
    }

    pub fn load_from_file<P: AsRef<Path>>(file: P) -> Result<Config, Error> {
        let file = file.as_ref();
        let content = std::fs::read_to_string(file).map_err(|source| Error::Open {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", file.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Config, Error> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(file)?
        } else {
            Default::default()
        };

        if let Some(input) = matches.value_of("INPUT") {
            config.input.set_path(input.to_string());
        }

        if matches.is_present("no-header") {
            config.input.set_header(false);
        }

        if let Some(delimiter) = matches.value_of("delimiter") {
            let mut chars = delimiter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.input.set_delimiter(c),
                _ => {
                    return Err(Error::Config(format!(
                        "delimiter must be a single character, got '{}'",
                        delimiter
                    )));
                }
            }
        }

        if let Some(output) = matches.value_of("output") {
            config.plot.set_output(output.to_string());
        }

        if let Some(title) = matches.value_of("title") {
            config.plot.set_title(title.to_string());
        }

        if let Some(l1) = parse_size_arg(matches, "l1")? {
            config.cache.set_l1(l1);
        }

        if let Some(l2) = parse_size_arg(matches, "l2")? {
            config.cache.set_l2(l2);
        }

        if let Some(l3) = parse_size_arg(matches, "l3")? {
            config.cache.set_l3(l3);
        }

        let page_size = parse_size_arg(matches, "page-size")?;
        let address_size = parse_size_arg(matches, "address-size")?;
        if page_size.is_some() || address_size.is_some() {
            let eviction = config.eviction.get_or_insert_with(Default::default);
            if let Some(page_size) = page_size {
                eviction.set_page_size(page_size);
            }
            if let Some(address_size) = address_size {
                eviction.set_address_size(address_size);
            }
        }

        if matches.is_present("show") {
            config.general.set_show(true);
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.set_logging(Level::Debug),
            _ => config.general.set_logging(Level::Trace),
        }

        Ok(config)
    }

    /// get logging level
    pub fn logging(&self) -> Level {
        self.general.logging()
    }

    /// whether to open the image in a viewer once written
    pub fn show(&self) -> bool {
        self.general.show()
    }

    pub fn input(&self) -> &Path {
        Path::new(self.input.path())
    }

    pub fn output(&self) -> &Path {
        Path::new(self.plot.output())
    }

    pub fn table_options(&self) -> Result<TableOptions, Error> {
        let delimiter = self.input.delimiter();
        if !delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter must be an ASCII character, got '{}'",
                delimiter
            )));
        }
        Ok(TableOptions::new()
            .header(self.input.header())
            .delimiter(delimiter as u8))
    }

    pub fn thresholds(&self) -> Result<CacheThresholds, Error> {
        CacheThresholds::new(self.cache.l1(), self.cache.l2(), self.cache.l3())
    }

    /// `None` unless eviction inputs were configured
    pub fn eviction(&self) -> Result<Option<PageEvictionThreshold>, Error> {
        match &self.eviction {
            Some(eviction) => PageEvictionThreshold::new(
                eviction.page_size(),
                eviction.address_size(),
                self.cache.l3(),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    pub fn image(&self) -> Result<ImageSettings, Error> {
        ImageSettings::new(self.plot.width(), self.plot.height(), self.plot.dpi())
    }

    /// Validate everything that affects rendering and build the plotter.
    pub fn plotter(&self) -> Result<LatencyPlotter, Error> {
        let mut plotter = LatencyPlotter::new(self.thresholds()?);
        plotter
            .caption(self.plot.title())
            .x_desc(self.plot.x_label())
            .y_desc(self.plot.y_label())
            .image(self.image()?)
            .eviction(self.eviction()?);
        Ok(plotter)
    }

    pub fn print(&self) {
        info!("-----");
        info!(
            "Config: Input: {} Header: {} Delimiter: '{}'",
            self.input().display(),
            self.input.header(),
            self.input.delimiter()
        );
        info!(
            "Config: Cache: L1d: {} L2: {} L3: {}",
            thresholds::format_bytes(self.cache.l1() as f64),
            thresholds::format_bytes(self.cache.l2() as f64),
            thresholds::format_bytes(self.cache.l3() as f64),
        );
        match &self.eviction {
            Some(eviction) => {
                info!(
                    "Config: Eviction: Page Size: {} Address Size: {}",
                    eviction.page_size(),
                    eviction.address_size()
                );
            }
            None => {
                info!("Config: Eviction: Disabled");
            }
        }
        info!(
            "Config: Output: {} Size: {}x{} in @ {} dpi",
            self.output().display(),
            self.plot.width(),
            self.plot.height(),
            self.plot.dpi()
        );
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new(NAME)
        .version(VERSION)
        .about("Plots memory access latency against cache size thresholds")
        .arg(
            Arg::with_name("INPUT")
                .help("CSV of byte size, random and sequential latency in ns")
                .index(1),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Path of the PNG to write")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("title")
                .long("title")
                .value_name("TEXT")
                .help("Plot title")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("l1")
                .long("l1")
                .value_name("BYTES")
                .help("L1d cache size per core, eg: 32K")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("l2")
                .long("l2")
                .value_name("BYTES")
                .help("L2 cache size per core, eg: 256K")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("l3")
                .long("l3")
                .value_name("BYTES")
                .help("Shared L3 cache size, eg: 6M")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("page-size")
                .long("page-size")
                .value_name("BYTES")
                .help("Page size, enables the page-table eviction line")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("address-size")
                .long("address-size")
                .value_name("BYTES")
                .help("Address size, enables the page-table eviction line")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("no-header")
                .long("no-header")
                .help("The first line of the input is data, not column names"),
        )
        .arg(
            Arg::with_name("delimiter")
                .long("delimiter")
                .value_name("CHAR")
                .help("Field delimiter of the input")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("show")
                .long("show")
                .help("Open the image in a viewer once written"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

/// a helper function to parse a byte size argument by name from `ArgMatches`
fn parse_size_arg(matches: &ArgMatches, key: &str) -> Result<Option<u64>, Error> {
    match matches.value_of(key) {
        Some(value) => thresholds::parse_bytes(value)
            .map(Some)
            .map_err(|e| Error::Config(format!("--{}: {}", key, e))),
        None => Ok(None),
    }
}
