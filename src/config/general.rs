// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use logger::Level;
use serde_derive::*;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
    #[serde(default)]
    show: bool,
}

impl Default for General {
    fn default() -> General {
        General {
            logging: default_logging_level(),
            show: false,
        }
    }
}

impl General {
    pub fn logging(&self) -> Level {
        self.logging
    }

    pub fn set_logging(&mut self, level: Level) {
        self.logging = level;
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn set_show(&mut self, show: bool) {
        self.show = show;
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    #[serde(default = "default_input_path")]
    path: String,
    #[serde(default = "default_header")]
    header: bool,
    #[serde(default = "default_delimiter")]
    delimiter: char,
}

impl Default for Input {
    fn default() -> Input {
        Input {
            path: default_input_path(),
            header: default_header(),
            delimiter: default_delimiter(),
        }
    }
}

impl Input {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: String) {
        self.path = path;
    }

    pub fn header(&self) -> bool {
        self.header
    }

    pub fn set_header(&mut self, header: bool) {
        self.header = header;
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: char) {
        self.delimiter = delimiter;
    }
}

fn default_logging_level() -> Level {
    Level::Info
}

fn default_input_path() -> String {
    "lscpu.csv".to_string()
}

fn default_header() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
