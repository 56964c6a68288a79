// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::plot::{DEFAULT_TITLE, DEFAULT_X_DESC, DEFAULT_Y_DESC};

use serde_derive::*;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_x_label")]
    x_label: String,
    #[serde(default = "default_y_label")]
    y_label: String,
    #[serde(default = "default_width")]
    width_in: f64,
    #[serde(default = "default_height")]
    height_in: f64,
    #[serde(default = "default_dpi")]
    dpi: u32,
}

impl Default for Plot {
    fn default() -> Plot {
        Plot {
            output: default_output(),
            title: default_title(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            width_in: default_width(),
            height_in: default_height(),
            dpi: default_dpi(),
        }
    }
}

impl Plot {
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn set_output(&mut self, output: String) {
        self.output = output;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// figure width in inches
    pub fn width(&self) -> f64 {
        self.width_in
    }

    /// figure height in inches
    pub fn height(&self) -> f64 {
        self.height_in
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

fn default_output() -> String {
    "memory_latency_plot.png".to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_x_label() -> String {
    DEFAULT_X_DESC.to_string()
}

fn default_y_label() -> String {
    DEFAULT_Y_DESC.to_string()
}

fn default_width() -> f64 {
    10.0
}

fn default_height() -> f64 {
    6.0
}

fn default_dpi() -> u32 {
    300
}
