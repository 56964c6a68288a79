// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Backend independent description of the latency plot. Everything that ends
//! up in the image is decided here, the renderer only draws it.

use plotters::style::RGBColor;

use std::ops::Range;

// axis padding in log space, applied on both ends
const PADDING: f64 = 1.5;

/// A connected line through measured points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    label: String,
    colour: RGBColor,
    points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(
        label: impl AsRef<str>,
        colour: RGBColor,
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Self {
            label: label.as_ref().to_owned(),
            colour,
            points: points.into_iter().collect(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn colour(&self) -> RGBColor {
        self.colour
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// A vertical reference line spanning the full height of the plot.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    label: String,
    x: f64,
    colour: RGBColor,
}

impl Marker {
    pub fn new(label: impl AsRef<str>, x: f64, colour: RGBColor) -> Self {
        Self {
            label: label.as_ref().to_owned(),
            x,
            colour,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn colour(&self) -> RGBColor {
        self.colour
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    title: String,
    x_desc: String,
    y_desc: String,
    series: Vec<Series>,
    markers: Vec<Marker>,
}

impl Figure {
    pub fn new(title: impl AsRef<str>, x_desc: impl AsRef<str>, y_desc: impl AsRef<str>) -> Self {
        Self {
            title: title.as_ref().to_owned(),
            x_desc: x_desc.as_ref().to_owned(),
            y_desc: y_desc.as_ref().to_owned(),
            series: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn push_series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    pub fn push_marker(&mut self, marker: Marker) -> &mut Self {
        self.markers.push(marker);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x_desc(&self) -> &str {
        &self.x_desc
    }

    pub fn y_desc(&self) -> &str {
        &self.y_desc
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Horizontal extent covering every point and every marker.
    pub fn x_range(&self) -> Range<f64> {
        let values = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .chain(self.markers.iter().map(|m| m.x));
        padded(values)
    }

    /// Vertical extent covering every point.
    pub fn y_range(&self) -> Range<f64> {
        let values = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1));
        padded(values)
    }
}

fn padded(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    if min > max {
        // nothing plottable, fall back to a single decade
        return 1.0..10.0;
    }

    (min / PADDING)..(max * PADDING)
}
