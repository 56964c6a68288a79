// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::colour;
use crate::figure::{Figure, Marker, Series};
use crate::image::{self, ImageSettings};
use crate::table::MeasurementTable;
use crate::thresholds::{CacheThresholds, PageEvictionThreshold};
use crate::Error;

use logger::*;
use plotters::prelude::*;
use plotters::style::register_font;

use std::path::Path;

// every text element is looked up under this family, backed by the bundled
// DejaVu face so rendering never depends on fonts installed on the host
const FONT: &str = "sans-serif";

pub const DEFAULT_TITLE: &str = "Latency as a function of array size on Intel Core i5-6600";
pub const DEFAULT_X_DESC: &str = "Bytes allocated (log scale)";
pub const DEFAULT_Y_DESC: &str = "Latency (ns)";

/// Plots random and sequential access latency against allocation size on
/// log-log axes, with a vertical line at each cache boundary.
#[derive(Clone, Debug)]
pub struct LatencyPlotter {
    caption: String,
    x_desc: String,
    y_desc: String,
    image: ImageSettings,
    thresholds: CacheThresholds,
    eviction: Option<PageEvictionThreshold>,
}

impl Default for LatencyPlotter {
    fn default() -> Self {
        Self::new(CacheThresholds::default())
    }
}

impl LatencyPlotter {
    pub fn new(thresholds: CacheThresholds) -> Self {
        Self {
            caption: DEFAULT_TITLE.to_owned(),
            x_desc: DEFAULT_X_DESC.to_owned(),
            y_desc: DEFAULT_Y_DESC.to_owned(),
            image: ImageSettings::default(),
            thresholds,
            eviction: None,
        }
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn image(&mut self, image: ImageSettings) -> &mut Self {
        self.image = image;
        self
    }

    /// Draw an extra reference line at the page-table eviction threshold.
    pub fn eviction(&mut self, eviction: Option<PageEvictionThreshold>) -> &mut Self {
        self.eviction = eviction;
        self
    }

    /// Lay out the series and reference lines for `table`.
    pub fn figure(&self, table: &MeasurementTable) -> Figure {
        let mut figure = Figure::new(&self.caption, &self.x_desc, &self.y_desc);

        figure
            .push_series(Series::new("Random access", colour::RANDOM, table.random()))
            .push_series(Series::new(
                "Sequential access",
                colour::SEQUENTIAL,
                table.sequential(),
            ));

        for level in self.thresholds.levels() {
            figure.push_marker(Marker::new(
                level.label(),
                level.size() as f64,
                level.colour(),
            ));
        }

        if let Some(eviction) = self.eviction {
            figure.push_marker(Marker::new(
                eviction.label(),
                eviction.bytes(),
                eviction.colour(),
            ));
        }

        figure
    }

    /// Render `table` and return the encoded PNG.
    pub fn render(&self, table: &MeasurementTable) -> Result<Vec<u8>, Error> {
        let figure = self.figure(table);
        let (width, height) = self.image.pixels();

        register_font(FONT, FontStyle::Normal, font())
            .map_err(|_| Error::Font("bundled DejaVu face is invalid".to_string()))?;

        let size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| Error::Render(format!("{}x{} image is too large", width, height)))?;
        let mut buffer = vec![0u8; size];
        draw(&figure, &self.image, &mut buffer).map_err(|e| Error::Render(e.to_string()))?;

        image::encode(&buffer, &self.image)
    }

    /// Render `table` and write it to `path`, replacing any existing file.
    pub fn plot<P: AsRef<Path>>(&self, table: &MeasurementTable, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let data = self.render(table)?;
        image::persist(path, &data)?;
        info!("wrote {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}

// proportional DejaVu Sans, matching the family name it is registered under
fn font() -> &'static [u8] {
    dejavu::sans::regular()
}

fn draw(
    figure: &Figure,
    settings: &ImageSettings,
    buffer: &mut [u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(buffer, settings.pixels()).into_drawing_area();
    root.fill(&WHITE)?;

    let pt = |size: f64| settings.points(size);
    let stroke = pt(1.5).round().max(1.0) as u32;
    let legend_len = pt(20.0).round() as i32;

    let x_range = figure.x_range();
    let y_range = figure.y_range();
    debug!("x axis: {:?} y axis: {:?}", x_range, y_range);

    let mut chart = ChartBuilder::on(&root)
        .caption(figure.title(), (FONT, pt(12.0)))
        .margin(pt(10.0) as u32)
        .set_label_area_size(LabelAreaPosition::Left, pt(48.0) as u32)
        .set_label_area_size(LabelAreaPosition::Bottom, pt(36.0) as u32)
        .build_cartesian_2d(x_range.clone().log_scale(), y_range.clone().log_scale())?;

    chart
        .configure_mesh()
        .x_desc(figure.x_desc())
        .y_desc(figure.y_desc())
        .x_label_formatter(&|x| format!("{:e}", x))
        .y_label_formatter(&|y| format!("{}", y))
        .label_style((FONT, pt(9.0)))
        .axis_desc_style((FONT, pt(10.0)))
        .light_line_style(&BLACK.mix(0.04))
        .bold_line_style(&BLACK.mix(0.15))
        .draw()?;

    for series in figure.series() {
        let colour = series.colour();
        chart
            .draw_series(LineSeries::new(
                series.points().iter().copied(),
                colour.stroke_width(stroke),
            ))?
            .label(series.label())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_len, y)], colour.stroke_width(stroke))
            });
    }

    for marker in figure.markers() {
        let colour = marker.colour();
        let position = marker.x();
        debug!("reference line '{}' at x = {}", marker.label(), position);
        chart
            .draw_series(LineSeries::new(
                vec![(position, y_range.start), (position, y_range.end)],
                colour.stroke_width(stroke),
            ))?
            .label(marker.label())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_len, y)], colour.stroke_width(stroke))
            });
    }

    chart
        .configure_series_labels()
        .label_font((FONT, pt(9.0)))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;

    Ok(())
}
