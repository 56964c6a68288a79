// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use cachegraph::*;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const MEASUREMENTS: &str = "\
size,random,sequential
128,1.39,1.386719
1024,1.41,1.390625
8192,1.45,1.397583
65536,3.92,1.431412
524288,6.13,1.502314
4194304,11.87,1.598755
33554432,71.35,1.704823
268435456,98.52,1.732115
";

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// config rendering a small image to keep the tests quick
    fn config(&self, input: &Path, extra: &[&str]) -> Config {
        let toml = self.file("cachegraph.toml", "[plot]\nwidth_in = 4.0\nheight_in = 3.0\ndpi = 80\n");
        let mut args = vec![
            "cachegraph".to_string(),
            input.display().to_string(),
            "--config".to_string(),
            toml.display().to_string(),
            "--output".to_string(),
            self.path("plot.png").display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Config::from_args(args).unwrap()
    }
}

fn dimensions(data: &[u8]) -> (u32, u32, Option<png::PixelDimensions>) {
    let reader = png::Decoder::new(data).read_info().unwrap();
    let info = reader.info();
    (info.width, info.height, info.pixel_dims)
}

#[test]
fn writes_a_300_dpi_image_by_default() {
    let workspace = Workspace::new();
    let input = workspace.file("lscpu.csv", MEASUREMENTS);
    let output = workspace.path("memory_latency_plot.png");

    let config = Config::from_args(vec![
        "cachegraph",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();
    run(&config).unwrap();

    let data = fs::read(&output).unwrap();
    let (width, height, dims) = dimensions(&data);
    assert_eq!((width, height), (3000, 1800));
    let dims = dims.unwrap();
    assert_eq!((dims.xppu, dims.yppu), (11811, 11811));
    assert_eq!(dims.unit, png::Unit::Meter);
}

#[test]
fn rerun_is_byte_stable() {
    let workspace = Workspace::new();
    let input = workspace.file("lscpu.csv", MEASUREMENTS);
    let config = workspace.config(&input, &["--page-size", "4096"]);

    run(&config).unwrap();
    let first = fs::read(config.output()).unwrap();
    run(&config).unwrap();
    let second = fs::read(config.output()).unwrap();

    assert_eq!(first, second);
    assert_eq!(dimensions(&first).0, 320);
}

#[test]
fn overwrites_existing_output() {
    let workspace = Workspace::new();
    let input = workspace.file("lscpu.csv", MEASUREMENTS);
    let config = workspace.config(&input, &[]);
    fs::write(config.output(), b"not a png").unwrap();

    run(&config).unwrap();

    let data = fs::read(config.output()).unwrap();
    assert_eq!(&data[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(
        workspace.entries(),
        vec!["cachegraph.toml", "lscpu.csv", "plot.png"]
    );
}

#[test]
fn non_numeric_cell_writes_nothing() {
    let workspace = Workspace::new();
    let input = workspace.file(
        "lscpu.csv",
        "size,random,sequential\n128,1.39,1.38\n1024,n/a,1.39\n",
    );
    let config = workspace.config(&input, &[]);

    match run(&config) {
        Err(Error::DataFormat { line, column, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(column, "random_latency_ns");
        }
        other => panic!("expected data format error, got {:?}", other),
    }

    assert!(!config.output().exists());
    assert_eq!(workspace.entries(), vec!["cachegraph.toml", "lscpu.csv"]);
}

#[test]
fn missing_input_is_not_found() {
    let workspace = Workspace::new();
    let config = workspace.config(&workspace.path("absent.csv"), &[]);

    match run(&config) {
        Err(Error::Open { source, .. }) => assert_eq!(source.kind(), ErrorKind::NotFound),
        other => panic!("expected open error, got {:?}", other),
    }
    assert!(!config.output().exists());
}

#[test]
fn headerless_input() {
    let workspace = Workspace::new();
    let rows: String = MEASUREMENTS.lines().skip(1).map(|l| format!("{}\n", l)).collect();
    let input = workspace.file("lscpu.csv", &rows);

    // the first data row would be swallowed as a header
    let config = workspace.config(&input, &[]);
    let table = MeasurementTable::load(config.input(), config.table_options().unwrap()).unwrap();
    assert_eq!(table.len(), 7);

    let config = workspace.config(&input, &["--no-header"]);
    let table = MeasurementTable::load(config.input(), config.table_options().unwrap()).unwrap();
    assert_eq!(table.len(), 8);
    assert_eq!(table.rows()[0].bytes, 128);

    run(&config).unwrap();
    assert!(config.output().exists());
}

#[test]
fn reference_lines() {
    let workspace = Workspace::new();
    let input = workspace.file("lscpu.csv", MEASUREMENTS);

    let config = workspace.config(&input, &[]);
    let table = MeasurementTable::load(config.input(), config.table_options().unwrap()).unwrap();
    let figure = config.plotter().unwrap().figure(&table);
    assert_eq!(figure.markers().len(), 3);
    for series in figure.series() {
        assert_eq!(series.points().len(), 8);
        let xs: Vec<f64> = series.points().iter().map(|p| p.0).collect();
        let expected: Vec<f64> = table.rows().iter().map(|r| r.bytes as f64).collect();
        assert_eq!(xs, expected);
    }

    let config = workspace.config(&input, &["--page-size", "4096", "--address-size", "8"]);
    let figure = config.plotter().unwrap().figure(&table);
    let xs: Vec<f64> = figure.markers().iter().map(|m| m.x()).collect();
    assert_eq!(
        xs,
        vec![
            (32 * KIB) as f64,
            (256 * KIB) as f64,
            (6 * MIB) as f64,
            0.5 * (4096.0 / 8.0) * (6 * MIB) as f64,
        ]
    );
    assert_eq!(figure.markers()[3].label(), "Page-table eviction (1.5 GiB)");
}

#[test]
fn invalid_cache_size_writes_nothing() {
    let workspace = Workspace::new();
    let input = workspace.file("lscpu.csv", MEASUREMENTS);
    let config = workspace.config(&input, &["--l3", "0"]);

    assert!(matches!(run(&config), Err(Error::Config(_))));
    assert!(!config.output().exists());
}
