// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use logger::*;
use png::{BitDepth, ColorType, Compression, Encoder, PixelDimensions, Unit};
use tempfile::NamedTempFile;

use std::io::Write;
use std::path::Path;

const INCHES_PER_METER: f64 = 1.0 / 0.0254;

// largest raster side in pixels, keeps the RGB buffer within a few GiB
const MAX_DIMENSION: u32 = 32_768;

/// Physical size and resolution of the output raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageSettings {
    width: f64,
    height: f64,
    dpi: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 6.0,
            dpi: 300,
        }
    }
}

impl ImageSettings {
    /// `width` and `height` are in inches
    pub fn new(width: f64, height: f64, dpi: u32) -> Result<Self, Error> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::Config(format!(
                "image size must be positive, got {}x{} inches",
                width, height
            )));
        }
        if dpi == 0 {
            return Err(Error::Config("dpi must be greater than zero".to_string()));
        }

        let w = (width * dpi as f64).round();
        let h = (height * dpi as f64).round();
        if w < 1.0 || h < 1.0 {
            return Err(Error::Config(format!(
                "image of {}x{} inches at {} dpi has no pixels",
                width, height, dpi
            )));
        }
        if w > MAX_DIMENSION as f64 || h > MAX_DIMENSION as f64 {
            return Err(Error::Config(format!(
                "image of {}x{} inches at {} dpi exceeds {} pixels per side",
                width, height, dpi, MAX_DIMENSION
            )));
        }
        Ok(Self { width, height, dpi })
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// raster size in pixels
    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width * self.dpi as f64).round() as u32,
            (self.height * self.dpi as f64).round() as u32,
        )
    }

    /// convert a typographic point size into pixels at this resolution
    pub fn points(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}

/// Encode a packed RGB8 buffer as PNG, recording the resolution in the pHYs
/// chunk. No time chunk is written so identical pixels give identical bytes.
pub fn encode(buffer: &[u8], settings: &ImageSettings) -> Result<Vec<u8>, Error> {
    let (width, height) = settings.pixels();
    let ppm = (settings.dpi as f64 * INCHES_PER_METER).round() as u32;

    let mut data = Vec::new();
    {
        let mut encoder = Encoder::new(&mut data, width, height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(Compression::Best);
        encoder.set_pixel_dims(Some(PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(buffer)?;
        writer.finish()?;
    }

    debug!(
        "encoded {}x{} png at {} dpi: {} bytes",
        width,
        height,
        settings.dpi,
        data.len()
    );
    Ok(data)
}

/// Replace `path` with `data`. The bytes land in a temporary file next to
/// the destination which is renamed into place, so the destination is either
/// untouched or complete.
pub fn persist(path: &Path, data: &[u8]) -> Result<(), Error> {
    let write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(data).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_error)?;
    }

    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ten_by_six_at_300_dpi() {
        let settings = ImageSettings::default();
        assert_eq!(settings.pixels(), (3000, 1800));
        assert_eq!(settings.dpi(), 300);
        assert_eq!(settings.points(72.0), 300.0);
    }

    #[test]
    fn invalid_settings() {
        assert!(ImageSettings::new(0.0, 6.0, 300).is_err());
        assert!(ImageSettings::new(10.0, -1.0, 300).is_err());
        assert!(ImageSettings::new(10.0, 6.0, 0).is_err());
        assert!(ImageSettings::new(0.001, 0.001, 1).is_err());
        assert!(matches!(
            ImageSettings::new(1e9, 1e9, 300),
            Err(Error::Config(_))
        ));
        assert!(ImageSettings::new(10.0, 6.0, u32::MAX).is_err());
        assert_eq!(
            ImageSettings::new(109.0, 6.0, 300).unwrap().pixels(),
            (32_700, 1800)
        );
    }

    #[test]
    fn encode_records_resolution() {
        let settings = ImageSettings::new(0.1, 0.05, 300).unwrap();
        let (w, h) = settings.pixels();
        let buffer = vec![255u8; (w * h * 3) as usize];
        let data = encode(&buffer, &settings).unwrap();

        let decoder = png::Decoder::new(data.as_slice());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (30, 15));
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.unit, Unit::Meter);
    }

    #[test]
    fn persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"stale").unwrap();

        persist(&path, b"fresh").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn persist_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(persist(&path, b"data"), Err(Error::Write { .. })));
        assert!(!path.exists());
    }
}
