// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cache capacity boundaries and the derived page-table eviction threshold.

use crate::colour;
use crate::Error;

use plotters::style::RGBColor;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// A single cache level drawn as a vertical reference line.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheLevel {
    name: &'static str,
    size: u64,
    colour: RGBColor,
}

impl CacheLevel {
    pub fn name(&self) -> &str {
        self.name
    }

    /// capacity in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn colour(&self) -> RGBColor {
        self.colour
    }

    /// legend entry, eg: `L1d (32 KiB)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, format_bytes(self.size as f64))
    }
}

/// The L1d, L2 and L3 capacities of the machine the measurements came from.
/// Sizes are supplied by the caller, the host is never inspected.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheThresholds {
    levels: Vec<CacheLevel>,
}

impl Default for CacheThresholds {
    fn default() -> Self {
        // Intel Core i5-6600, per-core L1d and L2, shared L3
        Self::build(32 * KIB, 256 * KIB, 6 * MIB)
    }
}

impl CacheThresholds {
    pub fn new(l1: u64, l2: u64, l3: u64) -> Result<Self, Error> {
        let thresholds = Self::build(l1, l2, l3);

        for level in &thresholds.levels {
            if level.size == 0 {
                return Err(Error::Config(format!(
                    "{} cache size must be greater than zero",
                    level.name
                )));
            }
        }

        Ok(thresholds)
    }

    fn build(l1: u64, l2: u64, l3: u64) -> Self {
        let levels = vec![
            CacheLevel {
                name: "L1d",
                size: l1,
                colour: colour::L1,
            },
            CacheLevel {
                name: "L2",
                size: l2,
                colour: colour::L2,
            },
            CacheLevel {
                name: "L3",
                size: l3,
                colour: colour::L3,
            },
        ];

        Self { levels }
    }

    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    pub fn l3(&self) -> u64 {
        self.levels[2].size
    }
}

/// Working-set size beyond which the translation cache starts evicting
/// page-table entries: `0.5 * (page_size / address_size) * l3_size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageEvictionThreshold {
    page_size: u64,
    address_size: u64,
    l3_size: u64,
    bytes: f64,
}

impl PageEvictionThreshold {
    pub fn new(page_size: u64, address_size: u64, l3_size: u64) -> Result<Self, Error> {
        if page_size == 0 {
            return Err(Error::Config(
                "page size must be greater than zero".to_string(),
            ));
        }
        if address_size == 0 {
            return Err(Error::Config(
                "address size must be greater than zero".to_string(),
            ));
        }
        if l3_size == 0 {
            return Err(Error::Config(
                "L3 cache size must be greater than zero".to_string(),
            ));
        }

        let bytes = 0.5 * (page_size as f64 / address_size as f64) * l3_size as f64;

        Ok(Self {
            page_size,
            address_size,
            l3_size,
            bytes,
        })
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn address_size(&self) -> u64 {
        self.address_size
    }

    pub fn l3_size(&self) -> u64 {
        self.l3_size
    }

    pub fn bytes(&self) -> f64 {
        self.bytes
    }

    pub fn colour(&self) -> RGBColor {
        colour::EVICTION
    }

    pub fn label(&self) -> String {
        format!("Page-table eviction ({})", format_bytes(self.bytes))
    }
}

/// Render a byte count with a binary prefix. Whole values print without a
/// fraction, everything else with at most two decimals.
pub fn format_bytes(bytes: f64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if value.fract() == 0.0 {
        return format!("{} {}", value as u64, UNITS[unit]);
    }

    let fixed = format!("{:.2}", value);
    let fixed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", fixed, UNITS[unit])
}

/// Parse a byte count with an optional binary suffix: `32768`, `32K`,
/// `32KiB`, `6M`, `6MiB`, `1G`, `1GiB`.
pub fn parse_bytes(value: &str) -> Result<u64, Error> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| value.len());
    let (digits, suffix) = value.split_at(split);

    let multiplier = match suffix.trim() {
        "" | "B" => 1,
        "K" | "KiB" => KIB,
        "M" | "MiB" => MIB,
        "G" | "GiB" => GIB,
        other => {
            return Err(Error::Config(format!(
                "unknown size suffix '{}' in '{}'",
                other, value
            )))
        }
    };

    let count: u64 = digits
        .parse()
        .map_err(|_| Error::Config(format!("could not parse size '{}'", value)))?;

    count
        .checked_mul(multiplier)
        .ok_or_else(|| Error::Config(format!("size '{}' is too large", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels() {
        let thresholds = CacheThresholds::default();
        let sizes: Vec<u64> = thresholds.levels().iter().map(|l| l.size()).collect();
        assert_eq!(sizes, vec![32768, 262144, 6291456]);

        let labels: Vec<String> = thresholds.levels().iter().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["L1d (32 KiB)", "L2 (256 KiB)", "L3 (6 MiB)"]);
        assert_eq!(thresholds.l3(), 6 * MIB);
    }

    #[test]
    fn zero_size_rejected() {
        assert!(matches!(
            CacheThresholds::new(0, 256 * KIB, 6 * MIB),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CacheThresholds::new(32 * KIB, 256 * KIB, 0),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn eviction_threshold() {
        let threshold = PageEvictionThreshold::new(4096, 8, 6 * MIB).unwrap();
        assert_eq!(threshold.bytes(), 0.5 * (4096.0 / 8.0) * 6291456.0);
        assert_eq!(threshold.bytes(), 1_610_612_736.0);
        assert_eq!(threshold.label(), "Page-table eviction (1.5 GiB)");
    }

    #[test]
    fn eviction_threshold_uses_real_division() {
        // 4096 / 3 is not a whole number
        let threshold = PageEvictionThreshold::new(4096, 3, 1024).unwrap();
        assert_eq!(threshold.bytes(), 0.5 * (4096.0 / 3.0) * 1024.0);
    }

    #[test]
    fn eviction_threshold_rejects_zero() {
        assert!(PageEvictionThreshold::new(0, 8, MIB).is_err());
        assert!(PageEvictionThreshold::new(4096, 0, MIB).is_err());
        assert!(PageEvictionThreshold::new(4096, 8, 0).is_err());
    }

    #[test]
    fn binary_units() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1024.0), "1 KiB");
        assert_eq!(format_bytes(1536.0), "1.5 KiB");
        assert_eq!(format_bytes(10000.0), "9.77 KiB");
        assert_eq!(format_bytes((6 * MIB) as f64), "6 MiB");
        assert_eq!(format_bytes(1_610_612_736.0), "1.5 GiB");
    }

    #[test]
    fn parse_sizes() {
        assert_eq!(parse_bytes("32768").unwrap(), 32768);
        assert_eq!(parse_bytes("32K").unwrap(), 32 * KIB);
        assert_eq!(parse_bytes("256KiB").unwrap(), 256 * KIB);
        assert_eq!(parse_bytes("6 MiB").unwrap(), 6 * MIB);
        assert_eq!(parse_bytes("1G").unwrap(), GIB);
        assert!(parse_bytes("6 MB").is_err());
        assert!(parse_bytes("MiB").is_err());
        assert!(parse_bytes("-1").is_err());
    }
}
