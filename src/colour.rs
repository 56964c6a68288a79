// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::style::RGBColor;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

pub const RANDOM: RGBColor = hexcolour!(0x1F77B4);
pub const SEQUENTIAL: RGBColor = hexcolour!(0xFF7F0E);

pub const L1: RGBColor = hexcolour!(0xFF0000);
pub const L2: RGBColor = hexcolour!(0x008000);
pub const L3: RGBColor = hexcolour!(0xA52A2A);
pub const EVICTION: RGBColor = hexcolour!(0x9467BD);
