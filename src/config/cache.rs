// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::thresholds::{KIB, MIB};

use serde_derive::*;

/// Cache capacities in bytes, as reported by `lscpu`. L1d and L2 are the
/// per-core sizes since the benchmark is single threaded.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cache {
    #[serde(default = "default_l1")]
    l1: u64,
    #[serde(default = "default_l2")]
    l2: u64,
    #[serde(default = "default_l3")]
    l3: u64,
}

impl Default for Cache {
    fn default() -> Cache {
        Cache {
            l1: default_l1(),
            l2: default_l2(),
            l3: default_l3(),
        }
    }
}

impl Cache {
    pub fn l1(&self) -> u64 {
        self.l1
    }

    pub fn set_l1(&mut self, bytes: u64) {
        self.l1 = bytes;
    }

    pub fn l2(&self) -> u64 {
        self.l2
    }

    pub fn set_l2(&mut self, bytes: u64) {
        self.l2 = bytes;
    }

    pub fn l3(&self) -> u64 {
        self.l3
    }

    pub fn set_l3(&mut self, bytes: u64) {
        self.l3 = bytes;
    }
}

/// Inputs to the page-table eviction threshold. The L3 size comes from
/// [`Cache`].
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Eviction {
    #[serde(default = "default_page_size")]
    page_size: u64,
    #[serde(default = "default_address_size")]
    address_size: u64,
}

impl Default for Eviction {
    fn default() -> Eviction {
        Eviction {
            page_size: default_page_size(),
            address_size: default_address_size(),
        }
    }
}

impl Eviction {
    /// see `getconf PAGE_SIZE`
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn set_page_size(&mut self, bytes: u64) {
        self.page_size = bytes;
    }

    pub fn address_size(&self) -> u64 {
        self.address_size
    }

    pub fn set_address_size(&mut self, bytes: u64) {
        self.address_size = bytes;
    }
}

fn default_l1() -> u64 {
    32 * KIB
}

fn default_l2() -> u64 {
    256 * KIB
}

fn default_l3() -> u64 {
    6 * MIB
}

fn default_page_size() -> u64 {
    4096
}

// 64-bit addresses
fn default_address_size() -> u64 {
    8
}
