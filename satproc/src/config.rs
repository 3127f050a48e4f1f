/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use serde::{Serialize,Deserialize};
use satproc_common::net::DOWNLOAD_CHUNK_SIZE;
use crate::errors::{Result, SatProcError};

/// 1-based raster band indices of the spectral bands we need
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq)]
pub struct BandOrder {
    pub blue: usize,
    pub green: usize,
    pub red: usize,
    pub nir: usize,
}

impl Default for BandOrder {
    fn default()->Self {
        BandOrder { blue: 1, green: 2, red: 3, nir: 4 }
    }
}

impl BandOrder {
    pub fn new (blue: usize, green: usize, red: usize, nir: usize)->Self {
        BandOrder { blue, green, red, nir }
    }

    pub fn indices (&self)->[usize;4] {
        [self.blue, self.green, self.red, self.nir]
    }

    /// all bands have to exist in a raster with `band_count` bands and have to be distinct
    pub fn validate (&self, band_count: usize)->Result<()> {
        if band_count < 4 { return Err( SatProcError::InsufficientBands(band_count)) }

        let indices = self.indices();
        for (i, idx) in indices.iter().enumerate() {
            if *idx < 1 || *idx > band_count {
                return Err( SatProcError::InvalidBandOrder( format!("band {idx} not in 1..={band_count}")))
            }
            if indices[..i].contains(idx) {
                return Err( SatProcError::InvalidBandOrder( format!("band {idx} used more than once")))
            }
        }
        Ok(())
    }
}

/// processing options that can be provided as RON file
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct ProcessConfig {
    pub band_order: BandOrder,
    pub download_chunk_size: usize,
}

impl Default for ProcessConfig {
    fn default()->Self {
        ProcessConfig { band_order: BandOrder::default(), download_chunk_size: DOWNLOAD_CHUNK_SIZE }
    }
}
