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

//! normalized difference spectral indices

use std::{fmt, str::FromStr};
use ndarray::{Array2, ArrayView2, ArrayView3, Axis, Zip};

use crate::config::BandOrder;
use crate::errors::{Result, SatProcError};

/// guards the normalized difference against division by zero
pub const EPSILON: f64 = 1e-10;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum IndexType {
    /// vegetation: (nir - red) / (nir + red)
    Ndvi,
    /// built-up: (nir - green) / (nir + green)
    Ndbi,
    /// water: (green - nir) / (green + nir)
    Ndwi,
}

impl IndexType {
    pub const ALL: [IndexType;3] = [IndexType::Ndvi, IndexType::Ndbi, IndexType::Ndwi];

    /// parse the (case insensitive) index name
    pub fn parse (name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "ndvi" => Ok( IndexType::Ndvi ),
            "ndbi" => Ok( IndexType::Ndbi ),
            "ndwi" => Ok( IndexType::Ndwi ),
            _ => Err( SatProcError::InvalidIndex( name.to_string()) )
        }
    }

    pub fn name (&self) -> &'static str {
        match self {
            IndexType::Ndvi => "ndvi",
            IndexType::Ndbi => "ndbi",
            IndexType::Ndwi => "ndwi",
        }
    }
}

impl FromStr for IndexType {
    type Err = SatProcError;

    fn from_str (s: &str) -> Result<Self> {
        IndexType::parse( s)
    }
}

impl fmt::Display for IndexType {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.name())
    }
}

/// elementwise (a - b) / (a + b + EPSILON)
pub fn normalized_difference (a: ArrayView2<f64>, b: ArrayView2<f64>) -> Array2<f64> {
    Zip::from( &a).and( &b).map_collect( |&a, &b| (a - b) / (a + b + EPSILON))
}

/// compute the requested index from a (bands, rows, cols) array. The band order selects which
/// raster bands hold blue, green, red and near-infrared data. The result has the (rows, cols) shape of the input
pub fn calculate_index (bands: ArrayView3<f64>, order: &BandOrder, index: IndexType) -> Result<Array2<f64>> {
    order.validate( bands.dim().0)?;

    let band = |i: usize| bands.index_axis( Axis(0), i-1);
    let green = band( order.green);
    let red = band( order.red);
    let nir = band( order.nir);

    let result = match index {
        IndexType::Ndvi => normalized_difference( nir, red),
        IndexType::Ndbi => normalized_difference( nir, green),
        IndexType::Ndwi => normalized_difference( green, nir),
    };

    Ok(result)
}
