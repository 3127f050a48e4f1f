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

use satproc_common::{define_error, SatCommonError};

pub type Result<T> = std::result::Result<T, SatGdalError>;

define_error!{ pub SatGdalError = 
    GdalError(#[from] gdal::errors::GdalError) : "GDAL error: {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    CommonError(#[from] SatCommonError) : "{0}",
    GeoJsonError(#[from] geojson::Error) : "GeoJSON error: {0}",
    ShapeError(#[from] ndarray::ShapeError) : "array shape error: {0}",
    UnsupportedGeometry(String) : "unsupported boundary geometry: {0}",
    NoOverlap(String) : "boundary does not overlap raster: {0}",
    MiscError(String) : "{0}"
}

pub fn misc_error<S: ToString> (msg: S)->SatGdalError {
    SatGdalError::MiscError(msg.to_string())
}
