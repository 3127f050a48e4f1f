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
use satproc_gdal::SatGdalError;

pub type Result<T> = std::result::Result<T, SatProcError>;

define_error!{ pub SatProcError = 
    GdalError(#[from] SatGdalError) : "{0}",
    CommonError(#[from] SatCommonError) : "{0}",
    ImageError(#[from] image::ImageError) : "image error: {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    InvalidIndex(String) : "invalid index: {0}",
    InvalidBandOrder(String) : "invalid band order: {0}",
    InsufficientBands(usize) : "need at least 4 bands (blue, green, red, nir), got {0}"
}
