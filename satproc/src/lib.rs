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

//! satellite spectral index processing: clip a multi-band raster to a GeoJSON boundary, compute
//! NDVI, NDBI or NDWI and write the result as float32 GeoTIFF plus a jet colorized PNG preview

pub mod errors;
pub mod config;
pub mod index;
pub mod preview;
pub mod pipeline;

pub use errors::{Result, SatProcError};
pub use config::{BandOrder, ProcessConfig};
pub use index::{EPSILON, IndexType, calculate_index, normalized_difference};
pub use preview::{ColorMapper, JetColorMap, colorize, normalize_min_max, write_preview_png};
pub use pipeline::{OutputPaths, output_paths, process_image, resolve_image_path, resolve_image_path_with};
