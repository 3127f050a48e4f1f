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

//! the fetch -> clip -> compute -> write pipeline

use std::path::Path;
use reqwest::blocking::Client;
use tracing::info;
use satproc_common::{fs::ensure_writable_dir, net::{download_image_to_dir, is_url}};
use satproc_gdal::{BoundaryGeometry, GdalRaster, RasterSource, clip_to_geometry, write_index_geotiff};

use crate::config::ProcessConfig;
use crate::errors::Result;
use crate::index::{IndexType, calculate_index};
use crate::preview::{JetColorMap, write_preview_png};

const TIF_SUFFIX: &str = ".tif";

/// the artifacts of a processing run
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct OutputPaths {
    pub geotiff: String,
    pub preview: String,
}

impl OutputPaths {
    /// the machine readable result lines we report on stdout
    pub fn report_lines (&self) -> [String;2] {
        [ format!("geotiff:{}", self.geotiff), format!("preview:{}", self.preview) ]
    }
}

/// derive output paths by replacing ".tif" in the image path with "_<label>.tif" and "_<label>_preview.png".
/// If there is no ".tif" the suffixes are appended so that we never overwrite the input
pub fn output_paths (image_path: &str, index_label: &str) -> OutputPaths {
    let geotiff_suffix = format!("_{index_label}.tif");
    let preview_suffix = format!("_{index_label}_preview.png");

    if image_path.contains( TIF_SUFFIX) {
        OutputPaths {
            geotiff: image_path.replace( TIF_SUFFIX, &geotiff_suffix),
            preview: image_path.replace( TIF_SUFFIX, &preview_suffix),
        }
    } else {
        OutputPaths {
            geotiff: format!("{image_path}{geotiff_suffix}"),
            preview: format!("{image_path}{preview_suffix}"),
        }
    }
}

/// if the image argument is a http(s) URL fetch it into `download_dir` and return the local path,
/// otherwise return the argument unchanged
pub fn resolve_image_path (image_arg: &str, download_dir: &Path, config: &ProcessConfig) -> Result<String> {
    resolve_image_path_with( &Client::new(), image_arg, download_dir, config)
}

/// [`resolve_image_path`] with an explicit HTTP client
pub fn resolve_image_path_with (client: &Client, image_arg: &str, download_dir: &Path, config: &ProcessConfig) -> Result<String> {
    if is_url( image_arg) {
        ensure_writable_dir( download_dir)?;
        let path = download_image_to_dir( client, image_arg.trim(), download_dir, config.download_chunk_size)?;
        Ok( path.to_string_lossy().to_string() )
    } else {
        Ok( image_arg.to_string() )
    }
}

/// clip the raster at `image_path` to the boundary in `geojson_path`, compute the index named by `index_label`
/// and write it as GeoTIFF and PNG preview next to the input image
pub fn process_image<P: AsRef<Path>> (image_path: &str, index_label: &str, geojson_path: P, config: &ProcessConfig) -> Result<OutputPaths> {
    let index_type = IndexType::parse( index_label)?;
    let boundary = BoundaryGeometry::open( geojson_path)?;

    let clipped = {
        let raster = GdalRaster::open( image_path)?;
        config.band_order.validate( raster.band_count())?;
        clip_to_geometry( &raster, &boundary)?
    };
    info!("clipped {image_path} to {}x{} pixels", clipped.width(), clipped.height());

    let index = calculate_index( clipped.data.view(), &config.band_order, index_type)?;

    let paths = output_paths( image_path, index_label);
    write_index_geotiff( &paths.geotiff, &clipped.output_profile(), &index)?;
    write_preview_png( &index, &JetColorMap::new(), &paths.preview)?;
    info!("{index_type} written to {} and {}", paths.geotiff, paths.preview);

    Ok(paths)
}
