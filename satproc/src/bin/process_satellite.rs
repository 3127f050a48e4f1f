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

use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use tracing_subscriber::EnvFilter;
use satproc_common::config::load_config_or_default;
use satproc::{ProcessConfig, process_image, resolve_image_path};

const USAGE: &str = "Usage: process_satellite <image_path> <index_type> <shp_geojson_path>";

#[derive(Parser, Debug)]
#[command(version, about, long_about = "clip a satellite image to a GeoJSON boundary, compute a spectral index (ndvi, ndbi, ndwi) and write GeoTIFF + PNG preview")]
pub struct Args {
    /// RON file with band order and download settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// where to store images that are given as http(s) URL
    #[arg(long, default_value = ".")]
    pub download_dir: PathBuf,

    /// path or http(s) URL of the multi-band (blue, green, red, nir) input raster
    pub image_path: String,

    /// ndvi, ndbi or ndwi
    pub index_type: String,

    /// GeoJSON file with the clip boundary (Feature or bare geometry)
    pub shp_geojson_path: PathBuf,
}

fn main()->Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!( e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer( std::io::stderr)
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("warn")))
        .init();

    let config: ProcessConfig = load_config_or_default( args.config.as_ref())?;
    let image_path = resolve_image_path( &args.image_path, &args.download_dir, &config)?;
    let paths = process_image( &image_path, args.index_type.trim(), &args.shp_geojson_path, &config)?;

    for line in paths.report_lines() {
        println!("{line}");
    }
    Ok(())
}
