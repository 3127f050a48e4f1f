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

use std::{io::{Read, Write}, net::TcpListener, path::{Path, PathBuf}, process::Command, thread::{self, JoinHandle}};
use image::ColorType;
use ndarray::Array3;
use reqwest::blocking::Client;
use satproc::{
    BandOrder, IndexType, ProcessConfig, SatProcError, calculate_index, output_paths, process_image, resolve_image_path, resolve_image_path_with
};
use satproc_common::SatCommonError;
use satproc_gdal::{GdalDataType, GdalRaster, RasterSource, SatGdalError, new_geotransform, write_raster_f32};

// run with "cargo test -p satproc --test test_pipeline -- --nocapture"

const FULL_EXTENT: &str = r#"{ "type": "Feature", "properties": {}, "geometry": { "type": "Polygon",
  "coordinates": [[[500000,4199000],[501000,4199000],[501000,4200000],[500000,4200000],[500000,4199000]]] } }"#;

const OUTSIDE: &str = r#"{ "type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]] }"#;

/// blue, green, red, nir
fn synthetic_bands ()->Array3<f64> {
    Array3::from_shape_fn( (4, 100, 100), |(b,r,c)| match b {
        0 => 100.0,
        1 => 200.0 + c as f64,
        2 => 300.0 + r as f64,
        _ => 1000.0 + (r + c) as f64,
    })
}

/// create a 100x100 4-band raster with 10m pixels and a full extent boundary file in `dir`
fn create_inputs (dir: &Path, boundary: &str) -> (String, PathBuf) {
    let image_path = dir.join("scene.tif");
    let gt = new_geotransform( 500000.0, 10.0, 0.0, 4200000.0, 0.0, -10.0);
    write_raster_f32( &image_path, &gt, "", None, synthetic_bands().view()).unwrap();

    let geojson_path = dir.join("aoi.geojson");
    std::fs::write( &geojson_path, boundary).unwrap();

    (image_path.to_string_lossy().to_string(), geojson_path)
}

/// a one-shot HTTP responder so that we can fetch images without network access
fn serve_once (status_line: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn( move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read( &mut buf).unwrap();
            if n == 0 { break }
            request.extend_from_slice( &buf[..n]);
        }

        let header = format!("HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n", body.len());
        stream.write_all( header.as_bytes()).unwrap();
        stream.write_all( &body).unwrap();
        stream.flush().unwrap();
    });

    (format!("http://127.0.0.1:{port}"), handle)
}

fn local_client ()->Client {
    Client::builder().no_proxy().build().unwrap()
}

#[test]
fn test_output_paths() {
    let p = output_paths( "/data/scene.tif", "ndvi");
    assert_eq!( p.geotiff, "/data/scene_ndvi.tif");
    assert_eq!( p.preview, "/data/scene_ndvi_preview.png");
    assert_eq!( p.report_lines(), ["geotiff:/data/scene_ndvi.tif".to_string(), "preview:/data/scene_ndvi_preview.png".to_string()]);

    let p = output_paths( "/data/scene.jp2", "ndwi");
    assert_eq!( p.geotiff, "/data/scene.jp2_ndwi.tif");
    assert_eq!( p.preview, "/data/scene.jp2_ndwi_preview.png");
}

#[test]
fn test_process_full_extent() {
    let dir = tempfile::tempdir().unwrap();
    let (image_path, geojson_path) = create_inputs( dir.path(), FULL_EXTENT);

    let paths = process_image( &image_path, "ndvi", &geojson_path, &ProcessConfig::default()).unwrap();
    assert_eq!( paths, output_paths( &image_path, "ndvi"));

    let raster = GdalRaster::open( &paths.geotiff).unwrap();
    let profile = raster.profile().unwrap();
    assert_eq!( (profile.band_count, profile.height, profile.width), (1, 100, 100));
    assert_eq!( profile.data_type, GdalDataType::Float32);
    assert_eq!( profile.nodata, Some(0.0));
    assert_eq!( profile.geo_transform, new_geotransform( 500000.0, 10.0, 0.0, 4200000.0, 0.0, -10.0));

    let expected = calculate_index( synthetic_bands().view(), &BandOrder::default(), IndexType::Ndvi).unwrap();
    let written = raster.read_band(1).unwrap();
    for (a,b) in written.iter().zip( expected.iter()) {
        assert!( (a - b).abs() < 1e-6);
    }

    let img = image::open( &paths.preview).unwrap();
    assert_eq!( img.color(), ColorType::Rgb8);
    assert_eq!( (img.width(), img.height()), (100, 100));
}

#[test]
fn test_process_invalid_index() {
    let dir = tempfile::tempdir().unwrap();
    let (image_path, geojson_path) = create_inputs( dir.path(), FULL_EXTENT);

    let res = process_image( &image_path, "foo", &geojson_path, &ProcessConfig::default());
    assert!( matches!( res, Err(SatProcError::InvalidIndex(_))));
    assert!( !Path::new( &output_paths( &image_path, "foo").geotiff).exists());
}

#[test]
fn test_process_no_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let (image_path, geojson_path) = create_inputs( dir.path(), OUTSIDE);

    let res = process_image( &image_path, "ndwi", &geojson_path, &ProcessConfig::default());
    assert!( matches!( res, Err(SatProcError::GdalError(SatGdalError::NoOverlap(_)))));
}

#[test]
fn test_process_missing_image() {
    let dir = tempfile::tempdir().unwrap();
    let (_, geojson_path) = create_inputs( dir.path(), FULL_EXTENT);
    let missing = dir.path().join("missing.tif").to_string_lossy().to_string();

    assert!( matches!( process_image( &missing, "ndvi", &geojson_path, &ProcessConfig::default()), Err(SatProcError::GdalError(_))));
}

#[test]
fn test_cli_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (image_path, geojson_path) = create_inputs( dir.path(), FULL_EXTENT);

    let output = Command::new( env!("CARGO_BIN_EXE_process_satellite"))
        .args( [image_path.as_str(), "ndvi", geojson_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!( output.status.success(), "stderr: {}", String::from_utf8_lossy( &output.stderr));

    let stdout = String::from_utf8( output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!( lines.len(), 2);
    assert!( lines[0].starts_with("geotiff:"));
    assert!( lines[1].starts_with("preview:"));
    assert!( Path::new( &lines[0]["geotiff:".len()..]).is_file());
    assert!( Path::new( &lines[1]["preview:".len()..]).is_file());
}

#[test]
fn test_cli_wrong_arg_count() {
    let output = Command::new( env!("CARGO_BIN_EXE_process_satellite"))
        .args( ["scene.tif", "ndvi"])
        .output()
        .unwrap();
    assert_eq!( output.status.code(), Some(1));
    assert!( output.stdout.is_empty());
    assert!( String::from_utf8_lossy( &output.stderr).contains("Usage: process_satellite"));

    let output = Command::new( env!("CARGO_BIN_EXE_process_satellite")).output().unwrap();
    assert_eq!( output.status.code(), Some(1));
}

#[test]
fn test_cli_band_order_config() {
    let dir = tempfile::tempdir().unwrap();
    let (image_path, geojson_path) = create_inputs( dir.path(), FULL_EXTENT);

    // a band order that does not fit a 4-band raster
    let config_path = dir.path().join("landsat.ron");
    std::fs::write( &config_path, "ProcessConfig( band_order: BandOrder( blue: 2, green: 3, red: 4, nir: 5 ) )").unwrap();

    let output = Command::new( env!("CARGO_BIN_EXE_process_satellite"))
        .args( ["--config", config_path.to_str().unwrap(), image_path.as_str(), "ndvi", geojson_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!( !output.status.success());
    assert!( output.stdout.is_empty());
}

#[test]
fn test_resolve_local_image_path() {
    let dir = tempfile::tempdir().unwrap();
    let resolved = resolve_image_path( "/data/scene.tif", dir.path(), &ProcessConfig::default()).unwrap();
    assert_eq!( resolved, "/data/scene.tif");
}

#[test]
fn test_resolve_image_url() {
    let src_dir = tempfile::tempdir().unwrap();
    let (image_path, geojson_path) = create_inputs( src_dir.path(), FULL_EXTENT);
    let body = std::fs::read( &image_path).unwrap();

    let (base_url, handle) = serve_once( "200 OK", body);
    let dir = tempfile::tempdir().unwrap();
    let download_dir = dir.path().join("downloads");

    let res = resolve_image_path_with( &local_client(), &format!("{base_url}/scenes/scene.tif"), &download_dir, &ProcessConfig::default());
    handle.join().unwrap();

    let resolved = res.unwrap();
    assert_eq!( resolved, download_dir.join("scene.tif").to_string_lossy());

    let raster = GdalRaster::open( &resolved).unwrap();
    assert_eq!( raster.band_count(), 4);
    assert_eq!( raster.raster_size(), (100, 100));

    let paths = process_image( &resolved, "ndvi", &geojson_path, &ProcessConfig::default()).unwrap();
    assert!( Path::new( &paths.geotiff).starts_with( &download_dir));
    assert!( Path::new( &paths.preview).is_file());
}

#[test]
fn test_resolve_image_url_not_found() {
    let (base_url, handle) = serve_once( "404 Not Found", b"no such scene".to_vec());
    let dir = tempfile::tempdir().unwrap();
    let download_dir = dir.path().join("downloads");

    let res = resolve_image_path_with( &local_client(), &format!("{base_url}/scenes/scene.tif"), &download_dir, &ProcessConfig::default());
    handle.join().unwrap();

    assert!( matches!( res, Err(SatProcError::CommonError(SatCommonError::HttpStatus(404)))));
    assert!( !download_dir.join("scene.tif").exists());
    assert_eq!( std::fs::read_dir( &download_dir).unwrap().count(), 0);
}

#[test]
fn test_cli_failed_download() {
    let src_dir = tempfile::tempdir().unwrap();
    let (_, geojson_path) = create_inputs( src_dir.path(), FULL_EXTENT);

    let (base_url, handle) = serve_once( "404 Not Found", Vec::new());
    let dir = tempfile::tempdir().unwrap();
    let url = format!("{base_url}/scenes/scene.tif");

    let output = Command::new( env!("CARGO_BIN_EXE_process_satellite"))
        .args( ["--download-dir", dir.path().to_str().unwrap(), url.as_str(), "ndvi", geojson_path.to_str().unwrap()])
        .env_remove("HTTP_PROXY").env_remove("http_proxy").env_remove("ALL_PROXY").env_remove("all_proxy")
        .env("NO_PROXY", "*").env("no_proxy", "*")
        .output()
        .unwrap();
    handle.join().unwrap();

    assert!( !output.status.success());
    assert!( output.stdout.is_empty());
    assert!( !dir.path().join("scene.tif").exists());
}
