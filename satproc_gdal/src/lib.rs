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

//! GDAL based raster access for satproc.
//! This wraps the external 'gdal' crate behind the narrow [`RasterSource`] interface and provides
//! the GeoTIFF writer for computed index bands

pub mod errors;
pub mod geometry;
pub mod clip;

use std::{collections::HashMap, path::{Path,PathBuf}};
use lazy_static::lazy_static;
use ndarray::{Array2, ArrayView3, Axis};
use tracing::debug;

// we re-export these so that other crates don't need a direct gdal dependency
pub use gdal::{self, Dataset, Driver, DriverManager, GeoTransform, GeoTransformEx, errors::GdalError};
pub use gdal::raster::{Buffer, GdalDataType, RasterBand};
pub use gdal::spatial_ref::SpatialRef;

pub use errors::{Result, SatGdalError, misc_error};
pub use geometry::{BoundaryGeometry, GeometryMask, point_mask};
pub use clip::{ClippedRaster, PixelWindow, clip_to_geometry, geometry_window};


lazy_static! {
    static ref EXT_MAP: HashMap<&'static str, &'static str> = HashMap::from( [ // file extension -> driver short name
        ("tif", "GTiff"),
        ("tiff", "GTiff"),
        ("img", "HFA"),
    ]);
}

pub const DEFAULT_DRIVER: &str = "GTiff";

/// Note that filename extension has to be lower case
pub fn get_driver_name_for_extension (ext: &str) -> Option<&'static str> {
    EXT_MAP.get( ext).map(|v| &**v)
}

/// the raster driver for the extension of the given path, GTiff if we don't know the extension
pub fn get_driver_for_path (path: &Path) -> Result<Driver> {
    let driver_name = path.extension()
        .and_then( |ext| ext.to_str())
        .and_then( |ext| get_driver_name_for_extension( ext.to_ascii_lowercase().as_str()))
        .unwrap_or( DEFAULT_DRIVER);

    Ok( DriverManager::get_driver_by_name( driver_name)? )
}

pub fn new_geotransform (x_upper_left: f64, x_resolution: f64, row_rotation: f64,
                         y_upper_left: f64, col_rotation: f64, y_resolution: f64) -> GeoTransform {
    [x_upper_left,x_resolution,row_rotation,y_upper_left,col_rotation,y_resolution]
}

/// the geotransform of a sub-grid that starts at the provided pixel column/row of the grid described by `gt`.
/// Resolution and rotation terms stay the same, only the origin moves
pub fn offset_geotransform (gt: &GeoTransform, col_off: usize, row_off: usize) -> GeoTransform {
    let (x, y) = gt.apply( col_off as f64, row_off as f64);
    new_geotransform( x, gt[1], gt[2], y, gt[4], gt[5])
}

/* #region raster profile and source *************************************************************************************/

/// the meta information of a raster that we carry over from source to output
#[derive(Debug,Clone,PartialEq)]
pub struct RasterProfile {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub data_type: GdalDataType,
    pub geo_transform: GeoTransform,
    pub projection: String, // WKT, empty if unknown
    pub nodata: Option<f64>,
}

impl RasterProfile {
    /// the profile for a single float32 band with nodata=0 that covers the provided (clipped) grid
    pub fn single_band_f32 (&self, width: usize, height: usize, geo_transform: GeoTransform) -> RasterProfile {
        RasterProfile {
            width,
            height,
            band_count: 1,
            data_type: GdalDataType::Float32,
            geo_transform,
            projection: self.projection.clone(),
            nodata: Some(0.0),
        }
    }
}

/// abstraction of something we can read georeferenced raster bands from
pub trait RasterSource {
    /// (columns, rows)
    fn raster_size (&self) -> (usize,usize);

    fn band_count (&self) -> usize;

    fn profile (&self) -> Result<RasterProfile>;

    /// read the given window of band `band_index` (1-based) as a (rows, cols) array
    fn read_band_window (&self, band_index: usize, window: &PixelWindow) -> Result<Array2<f64>>;

    fn read_band (&self, band_index: usize) -> Result<Array2<f64>> {
        let (cols, rows) = self.raster_size();
        self.read_band_window( band_index, &PixelWindow::new( 0, 0, cols, rows))
    }
}

/// a GDAL dataset opened for reading. The dataset is closed when this is dropped
pub struct GdalRaster {
    path: PathBuf,
    ds: Dataset,
}

impl GdalRaster {
    pub fn open<P: AsRef<Path>> (path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let ds = Dataset::open( &path)?;
        debug!("opened raster {:?} ({} bands, {:?})", path, ds.raster_count(), ds.raster_size());
        Ok( GdalRaster { path, ds } )
    }
}

impl RasterSource for GdalRaster {
    fn raster_size (&self) -> (usize,usize) {
        self.ds.raster_size()
    }

    fn band_count (&self) -> usize {
        self.ds.raster_count()
    }

    fn profile (&self) -> Result<RasterProfile> {
        let (width, height) = self.ds.raster_size();
        let band_count = self.ds.raster_count();
        if band_count < 1 { return Err( misc_error( format!("no raster bands in {:?}", self.path))) }

        let band = self.ds.rasterband(1)?;

        Ok( RasterProfile {
            width,
            height,
            band_count,
            data_type: band.band_type(),
            geo_transform: self.ds.geo_transform()?,
            projection: self.ds.projection(),
            nodata: band.no_data_value(),
        })
    }

    fn read_band_window (&self, band_index: usize, window: &PixelWindow) -> Result<Array2<f64>> {
        let band = self.ds.rasterband( band_index)?;
        let size = (window.cols, window.rows);
        let buf: Buffer<f64> = band.read_as( (window.col_off as isize, window.row_off as isize), size, size, None)?;
        Ok( Array2::from_shape_vec( (window.rows, window.cols), buf.data().to_vec())? )
    }
}

/* #endregion raster profile and source */

/* #region writing ****************************************************************************************************/

/// write a (bands, rows, cols) array as float32 raster with the provided georeference.
/// The driver is chosen from the path extension
pub fn write_raster_f32<P: AsRef<Path>> (path: P, geo_transform: &GeoTransform, projection: &str, nodata: Option<f64>, data: ArrayView3<f64>) -> Result<()> {
    let path = path.as_ref();
    let (n_bands, rows, cols) = data.dim();
    if n_bands == 0 || rows == 0 || cols == 0 { return Err( misc_error( format!("cannot write empty raster {path:?}"))) }

    let driver = get_driver_for_path( path)?;
    let mut ds = driver.create_with_band_type::<f32,_>( path, cols, rows, n_bands)?;
    ds.set_geo_transform( geo_transform)?;
    if !projection.is_empty() {
        ds.set_projection( projection)?;
    }

    for (i, band_data) in data.axis_iter( Axis(0)).enumerate() {
        let mut band = ds.rasterband( i+1)?;
        if nodata.is_some() {
            band.set_no_data_value( nodata)?;
        }

        let values: Vec<f32> = band_data.iter().map( |v| *v as f32).collect();
        let mut buf = Buffer::new( (cols, rows), values);
        band.write( (0, 0), (cols, rows), &mut buf)?;
    }

    debug!("wrote {n_bands} band(s) {cols}x{rows} to {path:?}");
    Ok(())
}

/// write the computed index as single float32 band according to the provided output profile
pub fn write_index_geotiff<P: AsRef<Path>> (path: P, profile: &RasterProfile, index: &Array2<f64>) -> Result<()> {
    let (rows, cols) = index.dim();
    if rows != profile.height || cols != profile.width {
        return Err( misc_error( format!("index grid {cols}x{rows} does not match profile {}x{}", profile.width, profile.height)))
    }

    let data = index.view().insert_axis( Axis(0));
    write_raster_f32( path, &profile.geo_transform, &profile.projection, profile.nodata, data)
}

/* #endregion writing */
