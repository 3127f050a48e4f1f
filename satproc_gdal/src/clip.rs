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

//! crop-to-shape for rasters: cut the raster to the pixel window covering the boundary geometry and
//! set all pixels whose center is outside of the boundary to nodata

use geo::Rect;
use ndarray::{s, Array3, ArrayView2, Axis};
use tracing::debug;

use crate::{GeoTransform, GeoTransformEx, RasterProfile, RasterSource, offset_geotransform};
use crate::errors::{Result, SatGdalError};
use crate::geometry::GeometryMask;

// tolerance for pixel coordinates that are computed from geometry bounds lying on pixel edges
const PIXEL_EPS: f64 = 1e-9;

/// a rectangular sub-region of a raster grid in pixel coordinates
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct PixelWindow {
    pub col_off: usize,
    pub row_off: usize,
    pub cols: usize,
    pub rows: usize,
}

impl PixelWindow {
    pub fn new (col_off: usize, row_off: usize, cols: usize, rows: usize) -> Self {
        PixelWindow { col_off, row_off, cols, rows }
    }
}

/// the result of clipping a multi-band raster to a boundary geometry
#[derive(Debug,Clone)]
pub struct ClippedRaster {
    /// (bands, rows, cols)
    pub data: Array3<f64>,
    pub window: PixelWindow,
    /// geotransform of the clipped grid
    pub geo_transform: GeoTransform,
    /// profile of the source raster
    pub profile: RasterProfile,
}

impl ClippedRaster {
    pub fn band_count (&self) -> usize { self.data.dim().0 }
    pub fn height (&self) -> usize { self.data.dim().1 }
    pub fn width (&self) -> usize { self.data.dim().2 }

    /// 1-based band access, None if out of range
    pub fn band (&self, band_index: usize) -> Option<ArrayView2<'_,f64>> {
        if band_index >= 1 && band_index <= self.band_count() {
            Some( self.data.index_axis( Axis(0), band_index-1) )
        } else {
            None
        }
    }

    /// the source profile, overridden to a single float32 band with nodata=0 and the clipped grid
    pub fn output_profile (&self) -> RasterProfile {
        self.profile.single_band_f32( self.width(), self.height(), self.geo_transform)
    }
}

/// compute the pixel window that covers the provided bounds, rounding outwards and limiting it to the raster extent
pub fn geometry_window (gt: &GeoTransform, raster_size: (usize,usize), bounds: &Rect<f64>) -> Result<PixelWindow> {
    let (n_cols, n_rows) = raster_size;
    let inv = gt.invert()?;

    let (min, max) = (bounds.min(), bounds.max());
    let mut c_min = f64::MAX;
    let mut c_max = f64::MIN;
    let mut r_min = f64::MAX;
    let mut r_max = f64::MIN;

    for (x,y) in [(min.x,min.y), (min.x,max.y), (max.x,min.y), (max.x,max.y)] {
        let (c,r) = inv.apply( x, y);
        c_min = c_min.min(c);
        c_max = c_max.max(c);
        r_min = r_min.min(r);
        r_max = r_max.max(r);
    }

    let c0 = (c_min + PIXEL_EPS).floor().max( 0.0);
    let c1 = (c_max - PIXEL_EPS).ceil().min( n_cols as f64);
    let r0 = (r_min + PIXEL_EPS).floor().max( 0.0);
    let r1 = (r_max - PIXEL_EPS).ceil().min( n_rows as f64);

    if c1 <= c0 || r1 <= r0 {
        return Err( SatGdalError::NoOverlap( format!("bounds {:?} outside of {}x{} grid", bounds, n_cols, n_rows)) )
    }

    Ok( PixelWindow::new( c0 as usize, r0 as usize, (c1 - c0) as usize, (r1 - r0) as usize) )
}

/// crop all bands of `source` to the window of the `mask` bounds and set every pixel whose center is not covered by
/// the mask to the source nodata value (0 if the source does not define one)
pub fn clip_to_geometry<S,M> (source: &S, mask: &M) -> Result<ClippedRaster> where S: RasterSource, M: GeometryMask {
    let profile = source.profile()?;
    let gt = profile.geo_transform;

    let bounds = mask.bounds().ok_or_else( || SatGdalError::NoOverlap("empty boundary geometry".into()))?;
    let window = geometry_window( &gt, (profile.width, profile.height), &bounds)?;
    let fill = profile.nodata.unwrap_or( 0.0);

    let mut data = Array3::<f64>::zeros( (profile.band_count, window.rows, window.cols));
    for b in 0..profile.band_count {
        let band = source.read_band_window( b+1, &window)?;
        data.index_axis_mut( Axis(0), b).assign( &band);
    }

    let covered = mask.covered_pixels( &gt, &window);
    let mut n_masked = 0;
    for ((r,c), is_covered) in covered.indexed_iter() {
        if !is_covered {
            data.slice_mut( s![.., r, c]).fill( fill);
            n_masked += 1;
        }
    }
    debug!("clipped to {window:?}, {n_masked} pixels masked");

    let geo_transform = offset_geotransform( &gt, window.col_off, window.row_off);
    Ok( ClippedRaster { data, window, geo_transform, profile } )
}
