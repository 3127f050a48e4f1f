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

//! boundary geometries used to clip rasters

use std::{path::Path, str::FromStr};
use geo::{BoundingRect, Intersects, LineString, MultiPolygon, Point, Polygon, Rect};
use geojson::GeoJson;
use ndarray::Array2;
use tracing::debug;
use satproc_common::fs::filepath_contents_as_string;

use crate::{GeoTransform, GeoTransformEx};
use crate::clip::PixelWindow;
use crate::errors::{Result, SatGdalError};

// tolerance (in pixels) for pixel centers that lie on span ends
const SPAN_EPS: f64 = 1e-9;

/// something that can tell which (georeferenced) pixel centers are inside of a clip region
pub trait GeometryMask {
    /// the bounding rectangle in source raster coordinates, None if the geometry is empty
    fn bounds (&self) -> Option<Rect<f64>>;

    /// is the point (x,y) inside or on the boundary of the geometry
    fn covers (&self, x: f64, y: f64) -> bool;

    /// (rows, cols) flags for the pixels of `window` whose center is covered
    fn covered_pixels (&self, gt: &GeoTransform, window: &PixelWindow) -> Array2<bool> {
        point_mask( self, gt, window)
    }
}

/// test each pixel center of `window` separately with [`GeometryMask::covers`]
pub fn point_mask<M: GeometryMask + ?Sized> (mask: &M, gt: &GeoTransform, window: &PixelWindow) -> Array2<bool> {
    Array2::from_shape_fn( (window.rows, window.cols), |(r,c)| {
        let (x,y) = gt.apply( (window.col_off + c) as f64 + 0.5, (window.row_off + r) as f64 + 0.5);
        mask.covers( x, y)
    })
}

/// the areal geometry of a GeoJSON boundary file. Only the first geometry of the input is used.
/// Coordinates are assumed to be in the CRS of the raster that gets clipped
#[derive(Debug,Clone,PartialEq)]
pub struct BoundaryGeometry {
    polygons: MultiPolygon<f64>
}

impl BoundaryGeometry {
    pub fn open<P: AsRef<Path>> (path: P) -> Result<Self> {
        let s = filepath_contents_as_string( &path.as_ref())?;
        Self::from_geojson_str( &s)
    }

    pub fn from_geojson_str (s: &str) -> Result<Self> {
        let geojson = GeoJson::from_str( s)?;
        Self::from_geojson( geojson)
    }

    /// accepts a Feature, a bare geometry or a FeatureCollection (of which we only use the first feature)
    pub fn from_geojson (geojson: GeoJson) -> Result<Self> {
        let geometry = match geojson {
            GeoJson::Geometry(g) => g,
            GeoJson::Feature(f) => {
                f.geometry.ok_or_else( || unsupported("feature without geometry"))?
            }
            GeoJson::FeatureCollection(fc) => {
                let n_features = fc.features.len();
                let f = fc.features.into_iter().next().ok_or_else( || unsupported("empty feature collection"))?;
                if n_features > 1 { debug!("using first of {n_features} features") }
                f.geometry.ok_or_else( || unsupported("feature without geometry"))?
            }
        };

        match geo_types::Geometry::<f64>::try_from( geometry)? {
            geo_types::Geometry::Polygon(p) => Ok( BoundaryGeometry::from(p) ),
            geo_types::Geometry::MultiPolygon(mp) => Ok( BoundaryGeometry::from(mp) ),
            geo_types::Geometry::Rect(r) => Ok( BoundaryGeometry::from( r.to_polygon()) ),
            other => Err( unsupported( format!("{} is not a (multi)polygon", geometry_type_name(&other))) )
        }
    }

    pub fn polygons (&self) -> &MultiPolygon<f64> {
        &self.polygons
    }
}

impl From<Polygon<f64>> for BoundaryGeometry {
    fn from (p: Polygon<f64>) -> Self {
        BoundaryGeometry { polygons: MultiPolygon::new( vec![p]) }
    }
}

impl From<MultiPolygon<f64>> for BoundaryGeometry {
    fn from (polygons: MultiPolygon<f64>) -> Self {
        BoundaryGeometry { polygons }
    }
}

impl GeometryMask for BoundaryGeometry {
    fn bounds (&self) -> Option<Rect<f64>> {
        self.polygons.bounding_rect()
    }

    fn covers (&self, x: f64, y: f64) -> bool {
        self.polygons.intersects( &Point::new( x, y))
    }

    /// scanline rasterization: one pass over all polygon edges per row. Rotated grids fall back to point tests
    fn covered_pixels (&self, gt: &GeoTransform, window: &PixelWindow) -> Array2<bool> {
        if gt[2] != 0.0 || gt[4] != 0.0 || gt[1] == 0.0 {
            return point_mask( self, gt, window)
        }

        let mut covered = Array2::from_elem( (window.rows, window.cols), false);
        let mut spans: Vec<(f64,f64)> = Vec::new();

        for r in 0..window.rows {
            let (_, y) = gt.apply( window.col_off as f64 + 0.5, (window.row_off + r) as f64 + 0.5);
            spans.clear();
            for polygon in &self.polygons {
                interior_spans( polygon, y, &mut spans);
                boundary_spans( polygon, y, &mut spans);
            }

            for &(xa, xb) in &spans {
                if let Some((c0, c1)) = span_columns( gt, window, xa, xb) {
                    for c in c0..=c1 { covered[[r,c]] = true; }
                }
            }
        }
        covered
    }
}

fn rings (polygon: &Polygon<f64>) -> impl Iterator<Item=&LineString<f64>> {
    std::iter::once( polygon.exterior()).chain( polygon.interiors().iter())
}

/// even-odd x intervals of `polygon` (holes included) along the horizontal line at `y`
fn interior_spans (polygon: &Polygon<f64>, y: f64, spans: &mut Vec<(f64,f64)>) {
    let mut xs: Vec<f64> = Vec::new();
    for ring in rings( polygon) {
        for line in ring.lines() {
            let (p, q) = (line.start, line.end);
            if (p.y <= y) != (q.y <= y) {
                xs.push( p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y));
            }
        }
    }

    xs.sort_by( |a,b| a.total_cmp(b));
    for pair in xs.chunks_exact(2) {
        spans.push( (pair[0], pair[1]));
    }
}

/// points where the horizontal line at `y` touches an edge, so that centers on the boundary count as covered
fn boundary_spans (polygon: &Polygon<f64>, y: f64, spans: &mut Vec<(f64,f64)>) {
    for ring in rings( polygon) {
        for line in ring.lines() {
            let (p, q) = (line.start, line.end);
            if y < p.y.min(q.y) || y > p.y.max(q.y) { continue }

            if p.y == q.y {
                spans.push( (p.x.min(q.x), p.x.max(q.x)));
            } else {
                let x = p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y);
                spans.push( (x, x));
            }
        }
    }
}

/// the inclusive window column range whose pixel centers lie within [xa,xb], None if there is none
fn span_columns (gt: &GeoTransform, window: &PixelWindow, xa: f64, xb: f64) -> Option<(usize,usize)> {
    // center of column c is at gt[0] + (c + 0.5) * gt[1]
    let ca = (xa - gt[0]) / gt[1] - 0.5;
    let cb = (xb - gt[0]) / gt[1] - 0.5;
    let lo = (ca.min(cb) - SPAN_EPS).ceil() - window.col_off as f64;
    let hi = (ca.max(cb) + SPAN_EPS).floor() - window.col_off as f64;

    let lo = lo.max( 0.0);
    let hi = hi.min( window.cols as f64 - 1.0);
    if hi < lo { None } else { Some( (lo as usize, hi as usize)) }
}

fn unsupported<S: ToString> (msg: S) -> SatGdalError {
    SatGdalError::UnsupportedGeometry( msg.to_string())
}

fn geometry_type_name (g: &geo_types::Geometry<f64>) -> &'static str {
    match g {
        geo_types::Geometry::Point(_) | geo_types::Geometry::MultiPoint(_) => "point geometry",
        geo_types::Geometry::Line(_) | geo_types::Geometry::LineString(_) | geo_types::Geometry::MultiLineString(_) => "line geometry",
        geo_types::Geometry::GeometryCollection(_) => "geometry collection",
        _ => "geometry"
    }
}
