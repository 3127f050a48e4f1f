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

//! colorized PNG previews of index grids

use std::path::Path;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use ndarray::Array2;
use tracing::debug;

use crate::errors::Result;

/// maps normalized 8-bit values to RGB colors
pub trait ColorMapper {
    fn map (&self, v: u8) -> [u8;3];
}

/// the classic 'jet' colormap: dark blue -> blue -> cyan -> yellow -> red -> dark red
pub struct JetColorMap {
    lut: [[u8;3];256]
}

impl JetColorMap {
    pub fn new ()->Self {
        let mut lut = [[0u8;3];256];
        for (i, rgb) in lut.iter_mut().enumerate() {
            let t = i as f64 / 255.0;
            *rgb = [ jet_channel( t, 3.0), jet_channel( t, 2.0), jet_channel( t, 1.0) ];
        }
        JetColorMap { lut }
    }
}

impl Default for JetColorMap {
    fn default()->Self { JetColorMap::new() }
}

impl ColorMapper for JetColorMap {
    #[inline]
    fn map (&self, v: u8) -> [u8;3] {
        self.lut[v as usize]
    }
}

// piecewise linear ramp centered at t = offset/4
fn jet_channel (t: f64, offset: f64) -> u8 {
    let v = (1.5 - (4.0 * t - offset).abs()).clamp( 0.0, 1.0);
    (v * 255.0).round() as u8
}

/// min-max scale the whole grid into 0..=255. Constant grids map to 0, non-finite values are
/// ignored for min/max and map to 0
pub fn normalize_min_max (data: &Array2<f64>) -> Array2<u8> {
    let (min, max) = data.iter()
        .filter( |v| v.is_finite())
        .fold( (f64::INFINITY, f64::NEG_INFINITY), |(min,max), &v| (min.min(v), max.max(v)));

    let range = max - min;
    let scale = if range.is_finite() && range > f64::EPSILON { 255.0 / range } else { 0.0 };

    data.mapv( |v| {
        if v.is_finite() && scale > 0.0 {
            ((v - min) * scale).round().clamp( 0.0, 255.0) as u8
        } else {
            0
        }
    })
}

/// turn a normalized (rows, cols) grid into an RGB image
pub fn colorize<M: ColorMapper> (normalized: &Array2<u8>, mapper: &M) -> RgbImage {
    let (rows, cols) = normalized.dim();
    ImageBuffer::from_fn( cols as u32, rows as u32, |x,y| Rgb( mapper.map( normalized[[y as usize, x as usize]])))
}

/// normalize, colorize and save the index grid as 8-bit 3-channel PNG
pub fn write_preview_png<M: ColorMapper, P: AsRef<Path>> (index: &Array2<f64>, mapper: &M, path: P) -> Result<()> {
    let img = colorize( &normalize_min_max( index), mapper);
    img.save_with_format( path.as_ref(), ImageFormat::Png)?;
    debug!("saved {}x{} preview to {:?}", img.width(), img.height(), path.as_ref());
    Ok(())
}
