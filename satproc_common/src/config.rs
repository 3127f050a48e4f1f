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

use std::path::Path;
use crate::{Result, fs::filepath_contents};

/// load a RON config from an explicit path
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = filepath_contents( &path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// load a RON config if a path is provided, otherwise fall back to the `Default` config
pub fn load_config_or_default<C,P> (opt_path: Option<P>) -> Result<C> where C: for <'a> serde::Deserialize<'a> + Default, P: AsRef<Path> {
    match opt_path {
        Some(path) => load_config_path( path),
        None => Ok( C::default() )
    }
}
