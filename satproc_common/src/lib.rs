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

//! common utilities shared by the satproc crates: error definition macros, file system helpers,
//! RON config loading and the blocking HTTP image fetcher

pub mod macros;
pub mod fs;
pub mod net;
pub mod config;

pub use config::load_config_path;

define_error!{ pub SatCommonError = 
    IOError(#[from] std::io::Error) : "IO error: {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    HttpStatus(u16) : "download failed with response status {0}",
    RonSerdeError(#[from] ron::error::SpannedError) : "config RON error: {0}",
    NotAFileUrl(String) : "not a file URL: {0}"
}

pub type Result<T> = std::result::Result<T, SatCommonError>;
