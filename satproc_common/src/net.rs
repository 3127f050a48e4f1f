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

//! blocking HTTP retrieval of remote images

use std::{io::{Read, Write}, path::{Path, PathBuf}};
use reqwest::{blocking::Client, StatusCode};
use regex::Regex;
use lazy_static::lazy_static;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::{Result, SatCommonError, fs::parent_dir};

/// the number of bytes we read from the response before writing them to the target file
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024;

const PATH: usize = 5;

lazy_static! {
    // [scheme,user,host,port,path,query]
    static ref URL_RE: Regex = Regex::new( r"(.+)://(?:(.+)@)?([^:/]+)(?::(\d+))?(?:/([^?]+))?(?:\?(.+))?").unwrap();
    static ref FNAME_RE: Regex = Regex::new( r"(?:.*/)?(.*)").unwrap();
}

/// is this something we should fetch before processing (as opposed to a local path)
pub fn is_url (s: &str)->bool {
    let s = s.trim_start();
    s.starts_with("http://") || s.starts_with("https://")
}

/// get filename part (last path element) of complete URL
/// NOTE - this does not work for partial (relative) URLs
pub fn url_file_name<'a> (url: &'a str) -> Option<&'a str> {
    URL_RE.captures( url)
    .and_then( |cap| cap.get( PATH))
    .map( |m| m.as_str())
    .and_then( |p| FNAME_RE.captures( p))
    .and_then( |cap| cap.get(1))
    .map( |m| m.as_str())
    .filter( |s| !s.is_empty())
}

/// fetch a remote image into `save_path`, using a default client and chunk size
pub fn download_image (url: &str, save_path: impl AsRef<Path>) -> Result<PathBuf> {
    let client = Client::new();
    download_image_chunked( &client, url, save_path, DOWNLOAD_CHUNK_SIZE)
}

/// fetch a remote image into the given directory, using the last URL path element as the filename
pub fn download_image_to_dir (client: &Client, url: &str, dir: impl AsRef<Path>, chunk_size: usize) -> Result<PathBuf> {
    let fname = url_file_name( url).ok_or_else( || SatCommonError::NotAFileUrl( url.to_string()))?;
    let path = dir.as_ref().join( fname);
    download_image_chunked( client, url, path, chunk_size)
}

/// fetch URL using HTTP GET and stream the response body into `save_path` in chunks of `chunk_size` bytes.
/// Anything but a '200 OK' response is an error. Data is written to a temp file in the target dir which
/// only gets moved to `save_path` once the whole body was received, i.e. we never leave partial downloads
pub fn download_image_chunked (client: &Client, url: &str, save_path: impl AsRef<Path>, chunk_size: usize) -> Result<PathBuf> {
    let save_path = save_path.as_ref();
    info!("downloading {url}");

    let mut response = client.get(url).send()?;

    match response.status() {
        StatusCode::OK => {
            let mut file = NamedTempFile::new_in( parent_dir( save_path))?;
            let mut buf = vec![0u8; chunk_size.max(1)];
            let mut len: u64 = 0;

            loop {
                let n = response.read( &mut buf)?;
                if n == 0 { break }
                file.write_all( &buf[..n])?;
                len += n as u64;
            }
            file.flush()?;

            file.persist( save_path).map_err( |e| SatCommonError::IOError(e.error))?;
            debug!("{len} bytes saved to {save_path:?}");
            Ok( save_path.to_path_buf() )
        }
        other => {
            error!("image download failed: {other}");
            Err( SatCommonError::HttpStatus( other.as_u16()) )
        }
    }
}
