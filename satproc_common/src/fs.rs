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

use std::fs::{self,File};
use std::io::{self,Read,Error as IOError,ErrorKind};
use std::path::{Path,PathBuf};

type Result<T> = std::result::Result<T,std::io::Error>;

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err( IOError::new( ErrorKind::PermissionDenied, format!("dir {path:?} not writable")))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

/// the directory part of a file path, '.' if the path does not have one
pub fn parent_dir (path: &Path)->PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from(".")
    }
}

pub fn file_contents_as_string (file: &mut fs::File) -> Result<String> {
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    let mut file = File::open(path)?;
    file_contents_as_string( &mut file)
}

pub fn filepath_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let md = file.metadata()?;
    let len = md.len();
    if len > 0 {
        let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
        file.read_to_end(&mut contents)?;
        Ok(contents)

    } else { Err( IOError::new( ErrorKind::Other, format!("file empty: {:?}", path.as_ref()))) }
}
