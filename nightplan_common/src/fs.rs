/*
 * Copyright © 2025, the nightplan authors. All rights reserved.
 *
 * The “nightplan” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::fs::{self,File};
use std::io::{self,Read,Write,Error as IOError,ErrorKind};
use std::path::{Path,PathBuf};
use std::time::SystemTime;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn filename<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_name().and_then(|ostr| ostr.to_str())
}

pub fn filename_of_path (path: impl AsRef<Path>)->Result<String> {
    let path = path.as_ref();

    Ok( path.file_name()
        .ok_or( IOError::new( ErrorKind::InvalidInput, format!("not a valid filename {path:?}")))?
        .to_str().ok_or( IOError::new( ErrorKind::InvalidInput, format!("invalid char in filename {path:?}")))?
        .to_string())
}

pub fn ensure_dir (path: impl AsRef<Path>)->Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// check if dir pathname exists and is writable, try to create dir otherwise
pub fn ensure_writable_dir (path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        let md = fs::metadata(&path)?;
        if md.permissions().readonly() {
            Err( IOError::new( ErrorKind::PermissionDenied, format!("dir {:?} not writable", &path)))
        } else {
            Ok(())
        }

    } else {
        fs::create_dir_all(path)
    }
}

pub fn file_contents_as_string (file: &mut File) -> Result<String> {
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    let mut file = File::open(path)?;
    file_contents_as_string( &mut file)
}

pub fn store_file_contents_in_dir<P: AsRef<Path>> (dir: &P, filename: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.as_ref().join(filename);
    let mut file = File::create(&path)?;
    file.write_all( contents)?;

    Ok(path)
}

pub fn get_modified_timestamp <P: AsRef<Path>> (path: P) -> Option<SystemTime> {
    if let Some(meta) = fs::metadata(path).ok() {
        meta.modified().ok()
    } else {
        None
    }
}

pub fn set_modified_timestamp <P: AsRef<Path>> (path: P, t: SystemTime) -> Result<()> {
    let f = File::open(path)?;
    f.set_modified(t)
}

/// age of a file derived from its modification timestamp (None if it does not exist)
pub fn file_age <P: AsRef<Path>> (path: P) -> Option<std::time::Duration> {
    get_modified_timestamp(path).and_then( |t| SystemTime::now().duration_since(t).ok())
}
