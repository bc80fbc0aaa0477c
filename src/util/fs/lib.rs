/* ************************************************************************ **
** This file is part of numlab, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                  **
** ************************************************************************ */

//! Adds error context to fs operations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use failure::ResultExt;

pub type FailResult<T> = Result<T, failure::Error>;

/// Wrapper around `File::open` that adds context.
pub fn open<P: AsRef<Path>>(path: P) -> FailResult<File> {
    let path = path.as_ref();
    Ok(File::open(path)
        .with_context(|_| format!("while opening file: '{}'", path.display()))?)
}

/// Wrapper around `File::open` that adds context and makes a `BufReader`.
pub fn open_text<P: AsRef<Path>>(path: P) -> FailResult<BufReader<File>> {
    open(path).map(BufReader::new)
}

/// Wrapper around `File::create` that adds context.
pub fn create<P: AsRef<Path>>(path: P) -> FailResult<File> {
    let path = path.as_ref();
    Ok(File::create(path)
        .with_context(|_| format!("could not create file: '{}'", path.display()))?)
}
