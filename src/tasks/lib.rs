/* ************************************************************************ **
** This file is part of numlab, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                  **
** ************************************************************************ */

//! The numlab task pipelines.
//!
//! Each pipeline is a single pass: read input, adapt the layout, invoke
//! one or two external dense routines, adapt back, report. No state
//! survives a run.

#[macro_use]
extern crate log;

pub type FailResult<T> = Result<T, failure::Error>;

pub mod cmd;
pub mod entry_points;
pub mod report;
