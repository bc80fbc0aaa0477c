//! SVD demonstration: factor, report, reconstruct, measure the error.

use std::io::Write;
use std::path::Path;

use numlab_fs_util as fsx;
use numlab_linalg::lapacke_svd;
use numlab_matrix::DenseMatrix;
use numlab_matrix_io as io;

use crate::report;
use crate::FailResult;

/// Operand used when no input file is given.
fn demo_matrix() -> DenseMatrix {
    DenseMatrix::from_row_major(2, 2, vec![
        1.0, -0.8,
        0.0, 1.0,
    ])
}

pub fn run<W: Write>(input: Option<&Path>, writer: &mut W) -> FailResult<()> {
    let a = match input {
        Some(path) => io::read_single_matrix(fsx::open_text(path)?)?,
        None => demo_matrix(),
    };
    trace!("operand is {}x{}", a.rows(), a.cols());

    let svd = lapacke_svd(&a)?;
    report::write_svd_report(writer, &a, &svd)?;
    Ok(())
}
