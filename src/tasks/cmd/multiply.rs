//! The general product pipeline: file → dgemm → file, C = A·B.

use std::path::Path;

use numlab_fs_util as fsx;
use numlab_linalg::cblas_matrix_product;
use numlab_matrix_io as io;

use crate::FailResult;

pub fn run(input: &Path, output: &Path) -> FailResult<()> {
    let (a, b) = io::read_product_input(fsx::open_text(input)?)?;
    trace!("read A ({}x{}) and B ({}x{})", a.rows(), a.cols(), b.rows(), b.cols());

    // dgemm wants column-major operands; the text format is row-major.
    let c = cblas_matrix_product(&a.to_column_major(), &b.to_column_major());
    let c = c.to_row_major();

    // The output file must not exist if anything above failed.
    io::write_matrix(fsx::create(output)?, &c)?;
    println!("OK: C = A*B via dgemm ({}x{})", c.rows(), c.cols());
    Ok(())
}
