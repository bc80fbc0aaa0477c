/* ************************************************************************ **
** This file is part of numlab, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                  **
** ************************************************************************ */

//! Safe wrappers around the dense BLAS/LAPACK routines used by the task
//! programs.
//!
//! Several of the underlying routines factorize or solve in place,
//! overwriting their arguments. Every wrapper here takes immutable inputs
//! and performs the defensive copy internally, so callers never observe a
//! silently clobbered buffer.

#[macro_use]
extern crate failure;
// the openblas build linked here also provides the cblas symbols
extern crate lapack_src;

use std::cmp;

use numlab_matrix::{DenseMatrix, Layout};

pub type FailResult<T> = Result<T, failure::Error>;

/// Outcome signal from an external routine, already classified.
#[derive(Debug, Fail)]
pub enum LapackError {
    /// Negative status: a caller bug (wrong dimension, leading dimension,
    /// or layout), reported with the routine's 1-based parameter position.
    #[fail(display = "{}: invalid argument at parameter {}", routine, position)]
    InvalidArgument { routine: &'static str, position: i32 },
    /// Positive status: a numerical failure (singular system,
    /// non-convergence), not a caller bug.
    #[fail(display = "{}: numeric failure (info = {})", routine, info)]
    NumericFailure { routine: &'static str, info: i32 },
}

fn check_info(routine: &'static str, info: i32) -> Result<(), LapackError> {
    if info == 0 {
        Ok(())
    } else if info < 0 {
        Err(LapackError::InvalidArgument { routine, position: -info })
    } else {
        Err(LapackError::NumericFailure { routine, info })
    }
}

/// Computes C = A·B using BLAS dgemm.
///
/// Both operands must be column-major with a matching shared dimension;
/// the result is a fresh column-major matrix. The coefficients are fixed
/// at "overwrite with fresh product" (alpha = 1, beta = 0) and neither
/// operand is transposed. dgemm itself has no failure status.
pub fn cblas_matrix_product(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
    assert_eq!(a.layout(), Layout::ColumnMajor, "dgemm operand A must be column-major");
    assert_eq!(b.layout(), Layout::ColumnMajor, "dgemm operand B must be column-major");
    assert_eq!(
        a.cols(), b.rows(),
        "shared dimension mismatch: A is {}x{}, B is {}x{}",
        a.rows(), a.cols(), b.rows(), b.cols(),
    );

    let m = a.rows() as i32;
    let n = b.cols() as i32;
    let k = a.cols() as i32;

    let mut c = DenseMatrix::zeros(a.rows(), b.cols(), Layout::ColumnMajor);
    unsafe {
        ::cblas::dgemm(
            ::cblas::Layout::ColumnMajor,
            ::cblas::Transpose::None,
            ::cblas::Transpose::None,
            m, n, k,
            1.0,
            a.data(), m,
            b.data(), k,
            0.0,
            c.data_mut(), m,
        );
    }
    c
}

/// Row-major convenience around [`cblas_matrix_product`]: converts the
/// operands, multiplies, converts the product back.
pub fn matrix_product(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
    cblas_matrix_product(&a.to_column_major(), &b.to_column_major()).to_row_major()
}

/// Forms the normal-equation pair (AᵀA, Aᵀy) for a column-major design
/// matrix A and observation vector y, via dgemm and dgemv.
pub fn cblas_normal_equations(design: &DenseMatrix, obs: &[f64]) -> (DenseMatrix, Vec<f64>) {
    assert_eq!(design.layout(), Layout::ColumnMajor, "design matrix must be column-major");
    assert_eq!(design.rows(), obs.len(), "one observation per design row");

    let m = design.rows() as i32;
    let n = design.cols() as i32;

    let mut ata = DenseMatrix::zeros(design.cols(), design.cols(), Layout::ColumnMajor);
    unsafe {
        ::cblas::dgemm(
            ::cblas::Layout::ColumnMajor,
            ::cblas::Transpose::Ordinary,
            ::cblas::Transpose::None,
            n, n, m,
            1.0,
            design.data(), m,
            design.data(), m,
            0.0,
            ata.data_mut(), n,
        );
    }

    let mut aty = vec![0.0; design.cols()];
    unsafe {
        ::cblas::dgemv(
            ::cblas::Layout::ColumnMajor,
            ::cblas::Transpose::Ordinary,
            m, n,
            1.0,
            design.data(), m,
            obs, 1,
            0.0,
            &mut aty, 1,
        );
    }

    (ata, aty)
}

/// Solves `square · x = rhs` using LAPACKe's dgesv.
///
/// dgesv factorizes in place, so both arguments are copied first and the
/// originals stay valid. A singular system comes back as
/// [`LapackError::NumericFailure`].
pub fn lapacke_linear_solve(square: &DenseMatrix, rhs: &[f64]) -> FailResult<Vec<f64>> {
    assert!(square.rows() == square.cols(), "dgesv needs a square system");
    assert_eq!(square.cols(), rhs.len(), "right-hand side length mismatch");
    assert_eq!(square.layout(), Layout::ColumnMajor, "dgesv wrapper takes column-major input");

    let n = square.rows() as i32;
    let mut a = square.data().to_vec();
    let mut b = rhs.to_vec();
    let mut ipiv = vec![0i32; square.rows()];

    let info = unsafe {
        ::lapacke::dgesv(::lapacke::Layout::ColumnMajor, n, 1, &mut a, n, &mut ipiv, &mut b, n)
    };
    check_info("dgesv", info)?;

    Ok(b)
}

/// Minimizes the 2-norm of `design · x − obs` using LAPACKe's dgels (QR).
///
/// The design matrix must be column-major. dgels overwrites both buffers,
/// so the wrapper copies; the first `cols` entries of the overwritten
/// right-hand side carry the solution and are returned fresh.
pub fn lapacke_least_squares_qr(design: &DenseMatrix, obs: &[f64]) -> FailResult<Vec<f64>> {
    assert_eq!(design.layout(), Layout::ColumnMajor, "dgels wrapper takes column-major input");
    assert_eq!(design.rows(), obs.len(), "one observation per design row");

    let m = design.rows() as i32;
    let n = design.cols() as i32;
    // ldb must cover both the input (m) and the solution (n)
    let ldb = cmp::max(m, n);

    let mut a = design.data().to_vec();
    let mut b = vec![0.0; ldb as usize];
    b[..obs.len()].copy_from_slice(obs);

    let info = unsafe {
        ::lapacke::dgels(::lapacke::Layout::ColumnMajor, b'N', m, n, 1, &mut a, m, &mut b, ldb)
    };
    check_info("dgels", info)?;

    b.truncate(design.cols());
    Ok(b)
}

/// Full singular value decomposition: A = U·Σ·Vᵀ.
#[derive(Debug, Clone)]
pub struct Svd {
    /// m×m, row-major.
    pub u: DenseMatrix,
    /// min(m, n) values, descending.
    pub singular_values: Vec<f64>,
    /// n×n, row-major.
    pub vt: DenseMatrix,
}

impl Svd {
    /// U·Σ·Vᵀ, shaped like the original operand, row-major.
    pub fn reconstruct(&self) -> DenseMatrix {
        let m = self.u.rows();
        let n = self.vt.cols();
        let mut sigma = DenseMatrix::zeros(m, n, Layout::RowMajor);
        for (k, &value) in self.singular_values.iter().enumerate() {
            sigma.data_mut()[k * n + k] = value;
        }
        matrix_product(&matrix_product(&self.u, &sigma), &self.vt)
    }
}

/// Computes the full SVD using LAPACKe's dgesvd.
///
/// dgesvd destroys its input, so the operand is copied internally; U, the
/// singular values, and Vᵀ are all freshly allocated.
pub fn lapacke_svd(matrix: &DenseMatrix) -> FailResult<Svd> {
    assert_eq!(matrix.layout(), Layout::RowMajor, "dgesvd wrapper takes row-major input");

    let m = matrix.rows() as i32;
    let n = matrix.cols() as i32;
    let min_mn = cmp::min(matrix.rows(), matrix.cols());

    let mut a = matrix.data().to_vec();
    let mut s = vec![0.0; min_mn];
    let mut u = DenseMatrix::zeros(matrix.rows(), matrix.rows(), Layout::RowMajor);
    let mut vt = DenseMatrix::zeros(matrix.cols(), matrix.cols(), Layout::RowMajor);
    let mut superb = vec![0.0; cmp::max(min_mn, 2) - 1];

    let info = unsafe {
        ::lapacke::dgesvd(
            ::lapacke::Layout::RowMajor,
            b'A', b'A',
            m, n,
            &mut a, n,
            &mut s,
            u.data_mut(), m,
            vt.data_mut(), n,
            &mut superb,
        )
    };
    check_info("dgesvd", info)?;

    Ok(Svd { u, singular_values: s, vt })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(expected: f64, actual: f64, tol: f64) {
        assert!(
            (expected - actual).abs() <= tol,
            "not close: expected {}, got {}", expected, actual,
        );
    }

    #[test]
    fn product_2x3_by_3x2() {
        let a = DenseMatrix::from_row_major(2, 3, vec![
            1.0, 2.0, 3.0,
            1.0, 1.0, 1.0,
        ]);
        let b = DenseMatrix::from_row_major(3, 2, vec![
            2.0, 3.0,
            3.0, 4.0,
            5.0, 6.0,
        ]);
        let c = matrix_product(&a, &b);
        assert_eq!((c.rows(), c.cols()), (2, 2));
        let expected = [23.0, 29.0, 10.0, 13.0];
        for (got, want) in c.data().iter().zip(&expected) {
            assert_close(*want, *got, 1e-9);
        }
    }

    #[test]
    fn product_by_identity_is_identity_map() {
        let a = DenseMatrix::from_row_major(2, 3, vec![
            0.25, -1.5, 3.0,
            7.0, 0.125, -2.0,
        ]);
        let mut eye = DenseMatrix::zeros(3, 3, Layout::RowMajor);
        for k in 0..3 {
            eye.data_mut()[k * 3 + k] = 1.0;
        }
        let c = matrix_product(&a, &eye);
        for (got, want) in c.data().iter().zip(a.data()) {
            assert_close(*want, *got, 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "shared dimension mismatch")]
    fn product_rejects_dimension_mismatch() {
        let a = DenseMatrix::zeros(2, 3, Layout::ColumnMajor);
        let b = DenseMatrix::zeros(2, 2, Layout::ColumnMajor);
        let _ = cblas_matrix_product(&a, &b);
    }

    #[test]
    fn solve_well_conditioned_system() {
        // [[2, 1], [1, 3]] x = [3, 5] has solution [0.8, 1.4]
        let square = DenseMatrix::from_column_major(2, 2, vec![2.0, 1.0, 1.0, 3.0]);
        let x = lapacke_linear_solve(&square, &[3.0, 5.0]).unwrap();
        assert_close(0.8, x[0], 1e-12);
        assert_close(1.4, x[1], 1e-12);
    }

    #[test]
    fn solve_singular_system_is_a_numeric_failure() {
        let square = DenseMatrix::from_column_major(2, 2, vec![1.0, 2.0, 2.0, 4.0]);
        let err = lapacke_linear_solve(&square, &[1.0, 2.0]).unwrap_err();
        match err.downcast_ref::<LapackError>() {
            Some(LapackError::NumericFailure { routine, .. }) => assert_eq!(*routine, "dgesv"),
            other => panic!("expected numeric failure, got {:?}", other),
        }
    }

    #[test]
    fn least_squares_recovers_exact_quadratic() {
        // samples on y = 2x^2 - 3x + 1, columns [x^2, x, 1]
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let m = xs.len();
        let mut data = vec![0.0; m * 3];
        let mut obs = vec![0.0; m];
        for (i, &x) in xs.iter().enumerate() {
            data[0 * m + i] = x * x;
            data[1 * m + i] = x;
            data[2 * m + i] = 1.0;
            obs[i] = 2.0 * x * x - 3.0 * x + 1.0;
        }
        let design = DenseMatrix::from_column_major(m, 3, data);
        let theta = lapacke_least_squares_qr(&design, &obs).unwrap();
        assert_close(2.0, theta[0], 1e-8);
        assert_close(-3.0, theta[1], 1e-8);
        assert_close(1.0, theta[2], 1e-8);
    }

    #[test]
    fn least_squares_recovers_random_lines() {
        use rand::Rng;

        let mut rng = ::rand::thread_rng();
        for _ in 0..100 {
            let m = rng.gen_range(3, 12);
            let slope = 1.0 - 2.0 * rng.gen::<f64>();
            let intercept = 1.0 - 2.0 * rng.gen::<f64>();

            let mut data = vec![0.0; m * 2];
            let mut obs = vec![0.0; m];
            for i in 0..m {
                let x = i as f64;
                data[0 * m + i] = x;
                data[1 * m + i] = 1.0;
                obs[i] = slope * x + intercept;
            }
            let design = DenseMatrix::from_column_major(m, 2, data);
            let theta = lapacke_least_squares_qr(&design, &obs).unwrap();
            assert_close(slope, theta[0], 1e-8);
            assert_close(intercept, theta[1], 1e-8);
        }
    }

    #[test]
    fn svd_reconstructs_the_operand() {
        let a = DenseMatrix::from_row_major(2, 2, vec![
            1.0, -0.8,
            0.0, 1.0,
        ]);
        let svd = lapacke_svd(&a).unwrap();

        assert_eq!(svd.singular_values.len(), 2);
        assert!(svd.singular_values[0] >= svd.singular_values[1]);
        // det A = 1, and the singular values multiply to |det|
        let product: f64 = svd.singular_values.iter().product();
        assert_close(1.0, product, 1e-10);

        let rec = svd.reconstruct();
        for (got, want) in rec.data().iter().zip(a.data()) {
            assert_close(*want, *got, 1e-10);
        }
    }

    #[test]
    fn svd_of_rectangular_operand() {
        let a = DenseMatrix::from_row_major(3, 2, vec![
            1.0, 0.0,
            0.0, 2.0,
            0.0, 0.0,
        ]);
        let svd = lapacke_svd(&a).unwrap();
        assert_eq!((svd.u.rows(), svd.u.cols()), (3, 3));
        assert_eq!((svd.vt.rows(), svd.vt.cols()), (2, 2));
        assert_close(2.0, svd.singular_values[0], 1e-12);
        assert_close(1.0, svd.singular_values[1], 1e-12);

        let rec = svd.reconstruct();
        for (got, want) in rec.data().iter().zip(a.data()) {
            assert_close(*want, *got, 1e-10);
        }
    }
}
