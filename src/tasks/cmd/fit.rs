//! Least-squares fits of line and quadratic models to (x, y) samples.
//!
//! The line model goes through the normal equations (AᵀA θ = Aᵀy, solved
//! with dgesv); the quadratic model solves min ‖Aθ − y‖₂ directly with
//! dgels. Rank deficiency is not checked here beyond the routines' own
//! status codes.

use std::io::Write;
use std::path::Path;

use numlab_fs_util as fsx;
use numlab_linalg::{cblas_normal_equations, lapacke_least_squares_qr, lapacke_linear_solve};
use numlab_matrix::DenseMatrix;
use numlab_matrix_io as io;

use crate::report;
use crate::FailResult;

/// Samples used by the line fit when no file is given.
pub const DEMO_LINE_POINTS: &[(f64, f64)] = &[
    (1.0, 2.0), (2.0, 2.0), (3.0, 4.0), (4.0, 5.0),
];

/// Samples used by the quadratic fit when no file is given.
pub const DEMO_QUADRATIC_POINTS: &[(f64, f64)] = &[
    (0.0, 1.2), (1.0, 2.0), (2.0, 2.9), (3.0, 4.1), (4.0, 5.8), (5.0, 8.2),
];

/// Builds the column-major design matrix whose columns are descending
/// powers of x, ending with the constant column: degree 2 gives [x² x 1].
pub fn design_matrix(points: &[(f64, f64)], degree: usize) -> DenseMatrix {
    let m = points.len();
    let n = degree + 1;
    let mut data = vec![0.0; m * n];
    for (i, &(x, _)) in points.iter().enumerate() {
        for j in 0..n {
            data[j * m + i] = x.powi((n - 1 - j) as i32);
        }
    }
    DenseMatrix::from_column_major(m, n, data)
}

fn observations(points: &[(f64, f64)]) -> Vec<f64> {
    points.iter().map(|&(_, y)| y).collect()
}

pub fn sum_squared_error(points: &[(f64, f64)], predict: impl Fn(f64) -> f64) -> f64 {
    points.iter().map(|&(x, y)| {
        let err = predict(x) - y;
        err * err
    }).sum()
}

fn load_points(path: Option<&Path>, default: &[(f64, f64)]) -> FailResult<Vec<(f64, f64)>> {
    match path {
        Some(path) => io::read_points(fsx::open_text(path)?),
        None => Ok(default.to_vec()),
    }
}

/// y = a·x + b by the normal equations.
pub fn run_linear<W: Write>(points_path: Option<&Path>, writer: &mut W) -> FailResult<()> {
    let points = load_points(points_path, DEMO_LINE_POINTS)?;
    trace!("fitting a line to {} samples", points.len());

    let design = design_matrix(&points, 1);
    let (ata, aty) = cblas_normal_equations(&design, &observations(&points));
    let theta = lapacke_linear_solve(&ata, &aty)?;
    let (a, b) = (theta[0], theta[1]);

    writeln!(writer, "Least-squares line (normal equations):")?;
    writeln!(writer, "y = a*x + b")?;
    writeln!(writer, "a = {:.10}", a)?;
    writeln!(writer, "b = {:.10}", b)?;
    writeln!(writer)?;

    let predict = |x: f64| a * x + b;
    report::write_fit_table(writer, &points, predict)?;
    report::write_fit_quality(writer, &points, predict)?;
    Ok(())
}

/// y = a·x² + b·x + c by QR (dgels), without forming the normal equations.
pub fn run_quadratic<W: Write>(
    points_path: Option<&Path>,
    csv_path: &Path,
    writer: &mut W,
) -> FailResult<()> {
    let points = load_points(points_path, DEMO_QUADRATIC_POINTS)?;
    trace!("fitting a quadratic to {} samples", points.len());

    let design = design_matrix(&points, 2);
    let theta = lapacke_least_squares_qr(&design, &observations(&points))?;
    let (a, b, c) = (theta[0], theta[1], theta[2]);

    writeln!(writer, "Least-squares quadratic (dgels/QR):")?;
    writeln!(writer, "y = a*x^2 + b*x + c")?;
    writeln!(writer, "a = {:.10}", a)?;
    writeln!(writer, "b = {:.10}", b)?;
    writeln!(writer, "c = {:.10}", c)?;
    writeln!(writer)?;

    let predict = |x: f64| a * x * x + b * x + c;
    report::write_fit_table(writer, &points, predict)?;
    report::write_fit_quality(writer, &points, predict)?;

    report::write_fit_csv(fsx::create(csv_path)?, &points, predict, 200)?;
    writeln!(writer)?;
    writeln!(writer, "wrote {} for plotting", csv_path.display())?;
    Ok(())
}
