//! Result formatting, shared by every pipeline.
//!
//! The same formatting logic serves both the console and file
//! destinations; callers hand in any `Write`.

use std::io::Write;

use numlab_linalg::Svd;
use numlab_matrix::DenseMatrix;

use crate::cmd::fit::sum_squared_error;
use crate::FailResult;

/// Fixed human-readable precision, aligned columns.
pub fn write_matrix_fixed<W: Write>(writer: &mut W, matrix: &DenseMatrix) -> FailResult<()> {
    for i in 0..matrix.rows() {
        for j in 0..matrix.cols() {
            if j > 0 {
                write!(writer, " ")?;
            }
            write!(writer, "{:>14.8}", matrix[(i, j)])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Largest absolute elementwise difference between two same-shaped
/// matrices, regardless of their layouts.
pub fn max_abs_difference(a: &DenseMatrix, b: &DenseMatrix) -> f64 {
    assert_eq!((a.rows(), a.cols()), (b.rows(), b.cols()), "shape mismatch");
    let mut max = 0.0f64;
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            max = max.max((a[(i, j)] - b[(i, j)]).abs());
        }
    }
    max
}

/// Singular values, the factors, the reconstruction U·Σ·Vᵀ, and the
/// worst-case reconstruction error against the original operand.
pub fn write_svd_report<W: Write>(writer: &mut W, operand: &DenseMatrix, svd: &Svd) -> FailResult<()> {
    writeln!(writer, "Singular values:")?;
    for (i, value) in svd.singular_values.iter().enumerate() {
        writeln!(writer, "  s[{}] = {:.8}", i, value)?;
    }

    writeln!(writer)?;
    writeln!(writer, "U ({}x{}):", svd.u.rows(), svd.u.cols())?;
    write_matrix_fixed(writer, &svd.u)?;

    writeln!(writer)?;
    writeln!(writer, "V^T ({}x{}):", svd.vt.rows(), svd.vt.cols())?;
    write_matrix_fixed(writer, &svd.vt)?;

    let reconstructed = svd.reconstruct();
    writeln!(writer)?;
    writeln!(writer, "Reconstruction U*Sigma*V^T:")?;
    write_matrix_fixed(writer, &reconstructed)?;

    writeln!(writer)?;
    writeln!(writer, "max |A_rec - A| = {:e}", max_abs_difference(operand, &reconstructed))?;
    Ok(())
}

/// One line per sample: x, observed y, predicted y, signed error.
pub fn write_fit_table<W: Write>(
    writer: &mut W,
    points: &[(f64, f64)],
    predict: impl Fn(f64) -> f64,
) -> FailResult<()> {
    writeln!(writer, "Samples and predictions:")?;
    for &(x, y) in points {
        let y_hat = predict(x);
        writeln!(writer, "x={}  y={}  y_hat={:.10}  err={:.10}", x, y, y_hat, y_hat - y)?;
    }
    Ok(())
}

/// Sum and mean of squared errors over the samples.
pub fn write_fit_quality<W: Write>(
    writer: &mut W,
    points: &[(f64, f64)],
    predict: impl Fn(f64) -> f64,
) -> FailResult<()> {
    let sse = sum_squared_error(points, predict);
    writeln!(writer)?;
    writeln!(writer, "SSE = {:.10}", sse)?;
    writeln!(writer, "MSE = {:.10}", sse / points.len() as f64)?;
    Ok(())
}

/// Plotting table: the original samples next to the fitted curve sampled
/// on an even grid across the data's x range.
///
/// Sample cells are left empty once the samples run out, so the file
/// stays rectangular for spreadsheet/Octave import.
pub fn write_fit_csv<W: Write>(
    mut writer: W,
    points: &[(f64, f64)],
    predict: impl Fn(f64) -> f64,
    steps: usize,
) -> FailResult<()> {
    assert!(steps >= 2, "need at least two grid steps");

    let x_min = points.iter().map(|&(x, _)| x).fold(::std::f64::INFINITY, f64::min);
    let x_max = points.iter().map(|&(x, _)| x).fold(::std::f64::NEG_INFINITY, f64::max);

    writeln!(writer, "x_pts,y_pts,x_fit,y_fit")?;
    for i in 0..steps {
        let t = i as f64 / (steps - 1) as f64;
        let x_fit = x_min + t * (x_max - x_min);
        let y_fit = predict(x_fit);

        match points.get(i) {
            Some(&(x, y)) => write!(writer, "{},{},", x, y)?,
            None => write!(writer, ",,")?,
        }
        writeln!(writer, "{},{}", x_fit, y_fit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_csv_shape() {
        let points = [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0)];
        let mut out = Vec::new();
        write_fit_csv(&mut out, &points, |x| x * x + 1.0, 10).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x_pts,y_pts,x_fit,y_fit");
        assert_eq!(lines.len(), 11);
        assert!(lines[1].starts_with("0,1,0,"));
        // rows past the samples leave the point columns empty
        assert!(lines[5].starts_with(",,"));
        // the grid ends exactly at the data's right edge
        assert!(lines[10].contains(",2,"));
    }

    #[test]
    fn max_abs_difference_across_layouts() {
        let a = DenseMatrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let mut shifted = a.to_column_major();
        shifted.data_mut()[2] = 2.5; // element (0, 1)
        assert_eq!(max_abs_difference(&a, &shifted), 0.5);
    }
}
