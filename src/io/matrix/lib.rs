/* ************************************************************************ **
** This file is part of numlab, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                  **
** ************************************************************************ */

//! Text formats used by the numlab task programs.
//!
//! All matrix text is row-major: a header line of dimensions followed by
//! whitespace-separated entries, one matrix row per line by convention
//! (though any whitespace works on input).

#[macro_use]
extern crate failure;

use std::io::{Read, Write};

use numlab_matrix::{DenseMatrix, Layout};

pub type FailResult<T> = Result<T, failure::Error>;

/// The stream ran dry, or a token would not parse as a double, where a
/// matrix entry was expected.
#[derive(Debug, Fail)]
#[fail(display = "matrix {}: missing or unparsable entry at ({}, {})", name, row, col)]
pub struct MalformedInputError {
    pub name: String,
    pub row: usize,
    pub col: usize,
}

/// A declared dimension is missing, non-positive, or inconsistent.
#[derive(Debug, Fail)]
#[fail(display = "invalid dimensions: {}", reason)]
pub struct InvalidDimensionError {
    pub reason: String,
}

fn malformed(name: &str, row: usize, col: usize) -> failure::Error {
    MalformedInputError { name: name.to_string(), row, col }.into()
}

fn invalid_dimension(reason: String) -> failure::Error {
    InvalidDimensionError { reason }.into()
}

fn read_dimension<'a, I>(tokens: &mut I, name: &str) -> FailResult<usize>
where I: Iterator<Item = &'a str>,
{
    let token = match tokens.next() {
        Some(token) => token,
        None => return Err(invalid_dimension(format!("dimension {} is missing", name))),
    };
    match token.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value as usize),
        Ok(value) => Err(invalid_dimension(
            format!("dimension {} must be positive (got {})", name, value))),
        Err(_) => Err(invalid_dimension(
            format!("dimension {} is not an integer: '{}'", name, token))),
    }
}

/// Reads `rows * cols` doubles in row-major order from a token stream.
///
/// Fails with [`MalformedInputError`] carrying the matrix name and the
/// (row, col) coordinate of the first entry that could not be read.
pub fn read_matrix<'a, I>(tokens: &mut I, rows: usize, cols: usize, name: &str) -> FailResult<DenseMatrix>
where I: Iterator<Item = &'a str>,
{
    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            let token = tokens.next().ok_or_else(|| malformed(name, i, j))?;
            let value = token.parse::<f64>().map_err(|_| malformed(name, i, j))?;
            data.push(value);
        }
    }
    Ok(DenseMatrix::from_row_major(rows, cols, data))
}

/// Reads a product-pipeline input: an `m n l` header, then A (m×n),
/// then B (n×l).
///
/// The shared dimension cannot mismatch here; the header alone fixes both
/// shapes before any entry is read.
pub fn read_product_input<R: Read>(mut reader: R) -> FailResult<(DenseMatrix, DenseMatrix)> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let m = read_dimension(&mut tokens, "m")?;
    let n = read_dimension(&mut tokens, "n")?;
    let l = read_dimension(&mut tokens, "l")?;

    let a = read_matrix(&mut tokens, m, n, "A")?;
    let b = read_matrix(&mut tokens, n, l, "B")?;
    Ok((a, b))
}

/// Reads a single matrix file: a `rows cols` header, then the entries.
pub fn read_single_matrix<R: Read>(mut reader: R) -> FailResult<DenseMatrix> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let rows = read_dimension(&mut tokens, "rows")?;
    let cols = read_dimension(&mut tokens, "cols")?;
    read_matrix(&mut tokens, rows, cols, "A")
}

/// Reads whitespace-separated (x, y) samples, two doubles per sample.
///
/// An empty sample set is rejected; a dangling x without its y is
/// malformed.
pub fn read_points<R: Read>(mut reader: R) -> FailResult<Vec<(f64, f64)>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let mut points = Vec::new();
    loop {
        let x = match tokens.next() {
            None => break,
            Some(token) => token.parse::<f64>()
                .map_err(|_| malformed("points", points.len(), 0))?,
        };
        let y = tokens.next()
            .ok_or_else(|| malformed("points", points.len(), 1))?
            .parse::<f64>()
            .map_err(|_| malformed("points", points.len(), 1))?;
        points.push((x, y));
    }
    if points.is_empty() {
        return Err(invalid_dimension("no data points".to_string()));
    }
    Ok(points)
}

/// Writes a row-major matrix as a `rows cols` header plus one line per row.
///
/// `Display` on f64 prints the shortest digits that parse back to the same
/// value, so the emitted text round-trips.
pub fn write_matrix<W: Write>(mut writer: W, matrix: &DenseMatrix) -> FailResult<()> {
    assert_eq!(matrix.layout(), Layout::RowMajor, "text emission is defined on row-major data");
    writeln!(writer, "{} {}", matrix.rows(), matrix.cols())?;
    for i in 0..matrix.rows() {
        for j in 0..matrix.cols() {
            if j > 0 {
                write!(writer, " ")?;
            }
            write!(writer, "{}", matrix[(i, j)])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_input_happy_path() {
        let text = "2 3 2\n1 2 3\n1 1 1\n2 3\n3 4\n5 6\n";
        let (a, b) = read_product_input(text.as_bytes()).unwrap();
        assert_eq!((a.rows(), a.cols()), (2, 3));
        assert_eq!((b.rows(), b.cols()), (3, 2));
        assert_eq!(a[(0, 1)], 2.0);
        assert_eq!(b[(2, 1)], 6.0);
    }

    #[test]
    fn nonpositive_dimension_is_rejected_before_entries() {
        let err = read_product_input("0 3 2\n1 2 3\n".as_bytes()).unwrap_err();
        let err = err.downcast_ref::<InvalidDimensionError>().expect("wrong error type");
        assert!(err.reason.contains("m"));
    }

    #[test]
    fn missing_dimension_is_rejected() {
        let err = read_product_input("2 3".as_bytes()).unwrap_err();
        assert!(err.downcast_ref::<InvalidDimensionError>().is_some());
    }

    #[test]
    fn truncated_entries_report_matrix_and_coordinate() {
        // B is declared 3x2 but only two of its six entries are present
        let text = "2 3 2\n1 2 3\n1 1 1\n2 3\n";
        let err = read_product_input(text.as_bytes()).unwrap_err();
        let err = err.downcast_ref::<MalformedInputError>().expect("wrong error type");
        assert_eq!(err.name, "B");
        assert_eq!((err.row, err.col), (1, 0));
    }

    #[test]
    fn unparsable_entry_reports_coordinate() {
        let text = "2 2 1\n1 2\n3 oops\n5\n6\n";
        let err = read_product_input(text.as_bytes()).unwrap_err();
        let err = err.downcast_ref::<MalformedInputError>().expect("wrong error type");
        assert_eq!(err.name, "A");
        assert_eq!((err.row, err.col), (1, 1));
    }

    #[test]
    fn write_then_read_round_trips() {
        let m = DenseMatrix::from_row_major(2, 2, vec![0.1 + 0.2, -1.5, 1e-17, 3.0]);
        let mut out = Vec::new();
        write_matrix(&mut out, &m).unwrap();

        let back = read_single_matrix(out.as_slice()).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn points_happy_path() {
        let points = read_points("1 2\n2 2\n3 4\n4 5\n".as_bytes()).unwrap();
        assert_eq!(points, vec![(1.0, 2.0), (2.0, 2.0), (3.0, 4.0), (4.0, 5.0)]);
    }

    #[test]
    fn dangling_sample_is_malformed() {
        let err = read_points("1 2\n3\n".as_bytes()).unwrap_err();
        let err = err.downcast_ref::<MalformedInputError>().expect("wrong error type");
        assert_eq!((err.row, err.col), (1, 1));
    }

    #[test]
    fn empty_sample_set_is_rejected() {
        let err = read_points("".as_bytes()).unwrap_err();
        assert!(err.downcast_ref::<InvalidDimensionError>().is_some());
    }
}
