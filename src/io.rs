//! Text I/O for labelled distance matrices.
//!
//! The on-disk format is one row per taxon: the label padded to the widest
//! name, then the lower-triangular entries `get(i, j)` for `j < i`,
//! space-separated at fixed precision. Row order is taxon order. The reader
//! is the exact inverse and feeds the standalone `nj` binary.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::num::ParseFloatError;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use itertools::Itertools;
use thiserror::Error;

use crate::matrix::TriangularMatrix;
use crate::taxa::{TaxonSet, TaxonSetError};

#[derive(Debug, Error)]
pub enum MatrixParseError {
    #[error("row {row}: expected {expected} values, found {found}")]
    WrongValueCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: invalid value: {source}")]
    InvalidValue {
        row: usize,
        #[source]
        source: ParseFloatError,
    },
    #[error(transparent)]
    TaxonSet(#[from] TaxonSetError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes the labelled lower-triangular matrix with `precision` decimal
/// places per entry.
///
/// A label/matrix dimension mismatch is caller misuse and reported as an
/// `InvalidInput` error.
pub fn write_labelled_matrix<W: Write>(
    out: &mut W,
    labels: &[String],
    m: &TriangularMatrix,
    precision: usize,
) -> io::Result<()> {
    if labels.len() != m.n() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "number of labels ({}) differs from the number of rows ({})",
                labels.len(),
                m.n()
            ),
        ));
    }

    let label_width = labels.iter().map(|s| s.len()).max().unwrap_or(0);

    for (i, label) in labels.iter().enumerate() {
        let row = (0..i)
            .map(|j| format!("{:.precision$}", m.get(i, j)))
            .join(" ");
        if row.is_empty() {
            writeln!(out, "{label:<label_width$}")?;
        } else {
            writeln!(out, "{label:<label_width$} {row}")?;
        }
    }

    out.flush()
}

/// Parses a labelled lower-triangular matrix: row `i` holds a taxon name
/// followed by `i` distances. Returns the taxa in row order plus the
/// matrix, all rows active.
pub fn read_distance_matrix<R: BufRead>(
    reader: R,
) -> Result<(TaxonSet, TriangularMatrix), MatrixParseError> {
    let mut names: Vec<String> = Vec::new();
    let mut data: Vec<f64> = Vec::new();

    let mut i = 0;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        // A non-empty line always yields a first field
        let name = fields.next().expect("non-empty line");
        names.push(name.to_string());

        let values: Vec<&str> = fields.collect();
        if values.len() != i {
            return Err(MatrixParseError::WrongValueCount {
                row: i,
                expected: i,
                found: values.len(),
            });
        }
        for v in values {
            data.push(
                v.parse::<f64>()
                    .map_err(|source| MatrixParseError::InvalidValue { row: i, source })?,
            );
        }
        i += 1;
    }

    let taxa = TaxonSet::new(names)?;
    let m = TriangularMatrix::from_raw(i, data);
    Ok((taxa, m))
}

/// Opens `path` for buffered writing; a `.gz` suffix gets gzip compression
/// on the way out.
pub fn open_output<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Write>> {
    let p = path.as_ref();
    let file = File::create(p)?;
    if p.to_string_lossy().ends_with(".gz") {
        Ok(Box::new(BufWriter::new(GzEncoder::new(
            file,
            Compression::default(),
        ))))
    } else {
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_write_labelled_matrix() {
        let mut m = TriangularMatrix::new(3);
        m.set(1, 0, 0.25);
        m.set(2, 0, 0.5);
        m.set(2, 1, 0.75);

        let mut out = Vec::new();
        write_labelled_matrix(&mut out, &labels(&["A", "Bee", "C"]), &m, 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "A  \nBee 0.25\nC   0.50 0.75\n");
    }

    #[test]
    fn test_write_rejects_label_mismatch() {
        let m = TriangularMatrix::new(3);
        let mut out = Vec::new();
        let err = write_labelled_matrix(&mut out, &labels(&["A", "B"]), &m, 2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_round_trip() {
        let mut m = TriangularMatrix::new(4);
        let mut v = 0.1;
        for i in 0..4 {
            for j in 0..i {
                m.set(i, j, v);
                v += 0.05;
            }
        }
        let names = labels(&["A", "B", "C", "D"]);

        let mut out = Vec::new();
        write_labelled_matrix(&mut out, &names, &m, 6).unwrap();
        let (taxa, parsed) = read_distance_matrix(&out[..]).unwrap();

        assert_eq!(taxa.names(), &names[..]);
        assert_eq!(parsed.n(), 4);
        for i in 0..4 {
            for j in 0..i {
                assert!((parsed.get(i, j) - m.get(i, j)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_read_empty_input() {
        let (taxa, m) = read_distance_matrix(&b""[..]).unwrap();
        assert!(taxa.is_empty());
        assert_eq!(m.n(), 0);
    }

    #[test]
    fn test_read_rejects_short_row() {
        let input = b"A\nB 0.5\nC 0.5\n" as &[u8];
        let err = read_distance_matrix(input).unwrap_err();
        assert!(matches!(
            err,
            MatrixParseError::WrongValueCount {
                row: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_read_rejects_bad_float() {
        let input = b"A\nB zero\n" as &[u8];
        let err = read_distance_matrix(input).unwrap_err();
        assert!(matches!(err, MatrixParseError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_read_rejects_duplicate_taxon() {
        let input = b"A\nA 0.5\n" as &[u8];
        let err = read_distance_matrix(input).unwrap_err();
        assert!(matches!(err, MatrixParseError::TaxonSet(_)));
    }
}
