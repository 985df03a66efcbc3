//! Minimal FASTA reader.
//!
//! The identifier is the text after `>` up to the first whitespace;
//! sequence lines are concatenated with surrounding whitespace removed.
//! Empty lines are skipped. Descriptions after the identifier are ignored.

use std::io::{self, BufRead};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("duplicated identifier in FASTA input: {0}")]
    DuplicateIdentifier(String),
    #[error("empty FASTA descriptor in line: {0:?}")]
    EmptyDescriptor(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Reads FASTA records into parallel lists of identifiers and raw sequence
/// bytes, in file order.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<(Vec<String>, Vec<Vec<u8>>), FastaError> {
    let mut names: Vec<String> = Vec::new();
    let mut seqs: Vec<Vec<u8>> = Vec::new();
    let mut cur_id: Option<String> = None;
    let mut cur_seq: Vec<u8> = Vec::new();

    let mut flush = |cur_id: &mut Option<String>,
                     cur_seq: &mut Vec<u8>|
     -> Result<(), FastaError> {
        if let Some(id) = cur_id.take() {
            if names.contains(&id) {
                return Err(FastaError::DuplicateIdentifier(id));
            }
            names.push(id);
            seqs.push(std::mem::take(cur_seq));
        }
        Ok(())
    };

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('>') {
            flush(&mut cur_id, &mut cur_seq)?;
            let id = rest
                .split_whitespace()
                .next()
                .ok_or_else(|| FastaError::EmptyDescriptor(line.clone()))?;
            cur_id = Some(id.to_string());
        } else {
            cur_seq.extend_from_slice(line.trim().as_bytes());
        }
    }
    flush(&mut cur_id, &mut cur_seq)?;

    Ok((names, seqs))
}
