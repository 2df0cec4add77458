//! Plain-text adjacency list.
//!
//! One line per label with at least one neighbor, ascending:
//! `<label> <count> <n1> <n2> ... <nN>`, neighbors ascending.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use la_core::Label;
use log::{debug, warn};
use thiserror::Error;

use crate::registry::AdjacencyRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Largest label written as a line head; neighbor lists are never
    /// filtered. `None` writes every label.
    pub max_label: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    pub lines: usize,
    pub skipped: usize,
}

pub fn format_line<L: Label>(label: L, neighbors: &BTreeSet<L>) -> String {
    let mut line = format!("{label} {}", neighbors.len());
    for n in neighbors {
        // Writing into a String cannot fail.
        let _ = write!(line, " {n}");
    }
    line
}

pub fn write_adjacency_list<L: Label, W: Write>(
    registry: &AdjacencyRegistry<L>,
    mut writer: W,
    opts: &WriteOptions,
) -> io::Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    for (label, neighbors) in registry.iter() {
        if let Some(max) = opts.max_label
            && label.to_u64() > max
        {
            warn!("label {label} exceeds max_label {max}, not written");
            summary.skipped += 1;
            continue;
        }

        debug!("label {label} has {} adjacent labels", neighbors.len());
        writeln!(writer, "{}", format_line(label, neighbors))?;
        summary.lines += 1;
    }

    writer.flush()?;
    Ok(summary)
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Parses an adjacency list back into `(label, neighbors)` lines, in file
/// order.
pub fn read_adjacency_list<R: BufRead>(reader: R) -> Result<Vec<(u64, Vec<u64>)>, ParseError> {
    let mut out = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let malformed = |message: String| ParseError::Malformed {
            line: lineno,
            message,
        };

        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<u64>()
                    .map_err(|_| malformed(format!("invalid number '{tok}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [label, count, neighbors @ ..] = values.as_slice() else {
            return Err(malformed("expected '<label> <count> ...'".to_string()));
        };
        if *count as usize != neighbors.len() {
            return Err(malformed(format!(
                "count {count} does not match {} neighbors",
                neighbors.len()
            )));
        }

        out.push((*label, neighbors.to_vec()));
    }

    Ok(out)
}
