use crate::column::CscMatrix;
use crate::error::{Error, Result};
use crate::matrix::ModularityMatrix;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// Entries of a matrix file, 0-based, duplicates already summed.
#[derive(Debug, Clone, Default)]
pub struct ParsedMatrix {
    pub declared_size: Option<usize>,
    pub entries: FxHashMap<(u32, u32), f64>,
}

impl ParsedMatrix {
    /// Size is the declared `*Nodes` count, or the largest index seen.
    pub fn size(&self) -> usize {
        let seen = self
            .entries
            .keys()
            .map(|&(r, c)| r.max(c) as usize + 1)
            .max()
            .unwrap_or(0);
        self.declared_size.unwrap_or(0).max(seen)
    }

    pub fn into_matrix(self) -> Result<ModularityMatrix> {
        let n = self.size();
        if let Some(declared) = self.declared_size {
            if declared < n {
                return Err(Error::Parse(format!(
                    "entries reference node {} but only {} nodes were declared",
                    n, declared
                )));
            }
        }
        let triplets: Vec<(u32, u32, f64)> = self
            .entries
            .into_iter()
            .map(|((r, c), v)| (r, c, v))
            .collect();
        ModularityMatrix::sparse(CscMatrix::from_triplets(n, n, &triplets)?)
    }
}

enum Section {
    Entries,
    Ignore,
}

fn first_word_lower(line: &str) -> String {
    line.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn parse_index(token: Option<&str>, line: &str) -> Result<u32> {
    let one_based = token
        .ok_or_else(|| Error::Parse(format!("Can't parse entry from line '{}'", line)))?
        .parse::<u32>()
        .map_err(|_| Error::Parse(format!("Can't parse entry from line '{}'", line)))?;
    if one_based == 0 {
        return Err(Error::Parse(format!(
            "Node indices are 1-based, got 0 in line '{}'",
            line
        )));
    }
    Ok(one_based - 1)
}

fn parse_entry_line(line: &str) -> Result<(u32, u32, f64)> {
    let mut parts = line.split_whitespace();
    let r = parse_index(parts.next(), line)?;
    let c = parse_index(parts.next(), line)?;
    let v = parts
        .next()
        .ok_or_else(|| Error::Parse(format!("Missing value in line '{}'", line)))?
        .parse::<f64>()
        .map_err(|_| Error::Parse(format!("Can't parse value from line '{}'", line)))?;
    if !v.is_finite() {
        return Err(Error::Parse(format!("Non-finite value in line '{}'", line)));
    }
    Ok((r, c, v))
}

fn parse_nodes_heading(line: &str) -> Result<Option<usize>> {
    match line.split_whitespace().nth(1) {
        Some(n) => n
            .parse::<usize>()
            .map(Some)
            .map_err(|_| Error::Parse(format!("Can't parse node count from line '{}'", line))),
        None => Ok(None),
    }
}

/// Reads 1-based `row col value` triplets.
///
/// Lines starting with `#` are comments. `*Nodes N` declares the matrix size,
/// `*Entries` or `*Matrix` starts the triplet section (the default), and any
/// other `*` heading starts a section that is skipped.
pub fn parse_matrix_str(content: &str) -> Result<ParsedMatrix> {
    let mut parsed = ParsedMatrix::default();
    let mut section = Section::Entries;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('*') {
            let heading = first_word_lower(line);
            section = match heading.as_str() {
                "*nodes" | "*vertices" => {
                    if let Some(n) = parse_nodes_heading(line)? {
                        parsed.declared_size = Some(n);
                    }
                    Section::Ignore
                }
                "*entries" | "*matrix" => Section::Entries,
                _ => Section::Ignore,
            };
            continue;
        }

        match section {
            Section::Ignore => {}
            Section::Entries => {
                let (r, c, v) = parse_entry_line(line)?;
                if v == 0.0 {
                    continue;
                }
                *parsed.entries.entry((r, c)).or_insert(0.0) += v;
            }
        }
    }

    Ok(parsed)
}

/// Reads a matrix file into a sparse [`ModularityMatrix`].
pub fn parse_matrix_file(path: &Path) -> Result<ModularityMatrix> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("Error reading file '{}': {}", path.display(), e)))?;

    let parsed = parse_matrix_str(&content)?;
    if parsed.size() == 0 {
        return Err(Error::Parse("Matrix is empty".to_string()));
    }
    parsed.into_matrix()
}
