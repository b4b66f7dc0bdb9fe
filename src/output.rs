use crate::error::{Error, Result};
use crate::louvain::LouvainResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn fmt_sig(v: f64, sig: usize) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let digits_before = v.abs().log10().floor() as i32 + 1;
    let decimals = (sig as i32 - digits_before).max(0) as usize;

    let mut s = format!("{:.*}", decimals, v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn format_started_at(start_time: SystemTime) -> String {
    let dt: chrono::DateTime<chrono::Local> = start_time.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn io_err(path: &Path, e: std::io::Error) -> Error {
    Error::Io(format!("Error writing file '{}': {}", path.display(), e))
}

/// Writes `result` as `node_id group` lines (both 1-based) under a `#` header.
pub fn write_partition(
    path: &Path,
    result: &LouvainResult,
    start_time: SystemTime,
    elapsed: Duration,
) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::Io(format!("Error opening file '{}': {}", path.display(), e)))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# genlouvain v{}", VERSION).map_err(|e| io_err(path, e))?;
    writeln!(w, "# started at {}", format_started_at(start_time)).map_err(|e| io_err(path, e))?;
    writeln!(w, "# completed in {} s", elapsed.as_secs_f64()).map_err(|e| io_err(path, e))?;
    writeln!(
        w,
        "# partitioned into {} groups over {} levels",
        result.group_count, result.levels
    )
    .map_err(|e| io_err(path, e))?;
    writeln!(w, "# quality {}", fmt_sig(result.quality, 6)).map_err(|e| io_err(path, e))?;
    writeln!(w, "# node_id group").map_err(|e| io_err(path, e))?;

    for (node, &group) in result.assignment.iter().enumerate() {
        writeln!(w, "{} {}", node + 1, group + 1).map_err(|e| io_err(path, e))?;
    }

    w.flush().map_err(|e| io_err(path, e))
}
