/// Metric extraction from simulator logs.
///
/// The simulator's statistics block looks like:
///
/// ```text
/// Trace file: ./trace/fin1-mixed.trace
/// Total read (MB): 1536
/// Total flash write (pages): 207872
/// real	0m12.34s
/// ```
///
/// Every extractor returns one value per matching line, in log order.
use crate::scan::LogFile;
use regex::Regex;
use std::sync::LazyLock;

/// `<minutes>m<seconds>s` as printed by the shell `time` keyword.
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)m(\d+(?:\.\d+)?)s$").unwrap());

const TIME_LABEL: &str = "real";
const TRACE_LABEL: &str = "Trace file";

/// One output column and how to pull it out of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Trace,
    TotalRead,
    TotalWrite,
    Time,
    NandRead,
    NandWrite,
    NandCopyback,
    NandErase,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Trace => "trace",
            Column::TotalRead => "total_read",
            Column::TotalWrite => "total_write",
            Column::Time => "time_seconds",
            Column::NandRead => "nand_read",
            Column::NandWrite => "nand_write",
            Column::NandCopyback => "nand_copyback",
            Column::NandErase => "nand_erase",
        }
    }

    /// Extract this column's values from the log.
    pub fn extract(self, log: &LogFile) -> Result<Vec<String>, ExtractError> {
        let (label, index) = match self {
            Column::Time => return extract_time(log),
            Column::Trace => return Ok(extract_trace(log)),
            Column::TotalRead => ("Total read", 3),
            Column::TotalWrite => ("Total write", 3),
            Column::NandRead => ("Total flash read", 4),
            Column::NandWrite => ("Total flash write", 4),
            Column::NandCopyback => ("Total flash copyback", 4),
            Column::NandErase => ("Total flash erase", 4),
        };
        Ok(extract_field(log, label, index))
    }
}

/// Token `index` (single-space split) of every line containing `label`.
///
/// Lines too short to have that token are skipped.
pub fn extract_field(log: &LogFile, label: &str, index: usize) -> Vec<String> {
    let mut values = Vec::new();
    for (line_no, line) in log.matching(label) {
        match line.trim().split(' ').nth(index) {
            Some(token) => values.push(token.to_string()),
            None => tracing::warn!(line_no, label, index, "matched line has no such token, skipping"),
        }
    }
    tracing::debug!(label, count = values.len(), "extracted field");
    values
}

/// Total seconds from every `real` timing line.
///
/// A `real` line that is not `real<TAB><m>m<s>s` is an error.
pub fn extract_time(log: &LogFile) -> Result<Vec<String>, ExtractError> {
    let mut values = Vec::new();
    for (line_no, line) in log.matching(TIME_LABEL) {
        let secs = parse_real_line(line).ok_or_else(|| ExtractError::MalformedTime {
            line_no,
            line: line.to_string(),
        })?;
        values.push(format_seconds(secs));
    }
    tracing::debug!(count = values.len(), "extracted time");
    Ok(values)
}

/// Parse `real\t1m5.00s` into 65.0.
pub fn parse_real_line(line: &str) -> Option<f64> {
    let field = line.trim().split('\t').nth(1)?;
    let caps = DURATION.captures(field.trim())?;
    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

/// Significant digits the original report printed for float columns.
const SIG_DIGITS: usize = 12;

/// Render like `%.12g`, keeping a fractional part on whole numbers
/// (`65.0`, `12.34`, `61.029`).
pub fn format_seconds(secs: f64) -> String {
    if !secs.is_finite() {
        return secs.to_string();
    }
    // Exponent after rounding to SIG_DIGITS decides fixed vs. scientific.
    let sci = format!("{:.*e}", SIG_DIGITS - 1, secs);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if exp < -4 || exp >= SIG_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs());
    }

    let decimals = (SIG_DIGITS as i32 - 1 - exp) as usize;
    let fixed = format!("{secs:.decimals$}");
    let fixed = trim_fraction(&fixed);
    if fixed.contains('.') {
        fixed.to_string()
    } else {
        format!("{fixed}.0")
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Trace identifier from every `Trace file` line.
///
/// `Trace file: ./trace/fin1-mixed.trace` yields `fin1`: the third path
/// segment, cut at the first `.` and then the first `-`.
pub fn extract_trace(log: &LogFile) -> Vec<String> {
    let mut values = Vec::new();
    for (line_no, line) in log.matching(TRACE_LABEL) {
        match trace_id(line) {
            Some(id) => values.push(id.to_string()),
            None => tracing::warn!(line_no, "trace line has no recognizable path, skipping"),
        }
    }
    tracing::debug!(count = values.len(), "extracted trace");
    values
}

fn trace_id(line: &str) -> Option<&str> {
    let path = line.trim().split(' ').nth(2)?;
    let segment = path.split('/').nth(2)?;
    let stem = segment.split('.').next()?;
    stem.split('-').next()
}

/// Errors from metric extraction.
#[derive(Debug)]
pub enum ExtractError {
    MalformedTime { line_no: usize, line: String },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::MalformedTime { line_no, line } => {
                write!(f, "malformed timing line {line_no}: {line:?}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}
