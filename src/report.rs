//! Report assembly: extract each column of a layout, zip the columns into
//! rows, and write them out as CSV.
//!
//! Rows are aligned purely by position. The Nth match of every metric
//! forms the Nth row, and the shortest column decides the row count.

use crate::csv_out;
use crate::extract::{Column, ExtractError};
use crate::scan::LogFile;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `<ftl>-para-j<job>.out`
static PARA_LOG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<ftl>.+)-para-j(?P<job>.+)\.out$").unwrap());

/// Column order for each CLI form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Single log, explicit input and output paths.
    Data,
    /// Parallel-job run; leads with the trace identifier.
    Para,
}

impl Layout {
    pub fn columns(self) -> &'static [Column] {
        const DATA: &[Column] = &[
            Column::TotalRead,
            Column::TotalWrite,
            Column::Time,
            Column::NandRead,
            Column::NandWrite,
            Column::NandCopyback,
            Column::NandErase,
        ];
        const PARA: &[Column] = &[
            Column::Trace,
            Column::TotalRead,
            Column::TotalWrite,
            Column::Time,
            Column::NandRead,
            Column::NandWrite,
            Column::NandCopyback,
            Column::NandErase,
        ];
        match self {
            Layout::Data => DATA,
            Layout::Para => PARA,
        }
    }
}

/// Output rows, one value per layout column.
pub type Table = Vec<Vec<String>>;

/// Zip columns positionally, truncating to the shortest.
pub fn zip_columns(columns: &[Vec<String>]) -> Table {
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    (0..rows)
        .map(|i| columns.iter().map(|col| col[i].clone()).collect())
        .collect()
}

/// Extract every column of `layout` from `log` and assemble the table.
///
/// Mismatched column lengths are logged and truncated, or rejected with
/// `ReportError::Misaligned` when `strict` is set.
pub fn build_table(log: &LogFile, layout: Layout, strict: bool) -> Result<Table, ReportError> {
    let mut extracted = Vec::with_capacity(layout.columns().len());
    for &column in layout.columns() {
        extracted.push(column.extract(log)?);
    }

    let counts: Vec<(&'static str, usize)> = layout
        .columns()
        .iter()
        .zip(&extracted)
        .map(|(c, values)| (c.name(), values.len()))
        .collect();
    let aligned = counts.windows(2).all(|w| w[0].1 == w[1].1);
    if !aligned {
        if strict {
            return Err(ReportError::Misaligned { counts });
        }
        tracing::warn!(counts = ?counts, "metric counts differ, truncating to shortest");
    }

    Ok(zip_columns(&extracted))
}

/// Convert the log at `input` into a CSV at `output`. Returns the row count.
pub fn convert(
    input: &Path,
    output: &Path,
    layout: Layout,
    strict: bool,
) -> Result<usize, ReportError> {
    let log = LogFile::open(input).map_err(|e| ReportError::Read {
        path: input.to_path_buf(),
        source: e,
    })?;
    if log.is_empty() {
        tracing::warn!(input = %input.display(), "log file is empty");
    }
    let table = build_table(&log, layout, strict)?;
    csv_out::write_csv(output, &table).map_err(|e| ReportError::Write {
        path: output.to_path_buf(),
        source: e,
    })?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        lines = log.len(),
        rows = table.len(),
        "wrote report"
    );
    Ok(table.len())
}

/// Input and output paths of a parallel-job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParaRun {
    pub ftl: String,
    /// Job count exactly as given; `04` stays `04` in file names.
    pub job: String,
}

impl ParaRun {
    pub fn new(ftl: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            ftl: ftl.into(),
            job: job.into(),
        }
    }

    /// Recover the run from a `<ftl>-para-j<job>.out` file name.
    pub fn from_log_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let caps = PARA_LOG_NAME.captures(name)?;
        Some(Self::new(&caps["ftl"], &caps["job"]))
    }

    fn stem(&self) -> String {
        format!("{}-para-j{}", self.ftl, self.job)
    }

    pub fn input_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.out", self.stem()))
    }

    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.csv", self.stem()))
    }

    /// Convert this run's log under `dir`.
    pub fn convert(&self, dir: &Path, strict: bool) -> Result<usize, ReportError> {
        convert(
            &self.input_path(dir),
            &self.output_path(dir),
            Layout::Para,
            strict,
        )
    }
}

/// Outcome of converting every parallel-job log in a directory.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Convert every `*-para-j*.out` under `dir`, in sorted order.
///
/// A failing log is logged and recorded; the rest are still processed.
pub fn convert_batch(dir: &Path, strict: bool) -> Result<BatchSummary, ReportError> {
    let pattern = dir.join("*-para-j*.out");
    let pattern = pattern.to_string_lossy();
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| ReportError::Pattern {
            pattern: pattern.to_string(),
            source: e,
        })?
        .flatten()
        .collect();
    paths.sort();

    let mut summary = BatchSummary::default();
    for path in paths {
        let Some(run) = ParaRun::from_log_path(&path) else {
            tracing::debug!(path = %path.display(), "not a parallel-job log name, skipping");
            continue;
        };
        match run.convert(dir, strict) {
            Ok(_) => summary.converted.push(path),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "conversion failed");
                summary.failed.push(path);
            }
        }
    }
    Ok(summary)
}

/// Errors from report generation.
#[derive(Debug)]
pub enum ReportError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Extract(ExtractError),
    Misaligned {
        counts: Vec<(&'static str, usize)>,
    },
    Write {
        path: PathBuf,
        source: csv::Error,
    },
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ReportError::Extract(e) => write!(f, "{e}"),
            ReportError::Misaligned { counts } => {
                write!(f, "metric counts differ:")?;
                for (name, count) in counts {
                    write!(f, " {name}={count}")?;
                }
                Ok(())
            }
            ReportError::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            ReportError::Pattern { pattern, source } => {
                write!(f, "bad log pattern {pattern}: {source}")
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Read { source, .. } => Some(source),
            ReportError::Extract(e) => Some(e),
            ReportError::Misaligned { .. } => None,
            ReportError::Write { source, .. } => Some(source),
            ReportError::Pattern { source, .. } => Some(source),
        }
    }
}

impl From<ExtractError> for ReportError {
    fn from(e: ExtractError) -> Self {
        ReportError::Extract(e)
    }
}
