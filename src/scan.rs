/// Line scanner: the benchmark log held as an ordered list of lines.
///
/// Each extraction pass walks the whole list from the first line, so
/// passes are independent of one another.
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LogFile {
    lines: Vec<String>,
}

impl LogFile {
    /// Read every line of the file at `path`.
    ///
    /// Bytes that are not UTF-8 become U+FFFD; a trailing `\r` is dropped.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let mut lines = Vec::new();
        let mut lossy = 0usize;
        for raw in reader.split(b'\n') {
            let raw = raw?;
            let raw = raw.strip_suffix(b"\r").unwrap_or(&raw[..]);
            let line = String::from_utf8_lossy(raw);
            if matches!(line, std::borrow::Cow::Owned(_)) {
                lossy += 1;
            }
            lines.push(line.into_owned());
        }
        if lossy > 0 {
            tracing::debug!(path = %path.display(), lossy, "replaced invalid UTF-8 in log lines");
        }
        tracing::debug!(path = %path.display(), lines = lines.len(), "read log file");
        Ok(Self { lines })
    }

    /// Build a log from in-memory text.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Lines containing `label`, paired with their 1-based line numbers.
    pub fn matching<'a>(&'a self, label: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.lines
            .iter()
            .enumerate()
            .filter(move |(_, line)| line.contains(label))
            .map(|(i, line)| (i + 1, line.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_reads_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.out");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Total read (MB): 1").unwrap();
        writeln!(f, "real\t0m1.00s").unwrap();
        drop(f);

        let log = LogFile::open(&path).unwrap();
        assert_eq!(log.len(), 2);
        let hits: Vec<_> = log.matching("real").collect();
        assert_eq!(hits, vec![(2, "real\t0m1.00s")]);
    }

    #[test]
    fn test_open_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.out");
        let mut bytes = b"Total read (MB): 5\r\n".to_vec();
        bytes.extend_from_slice(b"warning: \xff junk\n");
        bytes.extend_from_slice(b"real\t0m1.00s");
        std::fs::write(&path, bytes).unwrap();

        let log = LogFile::open(&path).unwrap();
        assert_eq!(log.len(), 3);
        let reads: Vec<_> = log.matching("Total read").collect();
        assert_eq!(reads, vec![(1, "Total read (MB): 5")]);
        let junk: Vec<_> = log.matching("junk").collect();
        assert_eq!(junk, vec![(2, "warning: \u{fffd} junk")]);
        assert_eq!(log.matching("real").count(), 1);
    }

    #[test]
    fn test_open_missing_file_is_error() {
        assert!(LogFile::open(Path::new("/nonexistent/run.out")).is_err());
    }

    #[test]
    fn test_matching_is_repeatable() {
        let log = LogFile::from_text("a x\nb\na y\n");
        let first: Vec<_> = log.matching("a").map(|(n, _)| n).collect();
        let second: Vec<_> = log.matching("a").map(|(n, _)| n).collect();
        assert_eq!(first, vec![1, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_matching_is_substring_not_regex() {
        let log = LogFile::from_text("Total read (MB): 4\nTotal flash read (pages): 9\n");
        let hits: Vec<_> = log.matching("Total read").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);
    }

    #[test]
    fn test_empty_log() {
        let log = LogFile::from_text("");
        assert!(log.is_empty());
        assert_eq!(log.matching("real").count(), 0);
    }
}
