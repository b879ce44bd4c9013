/// CSV output: one CRLF-terminated line per row, no header.
use std::path::Path;

/// Write `rows` to `path`, creating or truncating the file.
pub fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "flushed csv");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_writes_rows_without_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[row(&["1", "2.5", "3"]), row(&["4", "65.0", "6"])]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "1,2.5,3\r\n4,65.0,6\r\n");
    }

    #[test]
    fn test_empty_table_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[]).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale,content,that,is,longer\r\n").unwrap();
        write_csv(&path, &[row(&["a", "b"])]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\r\n");
    }

    #[test]
    fn test_field_with_comma_is_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[row(&["a,b", "c"])]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a,b\",c\r\n");
    }

    #[test]
    fn test_missing_directory_is_error() {
        let result = write_csv(Path::new("/nonexistent/dir/out.csv"), &[row(&["a"])]);
        assert!(result.is_err());
    }
}
