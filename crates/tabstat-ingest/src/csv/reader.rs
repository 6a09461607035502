//! CSV file reading.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::header::normalize_headers;

fn io_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Checks that `path` is a readable, non-empty file.
pub fn check_readable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.is_dir() {
        return Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::other("path is a directory"),
        });
    }
    if metadata.len() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reads a CSV file into a Polars DataFrame with every column as a string.
///
/// Empty cells are null. Header names are normalized (see
/// [`normalize_header`](super::normalize_header)). Typing is left to the
/// loader so that coercion failures can be counted rather than guessed.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    check_readable(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    normalize_headers(&df, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_frame_reads_strings() {
        let file = create_temp_csv("age,charges\n19,16884.924\n18,1725.5523\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("charges").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_csv_frame_empty_cells_are_null() {
        let file = create_temp_csv("user_id,cart_time\na,\nb,2017-01-01 10:00:00\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.column("cart_time").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_csv_frame_trims_headers() {
        let file = create_temp_csv("Show Number, Air Date, Value\n4680,2004-12-31,$200\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert!(df.column("Air Date").is_ok());
        assert!(df.column("Value").is_ok());
    }

    #[test]
    fn test_read_csv_frame_quoted_commas() {
        let file = create_temp_csv("Question,Answer\n\"Kings, queens and England\",Tudor\n");
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_read_csv_frame_missing_file() {
        let result = read_csv_frame(Path::new("/nonexistent/visits.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_csv_frame_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_frame(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }
}
