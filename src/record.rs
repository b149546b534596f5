//! Sequence record parsing and dataset access
//!
//! A record is one line of the dataset:
//!
//! ```text
//! item item ... -1 item ... -1 -2
//! ```
//!
//! Items are space separated, `-1` closes an itemset and `-2` ends the record.
//! The item-length of a record is the number of item tokens across all of its
//! itemsets.

use crate::error::{Result, SeqBoundError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Token closing an itemset
pub const ITEMSET_SEPARATOR: &str = "-1";

/// Token terminating a record
pub const END_MARKER: &str = "-2";

/// Compute the item-length of a single record
///
/// The record must end with `-1 -2`, and `-2` may not occur anywhere else.
/// `line` is the 1-based line number reported on failure.
///
/// # Example
/// ```
/// use seqbound::record::item_length;
///
/// assert_eq!(item_length("1 2 -1 3 -1 -2", 1).unwrap(), 3);
/// assert_eq!(item_length("-1 -2", 1).unwrap(), 0);
/// assert!(item_length("1 2 -1", 1).is_err());
/// ```
pub fn item_length(record: &str, line: u64) -> Result<usize> {
    let tokens: Vec<&str> = record.split_whitespace().collect();

    let malformed = |reason: &str| SeqBoundError::MalformedRecord {
        line,
        reason: reason.to_string(),
    };

    match tokens.as_slice() {
        [] => Err(malformed("empty record")),
        [.., last] if *last != END_MARKER => Err(malformed("missing -2 end marker")),
        [_] => Err(malformed("end marker without closing -1")),
        [.., before_end, _] if *before_end != ITEMSET_SEPARATOR => {
            Err(malformed("last itemset is not closed by -1"))
        }
        [body @ .., _] => {
            if body.contains(&END_MARKER) {
                return Err(malformed("-2 end marker before end of record"));
            }
            Ok(body.iter().filter(|t| **t != ITEMSET_SEPARATOR).count())
        }
    }
}

/// Open a dataset for a single buffered forward pass
///
/// A missing file is reported as `DatasetNotFound` rather than a bare IO error.
pub fn open_dataset(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SeqBoundError::DatasetNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Fail when `output` names the same file as `input`
///
/// Both paths are resolved when they exist, so `./data.txt` and `data.txt`
/// compare equal.
pub fn ensure_distinct_output(input: &Path, output: &Path) -> Result<()> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(SeqBoundError::OutputOverwritesInput {
            path: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Count the records of a dataset in one pass
pub fn count_records<R: BufRead>(reader: R) -> Result<u64> {
    let mut count = 0u64;
    for line in reader.lines() {
        line?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_single_itemset() {
        assert_eq!(item_length("10 20 30 -1 -2", 1).unwrap(), 3);
    }

    #[test]
    fn test_multiple_itemsets() {
        assert_eq!(item_length("1 -1 2 3 -1 4 5 6 -1 -2", 1).unwrap(), 6);
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(item_length("-1 -2", 1).unwrap(), 0);
    }

    #[test]
    fn test_extra_whitespace_tolerated() {
        assert_eq!(item_length("  1  2 -1   3 -1 -2  ", 1).unwrap(), 3);
    }

    #[test]
    fn test_empty_line_rejected() {
        let err = item_length("", 7).unwrap_err();
        match err {
            SeqBoundError::MalformedRecord { line, .. } => assert_eq!(line, 7),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_end_marker_rejected() {
        assert!(item_length("1 2 -1 3 -1", 1).is_err());
    }

    #[test]
    fn test_unclosed_last_itemset_rejected() {
        assert!(item_length("1 2 -1 3 -2", 1).is_err());
    }

    #[test]
    fn test_lone_end_marker_rejected() {
        assert!(item_length("-2", 1).is_err());
    }

    #[test]
    fn test_early_end_marker_rejected() {
        assert!(item_length("1 -1 -2 2 -1 -2", 1).is_err());
    }

    #[test]
    fn test_count_records() {
        let data = "1 -1 -2\n2 -1 -2\n3 -1 -2\n";
        assert_eq!(count_records(Cursor::new(data)).unwrap(), 3);
    }

    #[test]
    fn test_output_must_differ_from_input() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.txt");
        std::fs::write(&data, "1 -1 -2\n").unwrap();

        let aliased = dir.path().join(".").join("data.txt");
        assert!(matches!(
            ensure_distinct_output(&data, &aliased),
            Err(SeqBoundError::OutputOverwritesInput { .. })
        ));
        assert!(ensure_distinct_output(&data, &dir.path().join("out.txt")).is_ok());
    }

    #[test]
    fn test_open_missing_dataset() {
        let err = open_dataset(Path::new("/nonexistent/seqbound/data.txt")).unwrap_err();
        assert!(matches!(err, SeqBoundError::DatasetNotFound { .. }));
    }
}
