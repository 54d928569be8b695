//! Board save file
//!
//! The format is a flat run of whitespace-separated numbers, three per
//! player: `points x y`. Writing emits one trailing space after every number.
//! Reading scans for tokens that look like decimal numbers (`[+-]?\d+(\.\d+)?`),
//! ignores anything else and consumes the numbers in triples.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use doge_core::math::Vec2;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to write save file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read save file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One player's persisted state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveRecord {
    pub points: i32,
    /// Board position of the space the player stands on.
    pub position: Vec2,
}

pub fn format_save(records: &[SaveRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{} {} {} ",
            record.points, record.position.x, record.position.y
        ));
    }
    out
}

pub fn parse_save(text: &str) -> Vec<SaveRecord> {
    let numbers: Vec<f64> = text
        .split_whitespace()
        .filter_map(|token| {
            if !is_number(token) {
                debug!(token, "skipping non-numeric save token");
                return None;
            }
            token.parse::<f64>().ok()
        })
        .collect();

    let chunks = numbers.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        warn!(
            leftover = chunks.remainder().len(),
            "save file ends with an incomplete record"
        );
    }

    chunks
        .map(|triple| SaveRecord {
            points: triple[0] as i32,
            position: Vec2::new(triple[1] as f32, triple[2] as f32),
        })
        .collect()
}

/// Overwrite `path` with `records`.
pub fn write_save(path: &Path, records: &[SaveRecord]) -> Result<(), SaveError> {
    fs::write(path, format_save(records)).map_err(|source| SaveError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_save(path: &Path) -> Result<Vec<SaveRecord>, SaveError> {
    let text = fs::read_to_string(path).map_err(|source| SaveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_save(&text))
}

fn is_number(token: &str) -> bool {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_has_trailing_spaces() {
        let records = [
            SaveRecord { points: 10, position: Vec2::new(1000.0, 700.0) },
            SaveRecord { points: -3, position: Vec2::new(12.5, 40.0) },
        ];
        assert_eq!(format_save(&records), "10 1000 700 -3 12.5 40 ");
    }

    #[test]
    fn test_number_grammar() {
        for ok in ["0", "42", "-7", "+3", "12.5", "-0.25"] {
            assert!(is_number(ok), "{ok}");
        }
        for bad in ["", "-", "1.", ".5", "1e3", "abc", "1.2.3", "--1"] {
            assert!(!is_number(bad), "{bad}");
        }
    }

    #[test]
    fn test_parse_skips_garbage_and_partial_records() {
        let records = parse_save("15 1000 700 junk 8 400.5 300\n2 99");
        assert_eq!(
            records,
            vec![
                SaveRecord { points: 15, position: Vec2::new(1000.0, 700.0) },
                SaveRecord { points: 8, position: Vec2::new(400.5, 300.0) },
            ]
        );
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.txt");
        fs::write(&path, "stale contents that should be truncated 1 2 3 4 5 6").unwrap();

        let records = [SaveRecord { points: 21, position: Vec2::new(600.0, 250.0) }];
        write_save(&path, &records).unwrap();

        assert_eq!(read_save(&path).unwrap(), records);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_save(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SaveError::Read { .. }));
    }
}
