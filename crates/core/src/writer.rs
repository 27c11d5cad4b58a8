use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::ResultLog;

#[derive(Error, Debug)]
pub enum ResultWriteError {
    #[error("failed to create result file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize result log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes the accumulated log as a single JSON document.
///
/// Keys are emitted in record order, so the output is byte-identical
/// across runs with the same input.
pub fn write_json(log: &ResultLog, path: &Path) -> Result<(), ResultWriteError> {
    let io_err = |source: std::io::Error| ResultWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, log)?;
    // An implicit flush on drop would discard I/O errors; a failed
    // write must surface as a fatal error, not a silent empty file.
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Detection, FrameRecord};
    use std::fs;
    use tempfile::TempDir;

    fn sample_log() -> ResultLog {
        let mut log = ResultLog::new();
        log.push(FrameRecord {
            index: 0,
            time: 0.0,
            faces: vec![Detection {
                label: 1,
                x: 12,
                y: 34,
                w: 56,
                h: 78,
            }],
        });
        log.push(FrameRecord {
            index: 1,
            time: 0.5,
            faces: vec![],
        });
        log
    }

    #[test]
    fn test_write_produces_expected_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces.json");

        write_json(&sample_log(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            r#"{"frame0":{"faces":[{"face1":{"x":12,"y":34,"w":56,"h":78}}],"time":0.0},"frame1":{"faces":[],"time":0.5}}"#
        );
    }

    #[test]
    fn test_repeat_writes_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        let first_path = dir.path().join("a.json");
        let second_path = dir.path().join("b.json");

        let log = sample_log();
        write_json(&log, &first_path).unwrap();
        write_json(&log, &second_path).unwrap();

        assert_eq!(
            fs::read(&first_path).unwrap(),
            fs::read(&second_path).unwrap()
        );
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let result = write_json(&ResultLog::new(), Path::new("/nonexistent/dir/out.json"));
        assert!(matches!(result, Err(ResultWriteError::Io { .. })));
    }

    /// `/dev/full` accepts the open but fails every physical write
    /// with ENOSPC, which only surfaces at flush time for a document
    /// smaller than the buffer.
    #[test]
    #[cfg(target_os = "linux")]
    fn test_failed_write_to_full_device_is_io_error() {
        let result = write_json(&sample_log(), Path::new("/dev/full"));
        assert!(matches!(result, Err(ResultWriteError::Io { .. })));
    }
}
