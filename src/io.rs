pub mod hdf5;

// ----------- read/write events as raw little-endian f64 -----------------------
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Error, Result};

const VALUE_SIZE: usize = std::mem::size_of::<f64>();

/// Write `events` back to back, each as its values in little-endian `f64`.
pub fn write_events<E: AsRef<[f64]>>(events: &[E], path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for value in events.iter().flat_map(|event| event.as_ref()) {
        file.write_all(&value.to_le_bytes())?;
    }
    file.flush()?;
    Ok(())
}

/// Read events of `ndim` values each, as written by [`write_events`].
///
/// # Errors
/// `TruncatedEvent` if the file does not hold a whole number of events.
pub fn read_events(path: impl AsRef<Path>, ndim: usize) -> Result<Vec<Vec<f64>>> {
    if ndim == 0 { return Err(Error::NoDimensions) }
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let event_size = ndim * VALUE_SIZE;
    if bytes.len() % event_size != 0 {
        return Err(Error::TruncatedEvent { path: path.to_owned(), values: bytes.len() / VALUE_SIZE });
    }
    Ok(bytes.chunks_exact(event_size)
       .map(|event| event.chunks_exact(VALUE_SIZE).map(value_from_le_bytes).collect())
       .collect())
}

fn value_from_le_bytes(bytes: &[u8]) -> f64 {
    let mut buffer = [0; VALUE_SIZE];
    buffer.copy_from_slice(bytes);
    f64::from_le_bytes(buffer)
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn event_io_roundtrip() -> Result<()> {
        // Harmless temporary location for output file
        let dir = tempdir()?;
        let file_path = dir.path().join("events.bin");

        let original = vec![vec![1.23, -4.56, 7.0], vec![f64::INFINITY, 0.0, f64::MIN_POSITIVE]];
        write_events(&original, &file_path)?;
        assert_eq!(fs::metadata(&file_path)?.len(), 6 * 8);

        let reloaded = read_events(&file_path, 3)?;
        assert_eq!(original, reloaded);
        Ok(())
    }

    #[test]
    fn nan_survives_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("nan.bin");
        write_events(&[[f64::NAN, 1.0]], &file_path)?;
        let reloaded = read_events(&file_path, 2)?;
        assert!(reloaded[0][0].is_nan());
        assert_eq!(reloaded[0][1], 1.0);
        Ok(())
    }

    #[test]
    fn partial_trailing_event_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("short.bin");
        write_events(&[[1.0, 2.0, 3.0]], &file_path)?;
        assert!(matches!(read_events(&file_path, 2),
                         Err(Error::TruncatedEvent { values: 3, .. })));
        assert_eq!(read_events(&file_path, 1)?.len(), 3);
        Ok(())
    }

    #[test]
    fn empty_file_has_no_events() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("empty.bin");
        write_events::<[f64; 2]>(&[], &file_path)?;
        assert!(read_events(&file_path, 2)?.is_empty());
        Ok(())
    }
}
