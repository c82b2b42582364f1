//! Attribution sidecar files written alongside downloaded images.
//!
//! Each image `<index>.tif` may get a `<index>.json` next to it carrying the
//! license attribution for the picture.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::specimen::{LICENSE_NAME, LICENSE_URL, SpecimenResult};

/// Errors produced by sidecar generation.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// I/O error writing the sidecar file to disk.
    #[error("I/O error writing sidecar: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error (shouldn't occur for well-formed structs).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct Attribution<'a> {
    name: &'a str,
    genus: &'a str,
    species: &'a str,
    subspecies: &'a str,
    author: &'a str,
    author_url: &'a str,
    image_url: &'a str,
    license: &'static str,
    license_url: &'static str,
    attribution: String,
}

impl<'a> Attribution<'a> {
    fn from_result(result: &'a SpecimenResult) -> Self {
        let identity = result.identity();
        Self {
            name: result.canonical_name(),
            genus: identity.genus(),
            species: identity.species(),
            subspecies: identity.subspecies(),
            author: &result.author().name,
            author_url: &result.author().url,
            image_url: result.image_url(),
            license: LICENSE_NAME,
            license_url: LICENSE_URL,
            attribution: result.cc_license_text(),
        }
    }
}

/// Sidecar path for an image: same stem, `.json` extension.
#[must_use]
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

/// Writes the attribution sidecar for `result` next to `image_path`.
///
/// Returns `None` (with a `debug!` log) if:
/// - the image does not exist on disk
/// - the sidecar file already exists (never overwritten)
///
/// Returns `Some(sidecar_path)` on success.
///
/// # Errors
///
/// Returns [`SidecarError`] on I/O or serialization failure.
#[instrument(skip(result), fields(specimen = %result.identity(), image = %image_path.display()))]
pub fn write_attribution_sidecar(
    result: &SpecimenResult,
    image_path: &Path,
) -> Result<Option<PathBuf>, SidecarError> {
    if !image_path.exists() {
        debug!("Image missing, skipping sidecar generation");
        return Ok(None);
    }
    let path = sidecar_path(image_path);

    let file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "Sidecar already exists, skipping");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let attribution = Attribution::from_result(result);
    if let Err(err) = write_json(BufWriter::new(file), &attribution) {
        let _ = fs::remove_file(&path);
        return Err(err);
    }

    debug!(path = %path.display(), "Sidecar created");
    Ok(Some(path))
}

/// Serializes `value` and flushes, so buffered write errors are not lost on drop.
fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<(), SidecarError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::Author;
    use crate::specimen::SpecimenIdentity;
    use tempfile::TempDir;

    fn sample_result() -> SpecimenResult {
        SpecimenResult::from_parts(
            SpecimenIdentity::new("Atta", "cephalotes", ""),
            "Atta cephalotes",
            Author::new("Jane Doe", "http://example.org/jane"),
            "http://example.org/full.tif",
        )
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::StorageFull, "no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_json_reports_buffered_write_failure() {
        let attribution_result = sample_result();
        let attribution = Attribution::from_result(&attribution_result);

        let err = write_json(BufWriter::new(FullDisk), &attribution).unwrap_err();
        assert!(matches!(err, SidecarError::Io(ref e) if e.kind() == ErrorKind::StorageFull));
    }

    #[test]
    fn test_sidecar_path_replaces_extension() {
        assert_eq!(
            sidecar_path(Path::new("/out/images/12.tif")),
            PathBuf::from("/out/images/12.json")
        );
    }

    #[test]
    fn test_write_sidecar_contents() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("0.tif");
        fs::write(&image, b"TIFF").unwrap();

        let written = write_attribution_sidecar(&sample_result(), &image).unwrap();
        let path = written.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(json["name"], "Atta cephalotes");
        assert_eq!(json["author"], "Jane Doe");
        assert_eq!(json["author_url"], "http://example.org/jane");
        assert_eq!(json["license"], "CC BY 4.0");
        assert_eq!(json["license_url"], LICENSE_URL);
        assert_eq!(
            json["attribution"],
            "Atta cephalotes by Jane Doe, from http://example.org/jane, is licensed under CC BY 4.0."
        );
    }

    #[test]
    fn test_write_sidecar_skips_missing_image() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("0.tif");
        assert!(write_attribution_sidecar(&sample_result(), &image)
            .unwrap()
            .is_none());
        assert!(!sidecar_path(&image).exists());
    }

    #[test]
    fn test_write_sidecar_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let image = temp.path().join("0.tif");
        fs::write(&image, b"TIFF").unwrap();
        fs::write(sidecar_path(&image), b"{\"keep\":true}").unwrap();

        assert!(write_attribution_sidecar(&sample_result(), &image)
            .unwrap()
            .is_none());
        assert_eq!(
            fs::read_to_string(sidecar_path(&image)).unwrap(),
            "{\"keep\":true}"
        );
    }
}
