//! Fixture access for the crate's unit tests.

use std::io::Write;

use bzip2::{Compression, write::BzEncoder};
use camino::Utf8PathBuf;
use tempfile::{Builder, TempPath};

/// Path of a file under `tests/fixtures`.
pub(crate) fn fixture_path(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Write a bzip2-compressed copy of a fixture to a temporary `.osm.bz2` file.
pub(crate) fn compressed_fixture(name: &str) -> TempPath {
    let path = fixture_path(name);
    let raw = std::fs::read(&path).expect("fixture is readable");
    let file = Builder::new()
        .suffix(".osm.bz2")
        .tempfile()
        .expect("temporary file");
    let mut encoder = BzEncoder::new(file, Compression::fast());
    encoder.write_all(&raw).expect("compress fixture");
    encoder.finish().expect("finish bzip2 stream").into_temp_path()
}
