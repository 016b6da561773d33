// Fixture helpers for the behavioural tests.

use camino::Utf8PathBuf;
use std::{fs, io::Write};
use tempfile::{Builder, TempPath};

/// Path of a named XML fixture.
pub fn fixture_path(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Compress a fixture with bzip2 into a temporary `.osm.bz2` file.
pub fn compress_fixture(name: &str) -> TempPath {
    let path = fixture_path(name);
    let raw = fs::read(&path).unwrap_or_else(|err| panic!("failed to read fixture {path}: {err}"));
    let tempfile = Builder::new()
        .prefix("fixture")
        .suffix(".osm.bz2")
        .tempfile()
        .unwrap_or_else(|err| panic!("failed to create temporary fixture for {name}: {err}"));
    let mut encoder = bzip2::write::BzEncoder::new(tempfile, bzip2::Compression::best());
    encoder
        .write_all(&raw)
        .unwrap_or_else(|err| panic!("failed to compress fixture {name}: {err}"));
    let mut finished = encoder
        .finish()
        .unwrap_or_else(|err| panic!("failed to finish compressing {name}: {err}"));
    finished
        .flush()
        .unwrap_or_else(|err| panic!("failed to flush compressed fixture {name}: {err}"));
    finished.into_temp_path()
}
