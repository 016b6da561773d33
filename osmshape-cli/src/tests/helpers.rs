//! Test helpers for laying out OSM inputs and output directories.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Two nodes, one way and one relation with a mix of tag keys.
pub(super) const SAMPLE_OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="fixture">
  <node id="10" lat="51.5007" lon="-0.1246" version="3" changeset="100" user="Åsa" uid="7" timestamp="2020-01-01T00:00:00Z">
    <tag k="name" v="Big Ben"/>
    <tag k="tourism" v="attraction"/>
    <tag k="addr:street" v="Bridge Street"/>
  </node>
  <node id="11" lat="51.5010" lon="-0.1240" version="1" changeset="101" user="bob" uid="8" timestamp="2020-01-02T00:00:00Z"/>
  <way id="20" version="2" changeset="102" user="Åsa" uid="7" timestamp="2020-01-03T00:00:00Z">
    <nd ref="10"/>
    <nd ref="11"/>
    <tag k="highway" v="footway"/>
    <tag k="bad key" v="dropped"/>
  </way>
  <relation id="30" version="1" changeset="103" user="carol" uid="9" timestamp="2020-01-04T00:00:00Z">
    <member type="way" ref="20" role="outer"/>
    <tag k="type" v="multipolygon"/>
  </relation>
</osm>
"#;

/// Scratch directory holding an input document and room for outputs.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("sample.osm"), SAMPLE_OSM.as_bytes());
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn osm(&self) -> Utf8PathBuf {
        self.root.join("sample.osm")
    }

    pub(super) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents)
        .unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}
