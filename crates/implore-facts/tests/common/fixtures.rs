//! Test fixture loading utilities

use implore_io::TabularData;
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a chart fixture as a table
pub fn load_chart(name: &str) -> TabularData {
    let path = fixture_path(name);
    implore_io::read_table(path.to_str().unwrap())
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}
