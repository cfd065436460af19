//! Integration tests for the processor module
//!
//! Tests the complete import pipeline against temporary export buckets.


use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Write an export CSV with one JSON payload per row under `root/key`
pub fn write_export(root: &Path, key: &str, payloads: &[Value]) -> PathBuf {
    let rows: Vec<String> = payloads.iter().map(Value::to_string).collect();
    write_raw_export(root, key, &rows)
}

/// Write an export CSV with the given payload cells, verbatim
pub fn write_raw_export(root: &Path, key: &str, cells: &[String]) -> PathBuf {
    let path = root.join(key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut content = String::from("_airbyte_raw_id,_airbyte_extracted_at,_airbyte_data\n");
    for (i, cell) in cells.iter().enumerate() {
        content.push_str(&format!(
            "id-{},2024-10-01T00:00:00Z,\"{}\"\n",
            i,
            cell.replace('"', "\"\"")
        ));
    }
    fs::write(&path, content).unwrap();
    path
}
