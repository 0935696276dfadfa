mod live;
mod net;
mod server;
mod solve;

use std::path::PathBuf;
use tempfile::TempDir;

/// Config whose deductions take nothing, so net salary equals gross salary
pub fn identity_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("identity.json");
    std::fs::write(
        &path,
        r#"{
    "deductions": {
        "contribution": { "brackets": [] },
        "income_tax": { "brackets": [] }
    }
}"#,
    )
    .unwrap();
    path
}
