//! TypeScript definitions for the types a front end exchanges with a session.

use crate::bookmark::PageBookmark;
use crate::pagination::{LayoutMetrics, PaginationConfig};
use crate::progress::ReadingProgress;
use crate::session::{ReaderSnapshot, SessionCommand};
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<(), String> {
    T::export_all_to(out_dir).map_err(|err| err.to_string())
}

/// Write fresh `.ts` definitions into `out_dir`, removing stale ones first.
pub fn export_ts_bindings(out_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .map_err(|err| format!("Failed to list {}: {err}", out_dir.display()))?
    {
        let entry = entry.map_err(|err| format!("Failed to read entry: {err}"))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .map_err(|err| format!("Failed to remove {}: {err}", path.display()))?;
        }
    }

    export_single_type::<LayoutMetrics>(out_dir)?;
    export_single_type::<PageBookmark>(out_dir)?;
    export_single_type::<PaginationConfig>(out_dir)?;
    export_single_type::<ReadingProgress>(out_dir)?;
    export_single_type::<ReaderSnapshot>(out_dir)?;
    export_single_type::<SessionCommand>(out_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn exports_definitions_and_clears_stale_files() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        let out_dir = std::env::temp_dir().join(format!("leaf_pager_test_bindings_{nanos}"));
        fs::create_dir_all(&out_dir).expect("create temp dir");
        fs::write(out_dir.join("Stale.ts"), "export type Stale = never;").expect("write stale");

        export_ts_bindings(&out_dir).expect("export succeeds");

        assert!(!out_dir.join("Stale.ts").exists());
        for name in [
            "LayoutMetrics.ts",
            "PageBookmark.ts",
            "PaginationConfig.ts",
            "ReadingProgress.ts",
            "ReaderSnapshot.ts",
            "SessionCommand.ts",
        ] {
            assert!(out_dir.join(name).exists(), "{name} missing");
        }
        let _ = fs::remove_dir_all(&out_dir);
    }
}
