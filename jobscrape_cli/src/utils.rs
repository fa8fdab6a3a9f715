use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(serde_json::to_string_pretty(data)?.as_bytes())?;
    file.write_all(b"\n")?;

    info!("✅ {} written", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobRecord;

    #[test]
    fn writes_pretty_json_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("job.json");
        let record = JobRecord {
            company: Some("Acme".into()),
            ..Default::default()
        };

        save_json(&record, &path).unwrap();

        let written: JobRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, record);
    }
}
