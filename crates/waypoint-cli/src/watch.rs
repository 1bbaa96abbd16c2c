//! Wait for the drawing export to be written

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// What a poll sees of the file: modification time and size
type Snapshot = Option<(SystemTime, u64)>;

fn snapshot(path: &Path) -> Snapshot {
    let metadata = fs::metadata(path).ok()?;
    Some((metadata.modified().ok()?, metadata.len()))
}

/// Resolve once `path` is created or replaced, plus the settle delay
///
/// A file that already exists when the wait starts does not count; only a
/// change relative to that first snapshot does. The settle delay gives the
/// writer time to finish before the file is read.
pub async fn wait_for_file(path: &Path, poll: Duration, settle: Duration) {
    let initial = snapshot(path);
    tracing::debug!(path = %path.display(), exists = initial.is_some(), "Watching file");

    loop {
        tokio::time::sleep(poll).await;
        let current = snapshot(path);
        if current.is_some() && current != initial {
            break;
        }
    }

    tracing::info!(path = %path.display(), "File changed");
    tokio::time::sleep(settle).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const POLL: Duration = Duration::from_millis(10);
    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_resolves_when_file_appears() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.geojson");

        let writer_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::write(writer_path, "{}").unwrap();
        });

        tokio::time::timeout(LIMIT, wait_for_file(&path, POLL, POLL)).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_existing_file_must_change() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.geojson");
        fs::write(&path, "{}").unwrap();

        // Nothing touches the file, so the wait never finishes
        let unchanged = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_file(&path, POLL, POLL),
        )
        .await;
        assert!(unchanged.is_err());

        let writer_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::write(writer_path, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        });

        tokio::time::timeout(LIMIT, wait_for_file(&path, POLL, POLL)).await.unwrap();
    }
}
