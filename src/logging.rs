use crate::stats::TrackStats;
use crate::track::TrackSource;
use anyhow::Result;
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Directory for storing trackview data.
fn data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let dir = PathBuf::from(home).join(".trackview");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Opens a file for writing, readable by the owner only.
fn create_private(path: &Path) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).write(true).truncate(true);
    #[cfg(unix)]
    opts.mode(0o600);
    Ok(opts.open(path)?)
}

/// Installs a file-backed tracing subscriber and returns the log path.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_file_logging() -> Result<PathBuf> {
    let path = data_dir()?.join("trackview.log");
    let file = create_private(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(path)
}

/// A saved view of the current selection.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SelectionSnapshot {
    pub created: DateTime<Utc>,
    /// Track document the selection was taken from.
    pub resource: String,
    pub downsampled: bool,
    pub min_distance_km: f64,
    pub max_distance_km: f64,
    pub stats: Option<TrackStats>,
    /// Selected samples as (distance km, altitude m).
    pub points: Vec<(f64, f64)>,
}

impl SelectionSnapshot {
    pub fn new(
        resource: &TrackSource,
        downsampled: bool,
        bounds: (f64, f64),
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            created: Utc::now(),
            resource: resource.to_string(),
            downsampled,
            min_distance_km: bounds.0,
            max_distance_km: bounds.1,
            stats: TrackStats::from_samples(&points),
            points,
        }
    }

    /// Writes the snapshot as gzipped JSON into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let filename = format!("{}.json.gz", self.created.format("%Y-%m-%dT%H-%M-%S%.3f"));
        let path = dir.join(filename);

        let file = create_private(&path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer_pretty(&mut encoder, self)?;
        encoder.finish()?;

        tracing::info!(path = %path.display(), points = self.points.len(), "Snapshot saved");
        Ok(path)
    }

    /// Writes the snapshot into the default snapshot directory.
    pub fn save(&self) -> Result<PathBuf> {
        self.write_to(&snapshot_dir()?)
    }
}

fn snapshot_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("snapshots"))
}

/// Lists snapshot files in `dir`, most recent first.
pub fn list_snapshots_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(".json.gz"))
        .collect();

    snapshots.sort();
    snapshots.reverse();
    Ok(snapshots)
}

/// Lists saved selection snapshots.
pub fn list_snapshots() -> Result<Vec<PathBuf>> {
    list_snapshots_in(&snapshot_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trackview-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = temp_dir("snapshot");
        let snapshot = SelectionSnapshot::new(
            &TrackSource::file("resources/ride.xml"),
            false,
            (2.0, 6.0),
            vec![(2.0, 20.0), (4.0, 30.0), (6.0, 25.0)],
        );

        let path = snapshot.write_to(&dir).unwrap();
        let restored: SelectionSnapshot =
            serde_json::from_reader(GzDecoder::new(File::open(&path).unwrap())).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(restored.resource, "resources/ride.xml");
        assert_eq!(restored.points, snapshot.points);
        assert_eq!(restored.min_distance_km, 2.0);
        let stats = restored.stats.unwrap();
        assert_eq!(stats.ascent, 10.0);
        assert_eq!(stats.descent, 5.0);
    }

    #[test]
    fn test_empty_snapshot_has_no_stats() {
        let snapshot = SelectionSnapshot::new(&TrackSource::file("x.xml"), true, (0.0, 0.0), Vec::new());

        assert!(snapshot.stats.is_none());
    }

    #[test]
    fn test_list_snapshots_in() {
        let dir = temp_dir("list");
        assert!(list_snapshots_in(&dir).unwrap().is_empty());

        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("2024-01-01T00-00-00.000.json.gz"), b"").unwrap();
        fs::write(dir.join("2024-02-01T00-00-00.000.json.gz"), b"").unwrap();
        fs::write(dir.join("notes.txt"), b"").unwrap();

        let listed = list_snapshots_in(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(listed.len(), 2);
        assert!(listed[0].ends_with("2024-02-01T00-00-00.000.json.gz"));
    }
}
