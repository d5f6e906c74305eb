use crate::track::TrackSource;
use clap::Parser;
use std::path::PathBuf;

/// Smallest slider step accepted from the command line (km).
const MIN_STEP_KM: f64 = 0.01;

/// Terminal altitude profile viewer for GPS track recordings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name of the bundled track resource to load
    #[arg(short, long, default_value = "BRM618Kinki400")]
    pub resource: String,

    /// Read <RESOURCE>.<EXTENSION> from this directory instead of the bundled copy
    #[arg(long, value_name = "DIR")]
    pub resource_dir: Option<PathBuf>,

    /// File extension of the track resource
    #[arg(long, default_value = "xml")]
    pub extension: String,

    /// Keep only every 100th sample before selecting
    #[arg(long)]
    pub downsample: bool,

    /// Distance moved by one bound adjustment, in kilometers
    #[arg(long, value_name = "KM", default_value = "0.5")]
    pub step: f64,

    /// Load the track immediately instead of waiting for Enter
    #[arg(long)]
    pub autoload: bool,

    /// Write a debug log (saves to ~/.trackview/trackview.log)
    #[arg(short = 'l', long)]
    pub log: bool,

    /// List saved selection snapshots
    #[arg(long)]
    pub list_snapshots: bool,
}

impl Args {
    /// Track document this session reads.
    ///
    /// Without `--resource-dir` a bundled resource of that name is used. Unknown names
    /// fall back to a file relative to the working directory.
    pub fn source(&self) -> TrackSource {
        let file_name = format!("{}.{}", self.resource, self.extension);
        match &self.resource_dir {
            Some(dir) => TrackSource::file(dir.join(file_name)),
            None => TrackSource::bundled(&self.resource)
                .unwrap_or_else(|| TrackSource::file(file_name)),
        }
    }

    /// Slider step, with unusable values replaced by the minimum.
    pub fn step_km(&self) -> f64 {
        if self.step.is_finite() {
            self.step.max(MIN_STEP_KM)
        } else {
            MIN_STEP_KM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["trackview"]);

        assert_eq!(args.source().to_string(), "bundled:BRM618Kinki400");
        assert!(matches!(args.source(), TrackSource::Bundled { .. }));
        assert_eq!(args.step_km(), 0.5);
        assert!(!args.downsample);
        assert!(!args.autoload);
    }

    #[test]
    fn test_custom_resource() {
        let args = Args::parse_from([
            "trackview",
            "-r",
            "ride",
            "--resource-dir",
            "/data",
            "--extension",
            "tcx",
            "--downsample",
        ]);

        assert!(
            matches!(args.source(), TrackSource::File(path) if path == PathBuf::from("/data/ride.tcx"))
        );
        assert!(args.downsample);
    }

    #[test]
    fn test_resource_dir_overrides_bundled() {
        let args = Args::parse_from(["trackview", "--resource-dir", "resources"]);

        assert!(matches!(
            args.source(),
            TrackSource::File(path) if path == PathBuf::from("resources/BRM618Kinki400.xml")
        ));
    }

    #[test]
    fn test_unknown_resource_reads_file() {
        let args = Args::parse_from(["trackview", "-r", "ride"]);

        assert!(matches!(args.source(), TrackSource::File(path) if path == PathBuf::from("ride.xml")));
    }

    #[test]
    fn test_step_clamped() {
        let args = Args::parse_from(["trackview", "--step", "0"]);
        assert_eq!(args.step_km(), MIN_STEP_KM);

        let args = Args::parse_from(["trackview", "--step", "NaN"]);
        assert_eq!(args.step_km(), MIN_STEP_KM);
    }
}
