use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use xml::name::OwnedName;
use xml::reader::{ParserConfig, XmlEvent};

/// Element that switches the parser into track-point mode.
const TRACK_ELEMENT: &str = "Track";

/// Meters per kilometer, for distance conversion.
const METERS_PER_KM: f64 = 1000.0;

/// Track documents compiled into the binary, by resource name.
const BUNDLED: &[(&str, &[u8])] = &[(
    "BRM618Kinki400",
    include_bytes!("../resources/BRM618Kinki400.xml"),
)];

/// A parsed recording: index-aligned distance (km) and altitude (m) samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    distance: Vec<f64>,
    altitude: Vec<f64>,
}

impl Track {
    /// Builds a track from parallel sequences, truncating the longer one so both align.
    pub fn new(mut distance: Vec<f64>, mut altitude: Vec<f64>) -> Self {
        let len = distance.len().min(altitude.len());
        if distance.len() != altitude.len() {
            tracing::warn!(
                distance = distance.len(),
                altitude = altitude.len(),
                "Unaligned track samples, truncating to {}",
                len
            );
        }
        distance.truncate(len);
        altitude.truncate(len);
        Self { distance, altitude }
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Cumulative distance in kilometers.
    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    /// Altitude in meters.
    pub fn altitude(&self) -> &[f64] {
        &self.altitude
    }

    /// Returns the samples as (distance, altitude) pairs in recording order.
    pub fn samples(&self) -> Vec<(f64, f64)> {
        self.distance
            .iter()
            .copied()
            .zip(self.altitude.iter().copied())
            .collect()
    }

    /// Returns the smallest and largest recorded distance, or None for an empty track.
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        if self.distance.is_empty() {
            return None;
        }
        let min = self.distance.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .distance
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Errors that can occur while reading a track document.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track source {} is unavailable", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed track document after {samples_read} samples")]
    Xml {
        #[source]
        source: xml::reader::Error,
        /// Aligned samples seen before the error; they are discarded.
        samples_read: usize,
    },
}

/// Where a track document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// A document embedded in the binary.
    Bundled {
        name: &'static str,
        document: &'static [u8],
    },
    /// A document on disk.
    File(PathBuf),
}

impl TrackSource {
    /// Looks up a bundled resource by name.
    pub fn bundled(name: &str) -> Option<Self> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|&(name, document)| TrackSource::Bundled { name, document })
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        TrackSource::File(path.into())
    }

    /// Short name for display: the resource name or the file name.
    pub fn name(&self) -> String {
        match self {
            TrackSource::Bundled { name, .. } => name.to_string(),
            TrackSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Reads and parses the whole document.
    pub fn read(&self) -> Result<Track, TrackError> {
        match self {
            TrackSource::Bundled { document, .. } => parse(*document),
            TrackSource::File(path) => read_track(path),
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSource::Bundled { name, .. } => write!(f, "bundled:{}", name),
            TrackSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Leaf elements carrying a numeric sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Altitude,
    Distance,
}

impl Leaf {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AltitudeMeters" => Some(Leaf::Altitude),
            "DistanceMeters" => Some(Leaf::Distance),
            _ => None,
        }
    }
}

/// Qualified tag name as written in the document (`prefix:local` or `local`).
fn tag_name(name: &OwnedName) -> Cow<'_, str> {
    match &name.prefix {
        Some(prefix) => Cow::Owned(format!("{}:{}", prefix, name.local_name)),
        None => Cow::Borrowed(name.local_name.as_str()),
    }
}

/// Event-driven scanner that collects samples from a track document.
#[derive(Debug, Default)]
struct TrackParser {
    /// Set on the first `Track` element and never cleared.
    in_track: bool,
    /// Leaf element currently open, if any.
    open_leaf: Option<Leaf>,
    distance: Vec<f64>,
    altitude: Vec<f64>,
}

impl TrackParser {
    fn handle(&mut self, event: XmlEvent) {
        match event {
            XmlEvent::StartElement { name, .. } => {
                let tag = tag_name(&name);
                if tag == TRACK_ELEMENT {
                    self.in_track = true;
                }
                if !self.in_track {
                    return;
                }
                if let Some(leaf) = Leaf::from_tag(&tag) {
                    self.open_leaf = Some(leaf);
                }
            }
            XmlEvent::EndElement { .. } => {
                // Any closing tag ends the current leaf, related or not.
                if self.in_track {
                    self.open_leaf = None;
                }
            }
            XmlEvent::Characters(text) => self.characters(&text),
            _ => {}
        }
    }

    fn characters(&mut self, text: &str) {
        if !self.in_track {
            return;
        }
        let Some(leaf) = self.open_leaf else {
            return;
        };
        let Ok(value) = text.parse::<f64>() else {
            tracing::trace!(?leaf, text, "Dropping non-numeric sample");
            return;
        };
        match leaf {
            Leaf::Altitude => self.altitude.push(value),
            Leaf::Distance => self.distance.push(value / METERS_PER_KM),
        }
    }

    fn samples_read(&self) -> usize {
        self.distance.len().min(self.altitude.len())
    }

    fn finish(self) -> Track {
        Track::new(self.distance, self.altitude)
    }
}

/// Streams a track document and extracts its samples.
///
/// A malformed document is rejected as a whole, never returned as a partial track.
pub fn parse<R: Read>(source: R) -> Result<Track, TrackError> {
    let reader = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(false)
        .cdata_to_characters(false)
        .create_reader(source);

    let mut parser = TrackParser::default();
    for event in reader {
        match event {
            Ok(event) => parser.handle(event),
            Err(source) => {
                return Err(TrackError::Xml {
                    source,
                    samples_read: parser.samples_read(),
                });
            }
        }
    }

    Ok(parser.finish())
}

/// Opens and parses the track document at `path`.
pub fn read_track(path: &Path) -> Result<Track, TrackError> {
    let file = File::open(path).map_err(|source| TrackError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse(BufReader::new(file))
}

/// Best-effort load: never fails, an unreadable or malformed source yields an empty track.
///
/// Any file handle is released before this returns.
pub fn load_track(source: &TrackSource) -> Track {
    match source.read() {
        Ok(track) => track,
        Err(err) => {
            tracing::warn!(%source, error = %err, "Could not load track");
            Track::default()
        }
    }
}
