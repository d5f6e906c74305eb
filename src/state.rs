use crate::downsample;
use crate::select;
use crate::track::{self, Track, TrackSource};
use std::borrow::Cow;
use tokio::sync::mpsc;

/// What changed in the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Track data (or the data derived from it) was replaced.
    Track,
    /// One or both selection bounds moved.
    Bounds,
}

/// Whether a track is available for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
}

/// Which selection bound an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// Owns the loaded track and the selection bounds, and derives display data from them.
pub struct ViewState {
    /// Track document read by `load()`.
    source: TrackSource,
    track: Track,
    min_distance: f64,
    max_distance: f64,
    /// Whether `data()` applies the stride reduction.
    downsample: bool,
    observers: Vec<mpsc::UnboundedSender<Change>>,
}

impl ViewState {
    pub fn new(source: TrackSource, downsample: bool) -> Self {
        Self {
            source,
            track: Track::default(),
            min_distance: 0.0,
            max_distance: 0.0,
            downsample,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for change notifications.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Change> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    fn notify(&mut self, change: Change) {
        self.observers.retain(|tx| tx.send(change).is_ok());
    }

    /// Parses the source document and replaces the current track.
    ///
    /// An unavailable or malformed source leaves the state untouched.
    pub fn load(&mut self) {
        tracing::info!(source = %self.source, "Loading track");
        let track = track::load_track(&self.source);
        if track.is_empty() {
            tracing::warn!(source = %self.source, "No samples loaded");
            return;
        }
        self.set_track(track);
    }

    /// Installs a parsed track and derives the bounds from its distance range.
    ///
    /// The range is taken over the aligned track, after any unpaired tail was dropped.
    pub fn set_track(&mut self, track: Track) {
        let (min, max) = track.distance_range().unwrap_or((0.0, 0.0));
        tracing::info!(
            samples = track.len(),
            min_km = min,
            max_km = max,
            "Track loaded"
        );
        self.track = track;
        self.min_distance = min;
        self.max_distance = max;
        self.notify(Change::Track);
        self.notify(Change::Bounds);
    }

    pub fn phase(&self) -> Phase {
        if self.track.is_empty() {
            Phase::Empty
        } else {
            Phase::Loaded
        }
    }

    pub fn source(&self) -> &TrackSource {
        &self.source
    }

    /// The full track as parsed.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// The track the selection works on: full, or reduced when downsampling is on.
    pub fn data(&self) -> Cow<'_, Track> {
        if self.downsample {
            Cow::Owned(downsample::reduce(&self.track))
        } else {
            Cow::Borrowed(&self.track)
        }
    }

    /// Selected subsequence of `data()` for the current bounds, recomputed on each call.
    pub fn current_display_data(&self) -> Vec<(f64, f64)> {
        select::select(&self.data(), self.min_distance, self.max_distance)
    }

    /// First and last distance of `data()`, when the first is strictly below the last.
    ///
    /// This is the range the bound controls move over.
    pub fn data_range(&self) -> Option<(f64, f64)> {
        let data = self.data();
        let first = *data.distance().first()?;
        let last = *data.distance().last()?;
        (first < last).then_some((first, last))
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn bound(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Min => self.min_distance,
            Bound::Max => self.max_distance,
        }
    }

    pub fn set_min_distance(&mut self, value: f64) {
        self.set_bound(Bound::Min, value);
    }

    pub fn set_max_distance(&mut self, value: f64) {
        self.set_bound(Bound::Max, value);
    }

    /// Writes a bound, clamped into the track's distance range once loaded.
    fn set_bound(&mut self, bound: Bound, value: f64) {
        if !value.is_finite() {
            return;
        }
        let value = match self.track.distance_range() {
            Some((lo, hi)) if lo <= hi => value.max(lo).min(hi),
            _ => value,
        };
        let slot = match bound {
            Bound::Min => &mut self.min_distance,
            Bound::Max => &mut self.max_distance,
        };
        *slot = value;
        tracing::debug!(?bound, value, "Bound changed");
        self.notify(Change::Bounds);
    }

    pub fn downsample(&self) -> bool {
        self.downsample
    }

    pub fn set_downsample(&mut self, enabled: bool) {
        if self.downsample == enabled {
            return;
        }
        self.downsample = enabled;
        tracing::info!(enabled, "Downsampling toggled");
        self.notify(Change::Track);
    }
}
