use crate::logging::SelectionSnapshot;
use crate::state::{Bound, Change, Phase, ViewState};
use crate::stats::TrackStats;
use chrono::{DateTime, Local};
use tokio::sync::mpsc;

/// Main application state.
pub struct App {
    /// Track, bounds and derived data.
    pub view: ViewState,
    /// Bound the arrow keys move.
    pub focus: Bound,
    /// Distance moved per key press (km).
    pub step: f64,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Statistics for the whole loaded track.
    pub track_stats: Option<TrackStats>,
    /// Last status line and when it was set.
    pub status: Option<(DateTime<Local>, String)>,
    /// Change notifications from the view state.
    changes: mpsc::UnboundedReceiver<Change>,
}

impl App {
    pub fn new(mut view: ViewState, step: f64) -> Self {
        let changes = view.subscribe();
        Self {
            view,
            focus: Bound::Min,
            step,
            should_quit: false,
            track_stats: None,
            status: None,
            changes,
        }
    }

    /// Drains pending change notifications, refreshing derived state.
    pub fn process_updates(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            if change == Change::Track {
                self.track_stats = TrackStats::from_samples(&self.view.track().samples());
            }
        }
    }

    /// Loads the track if nothing is loaded yet.
    pub fn load(&mut self) {
        if self.view.phase() == Phase::Loaded {
            return;
        }
        self.view.load();
        if self.view.phase() == Phase::Empty {
            self.set_status(format!("No track data in {}", self.view.source()));
        }
    }

    /// Switches which bound the arrow keys move.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Bound::Min => Bound::Max,
            Bound::Max => Bound::Min,
        };
    }

    /// Moves the focused bound by `steps` increments, staying within the data range.
    pub fn nudge(&mut self, steps: f64) {
        let Some((lo, hi)) = self.view.data_range() else {
            return;
        };
        let value = (self.view.bound(self.focus) + steps * self.step)
            .max(lo)
            .min(hi);
        self.set_focused(value);
    }

    fn set_focused(&mut self, value: f64) {
        match self.focus {
            Bound::Min => self.view.set_min_distance(value),
            Bound::Max => self.view.set_max_distance(value),
        }
    }

    /// Moves the focused bound to the start of the data range.
    pub fn jump_start(&mut self) {
        if let Some((lo, _)) = self.view.data_range() {
            self.set_focused(lo);
        }
    }

    /// Moves the focused bound to the end of the data range.
    pub fn jump_end(&mut self) {
        if let Some((_, hi)) = self.view.data_range() {
            self.set_focused(hi);
        }
    }

    pub fn toggle_downsample(&mut self) {
        let enabled = !self.view.downsample();
        self.view.set_downsample(enabled);
        self.set_status(if enabled {
            "Downsampling on".to_string()
        } else {
            "Downsampling off".to_string()
        });
    }

    /// Saves the current selection as a snapshot.
    pub fn save_snapshot(&mut self) {
        if self.view.phase() == Phase::Empty {
            return;
        }
        let snapshot = SelectionSnapshot::new(
            self.view.source(),
            self.view.downsample(),
            (self.view.min_distance(), self.view.max_distance()),
            self.view.current_display_data(),
        );
        match snapshot.save() {
            Ok(path) => self.set_status(format!("Snapshot saved to {}", path.display())),
            Err(e) => {
                tracing::warn!(error = %e, "Snapshot failed");
                self.set_status(format!("Snapshot failed: {}", e));
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((Local::now(), message));
    }

    /// Signals the app to quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
