use serde::{Deserialize, Serialize};

/// Summary figures for a run of (distance, altitude) samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStats {
    /// Number of samples.
    pub samples: usize,
    /// Distance of the first sample (km).
    pub start_km: f64,
    /// Distance of the last sample (km).
    pub end_km: f64,
    /// Lowest altitude (m).
    pub min_altitude: f64,
    /// Highest altitude (m).
    pub max_altitude: f64,
    /// Sum of positive altitude deltas between consecutive samples (m).
    pub ascent: f64,
    /// Sum of negative altitude deltas, as a positive number (m).
    pub descent: f64,
}

impl TrackStats {
    /// Computes statistics over samples, or None if there are none.
    pub fn from_samples(samples: &[(f64, f64)]) -> Option<Self> {
        let (first, last) = (samples.first()?, samples.last()?);

        let min_altitude = samples.iter().map(|s| s.1).fold(f64::INFINITY, f64::min);
        let max_altitude = samples
            .iter()
            .map(|s| s.1)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut ascent = 0.0;
        let mut descent = 0.0;
        for pair in samples.windows(2) {
            let delta = pair[1].1 - pair[0].1;
            if delta > 0.0 {
                ascent += delta;
            } else if delta < 0.0 {
                descent -= delta;
            }
        }

        Some(Self {
            samples: samples.len(),
            start_km: first.0,
            end_km: last.0,
            min_altitude,
            max_altitude,
            ascent,
            descent,
        })
    }

    /// Distance covered between the first and last sample (km).
    pub fn span_km(&self) -> f64 {
        self.end_km - self.start_km
    }
}

/// Formats a distance in kilometers (e.g., "12.35 km").
pub fn format_km(km: f64) -> String {
    format!("{:.2} km", km)
}

/// Formats an altitude or altitude delta in meters (e.g., "1204 m").
pub fn format_m(m: f64) -> String {
    format!("{:.0} m", m)
}

/// Formats large counts compactly (e.g., 200000 → "200k", 3123423 → "3.1m").
pub fn format_count(n: usize) -> String {
    if n >= 1_000_000 {
        let m = n as f64 / 1_000_000.0;
        if m >= 10.0 {
            format!("{}m", m.round() as u64)
        } else {
            format!("{:.1}m", m)
        }
    } else if n >= 1_000 {
        let k = n as f64 / 1_000.0;
        if k >= 10.0 {
            format!("{}k", k.round() as u64)
        } else {
            format!("{:.1}k", k)
        }
    } else {
        format!("{}", n)
    }
}
