use crate::track::Track;

/// Returns the index of the last sample at or below `bound`.
fn last_at_or_below(distance: &[f64], bound: f64) -> Option<usize> {
    distance.iter().rposition(|&d| d <= bound)
}

/// Resolves the inclusive index range covered by the bounds.
///
/// Each bound anchors to the last sample whose distance is at or below it.
/// Returns None when either bound has no such sample or the range is inverted.
pub fn selection_indices(
    track: &Track,
    min_distance: f64,
    max_distance: f64,
) -> Option<(usize, usize)> {
    let lower = last_at_or_below(track.distance(), min_distance)?;
    let upper = last_at_or_below(track.distance(), max_distance)?;
    (lower <= upper).then_some((lower, upper))
}

/// Computes the display sequence for a pair of distance bounds.
///
/// Bounds that do not resolve to a valid slice select the whole track, so a
/// non-empty track always yields a non-empty sequence.
pub fn select(track: &Track, min_distance: f64, max_distance: f64) -> Vec<(f64, f64)> {
    let samples = track.samples();
    match selection_indices(track, min_distance, max_distance) {
        Some((lower, upper)) => samples[lower..=upper].to_vec(),
        None => samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_track() -> Track {
        Track::new(
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0],
            vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
        )
    }

    #[test]
    fn test_select_between_samples() {
        let track = scenario_track();

        assert_eq!(selection_indices(&track, 3.0, 7.0), Some((1, 3)));
        assert_eq!(
            select(&track, 3.0, 7.0),
            vec![(2.0, 20.0), (4.0, 30.0), (6.0, 40.0)]
        );
    }

    #[test]
    fn test_select_last_match_tie_break() {
        let track = Track::new(vec![0.0, 1.0, 1.0, 2.0, 3.0], vec![0.0; 5]);

        let (lower, _) = selection_indices(&track, 1.0, 3.0).unwrap();
        assert_eq!(lower, 2);
    }

    #[test]
    fn test_select_inclusive_on_exact_bounds() {
        let track = scenario_track();

        let selected = select(&track, 2.0, 8.0);
        assert_eq!(selected.len(), 4);
        assert_eq!(selected.first(), Some(&(2.0, 20.0)));
        assert_eq!(selected.last(), Some(&(8.0, 50.0)));
    }

    #[test]
    fn test_select_bounds_below_track_fail_open() {
        let track = scenario_track();

        assert_eq!(selection_indices(&track, -100.0, -50.0), None);
        assert_eq!(select(&track, -100.0, -50.0), track.samples());
    }

    #[test]
    fn test_select_min_below_first_sample_fail_open() {
        let track = scenario_track();

        assert_eq!(select(&track, -1.0, 4.0), track.samples());
    }

    #[test]
    fn test_select_max_above_last_sample() {
        let track = scenario_track();

        assert_eq!(select(&track, 5.0, 500.0), track.samples()[2..].to_vec());
    }

    #[test]
    fn test_select_equal_bounds() {
        let track = scenario_track();

        assert_eq!(select(&track, 4.0, 4.0), vec![(4.0, 30.0)]);
        assert_eq!(select(&track, 5.0, 5.0), vec![(4.0, 30.0)]);
    }

    #[test]
    fn test_select_inverted_bounds_fail_open() {
        let track = scenario_track();

        assert_eq!(select(&track, 8.0, 2.0), track.samples());
    }

    #[test]
    fn test_select_nan_bound_fail_open() {
        let track = scenario_track();

        assert_eq!(select(&track, f64::NAN, 4.0), track.samples());
    }

    #[test]
    fn test_select_empty_track() {
        let track = Track::default();

        assert!(select(&track, 0.0, 10.0).is_empty());
    }
}
