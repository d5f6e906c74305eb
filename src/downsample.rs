use crate::track::Track;

/// Keep one sample out of this many.
pub const DOWNSAMPLE_STRIDE: usize = 100;

/// Keeps every `DOWNSAMPLE_STRIDE`th sample by index (0, 100, 200, ...).
pub fn reduce(track: &Track) -> Track {
    reduce_by(track, DOWNSAMPLE_STRIDE)
}

/// Keeps every `stride`th sample, starting with the first.
pub fn reduce_by(track: &Track, stride: usize) -> Track {
    let stride = stride.max(1);
    let distance = track.distance().iter().copied().step_by(stride).collect();
    let altitude = track.altitude().iter().copied().step_by(stride).collect();
    Track::new(distance, altitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed_track(len: usize) -> Track {
        let distance = (0..len).map(|i| i as f64).collect();
        let altitude = (0..len).map(|i| i as f64 * 2.0).collect();
        Track::new(distance, altitude)
    }

    #[test]
    fn test_reduce_keeps_every_hundredth() {
        let reduced = reduce(&indexed_track(350));

        assert_eq!(reduced.len(), 4);
        assert_eq!(reduced.distance(), &[0.0, 100.0, 200.0, 300.0]);
        assert_eq!(reduced.altitude(), &[0.0, 200.0, 400.0, 600.0]);
    }

    #[test]
    fn test_reduce_short_track_keeps_first() {
        assert_eq!(reduce(&indexed_track(99)).samples(), vec![(0.0, 0.0)]);
        assert!(reduce(&Track::default()).is_empty());
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let track = indexed_track(1001);

        assert_eq!(reduce(&track), reduce(&track));
        assert_eq!(reduce(&track).len(), 11);
    }

    #[test]
    fn test_reduce_by_zero_stride_keeps_all() {
        let track = indexed_track(5);

        assert_eq!(reduce_by(&track, 0), track);
    }
}
