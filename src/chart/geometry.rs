//! Wheel geometry: the polar coordinate convention and the marker declutter
//! pass.
//!
//! The wheel places 0 degrees of longitude at the layout's left edge and runs
//! counter-clockwise as longitude increases, the conventional chart-wheel
//! orientation.

use kurbo::Point;

/// Map an ecliptic longitude and radius to canvas coordinates.
///
/// `x = cx + r * cos((180 - L) * pi/180)`, `y = cy - r * sin(...)`.
pub fn wheel_point(cx: f64, cy: f64, longitude_deg: f64, radius: f64) -> Point {
    let theta = (180.0 - longitude_deg).to_radians();
    Point::new(cx + radius * theta.cos(), cy - radius * theta.sin())
}

/// Angular distance between two longitudes, ring-wise, in `[0, 180]`.
pub fn ring_separation(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (a_deg - b_deg).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Minimum angular separation the declutter pass aims for.
pub const DECLUTTER_MIN_SEP_DEG: f64 = 8.0;

/// Fixed iteration budget for the declutter pass.
pub const DECLUTTER_ITERATIONS: usize = 4;

/// Push apart angularly-adjacent markers closer than
/// [`DECLUTTER_MIN_SEP_DEG`], nudging both by half the deficit.
///
/// Input longitudes must be sorted ascending. The pass walks adjacent ring
/// gaps (including the wrap gap) for a fixed number of iterations. A nudge
/// only consumes a neighboring gap's slack above the threshold, so ring
/// order is preserved and a pair already below the threshold is never pushed
/// tighter. This is a heuristic declutter, not an exact solver: dense
/// clusters may retain overlap after the budget is spent, and callers must
/// not rely on the final separations reaching the threshold exactly.
pub fn declutter_longitudes(longitudes: &mut [f64]) {
    let n = longitudes.len();
    if n < 2 {
        return;
    }

    // gaps[i] runs from marker i forward to marker (i + 1) % n; the last
    // entry is the wrap gap. Sorted input makes these sum to 360.
    let mut gaps: Vec<f64> = (0..n)
        .map(|i| {
            if i + 1 < n {
                longitudes[i + 1] - longitudes[i]
            } else {
                longitudes[0] + 360.0 - longitudes[i]
            }
        })
        .collect();

    for _ in 0..DECLUTTER_ITERATIONS {
        for i in 0..n {
            if gaps[i] >= DECLUTTER_MIN_SEP_DEG {
                continue;
            }
            let half = (DECLUTTER_MIN_SEP_DEG - gaps[i]) / 2.0;
            let left = (i + n - 1) % n;
            let right = (i + 1) % n;

            // taken sequentially: with two markers the left and right
            // neighbor gaps are the same slice element
            let take_left = half.min((gaps[left] - DECLUTTER_MIN_SEP_DEG).max(0.0));
            gaps[left] -= take_left;
            gaps[i] += take_left;
            longitudes[i] -= take_left;

            let take_right = half.min((gaps[right] - DECLUTTER_MIN_SEP_DEG).max(0.0));
            gaps[right] -= take_right;
            gaps[i] += take_right;
            longitudes[right] += take_right;
        }
    }

    for l in longitudes.iter_mut() {
        *l = l.rem_euclid(360.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_point_places_zero_longitude_at_left() {
        let p = wheel_point(100.0, 100.0, 0.0, 50.0);
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn wheel_point_places_ninety_at_top() {
        let p = wheel_point(100.0, 100.0, 90.0, 50.0);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn wheel_point_runs_counter_clockwise() {
        // 180 degrees lands at the right, opposite the 0-degree point.
        let p = wheel_point(100.0, 100.0, 180.0, 50.0);
        assert!((p.x - 150.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ring_separation_wraps() {
        assert!((ring_separation(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((ring_separation(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((ring_separation(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn declutter_improves_tight_pair_monotonically() {
        let mut lons = vec![100.0, 103.0];
        let before = ring_separation(lons[0], lons[1]);
        declutter_longitudes(&mut lons);
        let after = ring_separation(lons[0], lons[1]);
        assert!(after >= before, "separation shrank: {before} -> {after}");
        assert!(after >= DECLUTTER_MIN_SEP_DEG - 1e-9);
    }

    #[test]
    fn declutter_handles_wrap_pair() {
        let mut lons = vec![1.0, 359.0];
        let before = ring_separation(lons[0], lons[1]);
        declutter_longitudes(&mut lons);
        let after = ring_separation(lons[0], lons[1]);
        assert!(after >= before);
    }

    #[test]
    fn declutter_leaves_spread_markers_alone() {
        let mut lons = vec![0.0, 90.0, 180.0, 270.0];
        declutter_longitudes(&mut lons);
        assert_eq!(lons, vec![0.0, 90.0, 180.0, 270.0]);
    }

    /// Every pair that starts below the threshold must end no closer.
    fn assert_no_tight_pair_regresses(before: &[f64], after: &[f64]) {
        for i in 0..before.len() {
            for j in (i + 1)..before.len() {
                let sep_before = ring_separation(before[i], before[j]);
                if sep_before >= DECLUTTER_MIN_SEP_DEG {
                    continue;
                }
                let sep_after = ring_separation(after[i], after[j]);
                assert!(
                    sep_after >= sep_before - 1e-9,
                    "pair ({}, {}) shrank: {sep_before} -> {sep_after}",
                    before[i],
                    before[j]
                );
            }
        }
    }

    #[test]
    fn dense_cluster_may_retain_overlap_but_never_regresses() {
        // Five bodies within 6 degrees: the fixed budget cannot fully resolve
        // this, which is accepted behavior.
        let before = vec![100.0, 101.5, 103.0, 104.5, 106.0];
        let mut lons = before.clone();
        declutter_longitudes(&mut lons);
        assert_no_tight_pair_regresses(&before, &lons);
        // ring order must survive the pass
        for w in lons.windows(2) {
            assert!(w[1] > w[0], "markers crossed: {:?}", lons);
        }
    }

    #[test]
    fn cluster_straddling_zero_never_squeezes_a_tight_pair() {
        // A lone pair near 0 degrees must not be pushed backwards into the
        // cluster sitting just below 360.
        let before = vec![1.26, 1.46, 9.87, 351.63, 356.6, 358.33];
        let mut lons = before.clone();
        declutter_longitudes(&mut lons);
        assert_no_tight_pair_regresses(&before, &lons);
    }
}
