use crate::{
    constants::{MIN_TOUR_SIZE_FOR_2OPT, TWO_OPT_IMPROVEMENT_EPSILON, TWO_OPT_MAX_PASSES},
    geometry,
    node::GeoPoint,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TwoOptStats {
    pub passes: usize,
    pub swaps: usize,
}

/// First-improvement 2-opt over an open path (no edge from the last stop
/// back to the first). Reverses `tour[i+1..=j]` whenever that replaces
/// edges `(i,i+1)` and `(j,j+1)` with strictly shorter `(i,j)` and
/// `(i+1,j+1)`. Never lengthens the path.
pub fn two_opt_optimize(coords: &[GeoPoint], tour: &mut [usize]) -> TwoOptStats {
    let n = tour.len();
    if n < MIN_TOUR_SIZE_FOR_2OPT {
        log::trace!("route.2opt: skip n={n} reason=insufficient_size");
        return TwoOptStats::default();
    }

    let dist = |a: usize, b: usize| coords[a].dist(&coords[b]);
    let km_before = geometry::path_length(coords, tour);
    let mut stats = TwoOptStats::default();

    for pass_idx in 0..TWO_OPT_MAX_PASSES {
        stats.passes = pass_idx + 1;
        let mut pass_swaps = 0usize;

        for i in 0..(n - 2) {
            for j in (i + 2)..(n - 1) {
                let current = dist(tour[i], tour[i + 1]) + dist(tour[j], tour[j + 1]);
                let proposal = dist(tour[i], tour[j]) + dist(tour[i + 1], tour[j + 1]);

                if proposal < current - TWO_OPT_IMPROVEMENT_EPSILON {
                    tour[(i + 1)..=j].reverse();
                    pass_swaps += 1;
                }
            }
        }

        stats.swaps += pass_swaps;
        log::trace!("route.2opt: pass={} swaps={pass_swaps}", pass_idx + 1);
        if pass_swaps == 0 {
            break;
        }
    }

    log::debug!(
        "route.2opt: complete n={n} passes={} swaps={} km_before={km_before:.3} km_after={:.3}",
        stats.passes,
        stats.swaps,
        geometry::path_length(coords, tour)
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::two_opt_optimize;
    use crate::{geometry::path_length, node::GeoPoint};

    fn sorted(mut values: Vec<usize>) -> Vec<usize> {
        values.sort_unstable();
        values
    }

    fn scattered(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| {
                let f = i as f64;
                GeoPoint::new(-26.9 + (f * 2.17).sin() * 0.15, -48.6 + (f * 1.31).cos() * 0.15)
            })
            .collect()
    }

    #[test]
    fn three_stops_or_fewer_are_left_alone() {
        let coords = vec![
            GeoPoint::new(-26.0, -48.0),
            GeoPoint::new(-26.5, -48.0),
            GeoPoint::new(-26.1, -48.0),
        ];
        for len in 0..=3 {
            let mut tour: Vec<usize> = (0..len).rev().collect();
            let original = tour.clone();
            let stats = two_opt_optimize(&coords, &mut tour);
            assert_eq!(tour, original);
            assert_eq!(stats.swaps, 0);
        }
    }

    #[test]
    fn uncrosses_a_zigzag() {
        // A line of stops visited out of order: 0, 2, 1, 3.
        let coords = vec![
            GeoPoint::new(-26.0, -48.6),
            GeoPoint::new(-26.1, -48.6),
            GeoPoint::new(-26.2, -48.6),
            GeoPoint::new(-26.3, -48.6),
        ];
        let mut tour = vec![0, 2, 1, 3];
        let before = path_length(&coords, &tour);

        let stats = two_opt_optimize(&coords, &mut tour);

        assert_eq!(tour, vec![0, 1, 2, 3]);
        assert!(stats.swaps >= 1);
        assert!(path_length(&coords, &tour) < before);
    }

    #[test]
    fn endpoints_stay_in_place() {
        let coords = scattered(12);
        let mut tour: Vec<usize> = (0..12).collect();
        two_opt_optimize(&coords, &mut tour);
        assert_eq!(tour[0], 0);
        assert_eq!(tour[11], 11);
    }

    #[test]
    fn never_lengthens_and_keeps_every_stop() {
        for n in 4..30 {
            let coords = scattered(n);
            let mut tour: Vec<usize> = (0..n).rev().collect();
            let before = path_length(&coords, &tour);

            two_opt_optimize(&coords, &mut tour);

            assert!(path_length(&coords, &tour) <= before + 1e-9, "n={n}");
            assert_eq!(sorted(tour), (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn optimal_path_is_a_fixed_point() {
        let coords = vec![
            GeoPoint::new(-26.0, -48.6),
            GeoPoint::new(-26.1, -48.6),
            GeoPoint::new(-26.2, -48.6),
            GeoPoint::new(-26.3, -48.6),
            GeoPoint::new(-26.4, -48.6),
        ];
        let mut tour = vec![0, 1, 2, 3, 4];
        let stats = two_opt_optimize(&coords, &mut tour);
        assert_eq!(tour, vec![0, 1, 2, 3, 4]);
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.swaps, 0);
    }
}
