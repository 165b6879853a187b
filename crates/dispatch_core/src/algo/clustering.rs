use rand::{Rng, seq::index};

use crate::{constants::KMEANS_MAX_ITERATIONS, geometry, node::GeoPoint};

/// Partitions `points` into `k` geographically compact groups with k-means
/// over haversine distance. Each cluster holds indices into `points`.
///
/// Returns no clusters for `k == 0` or empty input, one singleton per point
/// when `k >= n`, and otherwise exactly `k` clusters (some possibly empty) in
/// centroid order. Which cluster covers which area depends on `rng`.
#[dispatch_derive::timer("clustering.kmeans")]
pub fn kmeans_cluster<R: Rng>(points: &[GeoPoint], k: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let n = points.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    if k >= n {
        return (0..n).map(|idx| vec![idx]).collect();
    }
    if k == 1 {
        return vec![(0..n).collect()];
    }

    let mut centroids: Vec<GeoPoint> = index::sample(rng, n, k)
        .into_iter()
        .map(|idx| points[idx])
        .collect();
    let mut assignments: Vec<Option<usize>> = vec![None; n];
    let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); k];

    let mut iterations = 0usize;
    let mut changed = true;
    while changed && iterations < KMEANS_MAX_ITERATIONS {
        changed = false;
        clusters.iter_mut().for_each(Vec::clear);

        for (idx, point) in points.iter().enumerate() {
            let nearest = nearest_centroid(point, &centroids);
            if assignments[idx] != Some(nearest) {
                assignments[idx] = Some(nearest);
                changed = true;
            }
            clusters[nearest].push(idx);
        }

        for (centroid, members) in centroids.iter_mut().zip(&clusters) {
            *centroid = if members.is_empty() {
                points[rng.random_range(0..n)]
            } else {
                geometry::centroid_of_indices(points, members)
            };
        }

        iterations += 1;
        log::trace!("clustering.kmeans: iteration={iterations} changed={changed}");
    }

    log::debug!(
        "clustering.kmeans: n={n} k={k} iterations={iterations} converged={} empty={}",
        !changed,
        clusters.iter().filter(|c| c.is_empty()).count()
    );

    clusters
}

/// Index of the closest centroid; the lowest index wins ties.
fn nearest_centroid(point: &GeoPoint, centroids: &[GeoPoint]) -> usize {
    let mut best = 0usize;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = point.dist(centroid);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}
