use crate::node::GeoPoint;

/// Mean latitude and longitude. `(0, 0)` for no points, which callers must
/// not treat as a location.
pub fn calculate_centroid(points: &[GeoPoint]) -> GeoPoint {
    if points.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let (sum_lat, sum_lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    let n = points.len() as f64;
    GeoPoint::new(sum_lat / n, sum_lng / n)
}

pub(crate) fn centroid_of_indices(coords: &[GeoPoint], idxs: &[usize]) -> GeoPoint {
    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    for &i in idxs {
        sum_lat += coords[i].lat;
        sum_lng += coords[i].lng;
    }
    let n = idxs.len().max(1) as f64;
    GeoPoint::new(sum_lat / n, sum_lng / n)
}

/// Length in kilometers of the open path visiting `points` in order.
pub fn route_distance(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| w[0].dist(&w[1])).sum()
}

/// Open-path length of an index tour over `coords`.
pub(crate) fn path_length(coords: &[GeoPoint], tour: &[usize]) -> f64 {
    tour.windows(2).map(|w| coords[w[0]].dist(&coords[w[1]])).sum()
}
