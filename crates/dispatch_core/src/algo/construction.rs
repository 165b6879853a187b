use crate::node::GeoPoint;

/// Greedy nearest-neighbor ordering of `members` (indices into `coords`).
///
/// Starts at the northernmost stop so routes sweep top-down, then always
/// moves to the closest unvisited stop. Earlier candidates win ties, so the
/// result only depends on the input order.
pub fn nearest_neighbor_sort(coords: &[GeoPoint], members: &[usize]) -> Vec<usize> {
    if members.len() <= 1 {
        return members.to_vec();
    }

    let mut remaining = members.to_vec();
    let start = northernmost(coords, &remaining);
    let mut tour = Vec::with_capacity(members.len());
    tour.push(remaining.remove(start));

    while !remaining.is_empty() {
        let last = coords[tour[tour.len() - 1]];
        let mut nearest = 0usize;
        let mut nearest_dist = f64::INFINITY;
        for (pos, &idx) in remaining.iter().enumerate() {
            let d = last.dist(&coords[idx]);
            if d < nearest_dist {
                nearest_dist = d;
                nearest = pos;
            }
        }
        tour.push(remaining.remove(nearest));
    }

    tour
}

fn northernmost(coords: &[GeoPoint], members: &[usize]) -> usize {
    let mut best = 0usize;
    for (pos, &idx) in members.iter().enumerate().skip(1) {
        if coords[idx].lat > coords[members[best]].lat {
            best = pos;
        }
    }
    best
}
