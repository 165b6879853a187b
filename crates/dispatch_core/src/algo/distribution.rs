use crate::{
    order::Order,
    route::{OptimizationResult, TechnicianRoute},
};

/// Hands out located orders in north-to-south bands: sorted by latitude,
/// technician `i` gets the `i`-th consecutive block of `ceil(n / k)` orders.
///
/// Visiting order inside a block is the latitude order. Unlocated orders,
/// no technicians or no located orders behave as in `optimize_routes`.
#[dispatch_derive::timer("distribution.latitude")]
pub fn distribute_by_latitude(orders: Vec<Order>, technician_ids: &[String]) -> OptimizationResult {
    let input_len = orders.len();
    let k = technician_ids.len();

    if k == 0 || !orders.iter().any(Order::has_valid_location) {
        log::warn!("distribution.latitude: nothing to route orders={input_len} technicians={k}");
        return OptimizationResult::all_unassigned(orders);
    }

    let (mut located, unassigned): (Vec<Order>, Vec<Order>) =
        orders.into_iter().partition(Order::has_valid_location);
    // Stable, so equal latitudes keep their input order.
    located.sort_by(|a, b| latitude(b).total_cmp(&latitude(a)));

    let block = located.len().div_ceil(k);
    let mut shares: Vec<Vec<Order>> = vec![Vec::new(); k];
    for (pos, order) in located.into_iter().enumerate() {
        shares[(pos / block).min(k - 1)].push(order);
    }

    let routes: Vec<TechnicianRoute> = technician_ids
        .iter()
        .zip(shares)
        .map(|(technician_id, orders)| TechnicianRoute::new(technician_id.clone(), orders))
        .collect();

    let result = OptimizationResult::from_routes(routes, unassigned);
    log::info!(
        "distribution.latitude: complete block={block} routed={} unassigned={}",
        result.total_optimized,
        result.unassigned_orders.len()
    );
    result
}

fn latitude(order: &Order) -> f64 {
    order.valid_location().map_or(f64::NEG_INFINITY, |p| p.lat)
}

#[cfg(test)]
mod tests {
    use super::distribute_by_latitude;
    use crate::order::Order;

    fn techs(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("t{i}")).collect()
    }

    /// `n` located orders, listed south to north so sorting has work to do.
    fn column(n: usize) -> Vec<Order> {
        (0..n)
            .map(|i| Order::new(format!("o{i}")).with_location(-27.0 + i as f64 * 0.01, -48.6))
            .collect()
    }

    fn visit(result: &crate::route::OptimizationResult, idx: usize) -> Vec<&str> {
        result.routes[idx]
            .orders
            .iter()
            .map(|o| o.id.as_str())
            .collect()
    }

    #[test]
    fn blocks_run_north_to_south_in_ceil_sized_chunks() {
        let result = distribute_by_latitude(column(7), &techs(3));

        assert_eq!(result.routes.len(), 3);
        assert_eq!(visit(&result, 0), vec!["o6", "o5", "o4"]);
        assert_eq!(visit(&result, 1), vec!["o3", "o2", "o1"]);
        assert_eq!(visit(&result, 2), vec!["o0"]);
        assert_eq!(result.total_optimized, 7);
    }

    #[test]
    fn even_split_fills_every_technician() {
        let result = distribute_by_latitude(column(6), &techs(3));
        let sizes: Vec<usize> = result.routes.iter().map(|r| r.orders.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2]);
    }

    #[test]
    fn trailing_technicians_can_end_up_empty() {
        let result = distribute_by_latitude(column(4), &techs(3));
        let sizes: Vec<usize> = result.routes.iter().map(|r| r.orders.len()).collect();
        assert_eq!(sizes, vec![2, 2, 0]);
        assert_eq!(result.routes[2].technician_id, "t3");
    }

    #[test]
    fn no_share_goes_past_the_last_technician() {
        for n in 1..40 {
            for k in 1..9 {
                let result = distribute_by_latitude(column(n), &techs(k));
                assert_eq!(result.routes.len(), k, "n={n} k={k}");
                assert_eq!(result.total_optimized, n, "n={n} k={k}");
                let block = n.div_ceil(k);
                assert!(result.routes.iter().all(|r| r.orders.len() <= block));
            }
        }
    }

    #[test]
    fn no_technicians_leaves_everything_unassigned() {
        let result = distribute_by_latitude(column(3), &[]);
        assert!(result.routes.is_empty());
        assert_eq!(result.unassigned_orders.len(), 3);
        assert_eq!(result.total_optimized, 0);
    }

    #[test]
    fn unlocated_orders_are_unassigned() {
        let mut orders = column(3);
        orders.push(Order::new("zero").with_location(0.0, 0.0));
        orders.push(Order::new("null"));

        let result = distribute_by_latitude(orders, &techs(2));

        assert_eq!(result.total_optimized, 3);
        let unassigned: Vec<&str> = result.unassigned_orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(unassigned, vec!["zero", "null"]);
    }

    #[test]
    fn nothing_located_means_no_routes() {
        let result = distribute_by_latitude(vec![Order::new("a")], &techs(2));
        assert!(result.routes.is_empty());
        assert_eq!(result.unassigned_orders.len(), 1);
    }
}
