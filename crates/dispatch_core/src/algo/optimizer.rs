use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    clustering, construction, distribution,
    node::GeoPoint,
    options::RouteStrategy,
    order::Order,
    route::{OptimizationResult, TechnicianRoute},
    two_opt,
};

/// Splits orders with the chosen strategy. The k-means strategy runs with
/// either a fixed seed (reproducible assignments) or OS entropy.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteOptimizer {
    seed: Option<u64>,
    strategy: RouteStrategy,
}

impl RouteOptimizer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            strategy: RouteStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: RouteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn optimize(&self, orders: Vec<Order>, technician_ids: &[String]) -> OptimizationResult {
        if self.strategy == RouteStrategy::Latitude {
            return distribution::distribute_by_latitude(orders, technician_ids);
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        optimize_routes(orders, technician_ids, &mut rng)
    }
}

/// Splits geocoded `orders` between technicians and sequences each share.
///
/// Orders without a usable location come back in `unassigned_orders`. With
/// no technicians or no located orders nothing is routed. Technician `i`
/// receives cluster `i`, or an empty route when clustering produced fewer
/// clusters than technicians.
#[dispatch_derive::timer("optimizer")]
pub fn optimize_routes<R: Rng>(
    orders: Vec<Order>,
    technician_ids: &[String],
    rng: &mut R,
) -> OptimizationResult {
    let input_len = orders.len();
    log::info!(
        "optimizer: start orders={input_len} technicians={}",
        technician_ids.len()
    );

    if technician_ids.is_empty() || !orders.iter().any(Order::has_valid_location) {
        log::warn!(
            "optimizer: nothing to route orders={input_len} technicians={}",
            technician_ids.len()
        );
        return OptimizationResult::all_unassigned(orders);
    }

    let mut coords: Vec<GeoPoint> = Vec::new();
    let mut located: Vec<Option<Order>> = Vec::new();
    let mut unassigned: Vec<Order> = Vec::new();
    for order in orders {
        match order.valid_location() {
            Some(point) => {
                coords.push(point);
                located.push(Some(order));
            }
            None => unassigned.push(order),
        }
    }

    let clusters = clustering::kmeans_cluster(&coords, technician_ids.len(), rng);

    let tours: Vec<Vec<usize>> = (0..technician_ids.len())
        .into_par_iter()
        .map(|idx| {
            let members = clusters.get(idx).map(Vec::as_slice).unwrap_or_default();
            let mut tour = construction::nearest_neighbor_sort(&coords, members);
            two_opt::two_opt_optimize(&coords, &mut tour);
            tour
        })
        .collect();

    let routes: Vec<TechnicianRoute> = technician_ids
        .iter()
        .zip(tours)
        .map(|(technician_id, tour)| {
            let orders: Vec<Order> = tour
                .into_iter()
                .filter_map(|idx| located[idx].take())
                .collect();
            log::debug!(
                "optimizer.route: technician={technician_id} orders={}",
                orders.len()
            );
            TechnicianRoute::new(technician_id.clone(), orders)
        })
        .collect();

    let result = OptimizationResult::from_routes(routes, unassigned);
    debug_assert_eq!(
        result.total_optimized + result.unassigned_orders.len(),
        input_len
    );
    log::info!(
        "optimizer: complete routed={} unassigned={}",
        result.total_optimized,
        result.unassigned_orders.len()
    );
    result
}

/// Writes geocoded locations onto the matching orders. Returns how many
/// orders were updated.
pub fn apply_geocode_results(orders: &mut [Order], results: &HashMap<String, GeoPoint>) -> usize {
    let mut patched = 0usize;
    for order in orders.iter_mut() {
        if let Some(point) = results.get(&order.id) {
            order.location = Some(*point);
            patched += 1;
        }
    }
    log::debug!("optimizer.patch: updated={patched} of={}", orders.len());
    patched
}
