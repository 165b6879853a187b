use std::fmt;

use dispatch_derive::New;
use serde::Serialize;

use crate::{geometry, node::GeoPoint, order::Order};

/// Visiting sequence handed to one technician.
#[derive(Clone, Debug, Default, New, Serialize)]
pub struct TechnicianRoute {
    pub technician_id: String,
    pub orders: Vec<Order>,
}

impl TechnicianRoute {
    pub fn points(&self) -> Vec<GeoPoint> {
        self.orders.iter().filter_map(Order::valid_location).collect()
    }

    /// Open-path length in kilometers.
    pub fn distance_km(&self) -> f64 {
        geometry::route_distance(&self.points())
    }

    pub fn summary(&self) -> RouteSummary {
        let points = self.points();
        let longest_leg_km = points
            .windows(2)
            .map(|w| w[0].dist(&w[1]))
            .fold(0.0_f64, f64::max);

        RouteSummary::new(
            self.technician_id.clone(),
            self.orders.len(),
            geometry::route_distance(&points),
            longest_leg_km,
        )
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct OptimizationResult {
    pub routes: Vec<TechnicianRoute>,
    pub unassigned_orders: Vec<Order>,
    pub total_optimized: usize,
}

impl OptimizationResult {
    pub(crate) fn all_unassigned(orders: Vec<Order>) -> Self {
        Self {
            routes: Vec::new(),
            unassigned_orders: orders,
            total_optimized: 0,
        }
    }

    pub(crate) fn from_routes(routes: Vec<TechnicianRoute>, unassigned_orders: Vec<Order>) -> Self {
        let total_optimized = routes.iter().map(|r| r.orders.len()).sum();
        Self {
            routes,
            unassigned_orders,
            total_optimized,
        }
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(TechnicianRoute::summary).collect()
    }
}

/// Per-technician reporting figures. Not used for any routing decision.
#[derive(Clone, Debug, Default, New, PartialEq, Serialize)]
pub struct RouteSummary {
    pub technician_id: String,
    pub stops: usize,
    pub distance_km: f64,
    pub longest_leg_km: f64,
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "technician={} stops={} distance_km={:.3} longest_leg_km={:.3}",
            self.technician_id, self.stops, self.distance_km, self.longest_leg_km
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{OptimizationResult, TechnicianRoute};
    use crate::order::Order;

    fn route() -> TechnicianRoute {
        TechnicianRoute::new(
            "tech-1".to_string(),
            vec![
                Order::new("a").with_location(-26.90, -48.66),
                Order::new("b").with_location(-26.91, -48.66),
                Order::new("c").with_location(-26.95, -48.66),
            ],
        )
    }

    #[test]
    fn summary_reports_stops_distance_and_longest_leg() {
        let summary = route().summary();

        assert_eq!(summary.technician_id, "tech-1");
        assert_eq!(summary.stops, 3);
        assert!((summary.distance_km - 5.56).abs() < 0.05, "{summary:?}");
        assert!((summary.longest_leg_km - 4.45).abs() < 0.05, "{summary:?}");
    }

    #[test]
    fn summary_display_is_a_single_log_line() {
        let line = route().summary().to_string();
        assert!(line.starts_with("technician=tech-1 stops=3 distance_km="), "{line}");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn empty_route_has_zero_distance() {
        let empty = TechnicianRoute::new("tech-2".to_string(), Vec::new());
        assert_eq!(empty.distance_km(), 0.0);
        assert_eq!(empty.summary().longest_leg_km, 0.0);
    }

    #[test]
    fn totals_are_derived_from_routes() {
        let result = OptimizationResult::from_routes(vec![route()], vec![Order::new("z")]);
        assert_eq!(result.total_optimized, 3);
        assert_eq!(result.unassigned_orders.len(), 1);
        assert_eq!(result.summaries().len(), 1);
    }
}
