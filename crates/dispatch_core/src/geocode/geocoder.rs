use std::{
    collections::HashMap,
    iter,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use dispatch_derive::New;

use super::{
    address::{build_address_query, build_alternative_queries},
    client::{NominatimClient, PlaceLookup},
    throttle::Throttle,
};
use crate::{
    Result, constants::DEFAULT_REGION, node::GeoPoint, options::DispatchOptions, order::Order,
};

/// Reported to the progress observer before every outbound request.
#[derive(Clone, Debug, New, PartialEq)]
pub struct GeocodeProgress {
    /// 1-based position of the order being resolved.
    pub current: usize,
    pub total: usize,
    pub query: String,
}

/// Shared flag that stops a running batch at the next order boundary.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resolves order addresses one request at a time under the service's rate
/// limit. Lookup failures are logged and treated as "not found".
pub struct Geocoder<L: PlaceLookup> {
    lookup: L,
    throttle: Throttle,
    region: String,
    cancel: Option<CancellationToken>,
}

impl Geocoder<NominatimClient> {
    pub fn from_options(options: &DispatchOptions) -> Result<Self> {
        let client = NominatimClient::new(&options.geocode_endpoint, &options.user_agent)?;
        Ok(Self::new(
            client,
            Duration::from_millis(options.geocode_interval_ms),
        )
        .with_region(&options.region))
    }
}

impl<L: PlaceLookup> Geocoder<L> {
    pub fn new(lookup: L, interval: Duration) -> Self {
        Self {
            lookup,
            throttle: Throttle::new(interval),
            region: DEFAULT_REGION.to_string(),
            cancel: None,
        }
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.trim().to_string();
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn interval(&self) -> Duration {
        self.throttle.interval()
    }

    /// One throttled lookup. Errors are logged and collapse to `None`.
    pub fn geocode_address(&mut self, query: &str) -> Option<GeoPoint> {
        self.throttle.wait();
        let outcome = self.lookup.search(query);
        self.throttle.record();

        match outcome {
            Ok(Some(point)) => {
                log::debug!("geocoder.lookup: hit query={query:?} point={point}");
                Some(point)
            }
            Ok(None) => {
                log::debug!("geocoder.lookup: miss query={query:?}");
                None
            }
            Err(err) => {
                log::warn!("geocoder.lookup: failed query={query:?} err={err}");
                None
            }
        }
    }

    /// Tries the full address, then each less specific alternative.
    pub fn geocode_with_fallback(&mut self, order: &Order) -> Option<GeoPoint> {
        self.geocode_order(order, &mut |_| {})
    }

    pub fn geocode_orders(&mut self, orders: &[Order]) -> HashMap<String, GeoPoint> {
        self.geocode_orders_with_progress(orders, |_| {})
    }

    /// Geocodes every order that lacks a usable location, strictly in
    /// sequence. Orders nothing could be found for are absent from the map.
    #[dispatch_derive::timer("geocoder")]
    pub fn geocode_orders_with_progress<F>(
        &mut self,
        orders: &[Order],
        mut on_progress: F,
    ) -> HashMap<String, GeoPoint>
    where
        F: FnMut(&GeocodeProgress),
    {
        let pending: Vec<&Order> = orders.iter().filter(|o| !o.has_valid_location()).collect();
        let total = pending.len();
        log::info!(
            "geocoder: start pending={total} orders={} interval_ms={}",
            orders.len(),
            self.interval().as_millis()
        );

        let mut results = HashMap::with_capacity(total);
        for (idx, order) in pending.into_iter().enumerate() {
            if self.is_cancelled() {
                log::warn!("geocoder: cancelled done={idx} pending={total}");
                break;
            }

            let current = idx + 1;
            let point = self.geocode_order(order, &mut |query| {
                on_progress(&GeocodeProgress::new(current, total, query.to_string()));
            });

            match point {
                Some(point) => {
                    log::info!("geocoder.order: id={} point={point}", order.id);
                    results.insert(order.id.clone(), point);
                }
                None => log::warn!(
                    "geocoder.order: unresolved id={} query={:?}",
                    order.id,
                    build_address_query(order)
                ),
            }
        }

        log::info!(
            "geocoder: complete resolved={} unresolved={}",
            results.len(),
            total - results.len().min(total)
        );
        results
    }

    fn geocode_order(
        &mut self,
        order: &Order,
        notify: &mut dyn FnMut(&str),
    ) -> Option<GeoPoint> {
        let region = self.region.clone();
        let cancel = self.cancel.clone();

        iter::once(build_address_query(order))
            .chain(iter::once_with(move || build_alternative_queries(order, &region)).flatten())
            .take_while(|_| !cancel.as_ref().is_some_and(CancellationToken::is_cancelled))
            .find_map(|query| {
                notify(&query);
                self.geocode_address(&query)
            })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    #[cfg(test)]
    fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + Send + 'static) -> Self {
        self.throttle = Throttle::new(self.throttle.interval()).with_sleeper(sleeper);
        self
    }
}
