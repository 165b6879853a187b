use std::time::Instant;

use log::{info, warn};

use dispatch_core::{
    CancellationToken, DispatchInput, DispatchOptions, DispatchOutput, Geocoder, Result,
    RouteOptimizer, apply_geocode_results, logging,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = DispatchOptions::from_args()?;
    logging::init_logger(&options)?;
    let mut input = DispatchInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone());

    let mut geocoded = 0;
    if options.geocode && input.needs_geocoding() {
        let mut geocoder = Geocoder::from_options(&options)?.with_cancellation(cancel.clone());
        let results = geocoder.geocode_orders_with_progress(&input.orders, |progress| {
            info!(
                "geocode.progress: {}/{} query={}",
                progress.current, progress.total, progress.query
            );
        });
        geocoded = apply_geocode_results(&mut input.orders, &results);
        if cancel.is_cancelled() {
            warn!("geocode: interrupted, continuing with {geocoded} new locations");
        }
    }

    let result = RouteOptimizer::new(options.seed)
        .with_strategy(options.strategy)
        .optimize(input.orders, &input.technicians);
    let output = DispatchOutput::new(result, geocoded);

    for summary in &output.summaries {
        info!("route: {summary}");
    }
    output.write(&options)?;

    info!(
        "output: routes={} optimized={} unassigned={} geocoded={} time={:.2}s",
        output.routes.len(),
        output.total_optimized,
        output.unassigned_orders.len(),
        output.geocoded,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

/// First Ctrl-C stops geocoding and lets the run finish with what it has;
/// a second one exits immediately.
fn install_interrupt_handler(cancel: CancellationToken) {
    let result = ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        eprintln!("interrupt received, stopping geocoding");
        cancel.cancel();
    });
    if let Err(e) = result {
        warn!("failed to install Ctrl-C handler: {e}");
    }
}
