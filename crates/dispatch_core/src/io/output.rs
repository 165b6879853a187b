use std::{fs::File, io::Write};

use serde::Serialize;

use crate::{
    Error, Result,
    options::DispatchOptions,
    order::Order,
    route::{OptimizationResult, RouteSummary, TechnicianRoute},
};

/// What the CLI writes: the optimization result plus reporting extras.
#[derive(Debug, Serialize)]
pub struct DispatchOutput {
    pub routes: Vec<TechnicianRoute>,
    pub unassigned_orders: Vec<Order>,
    pub total_optimized: usize,
    pub summaries: Vec<RouteSummary>,
    /// Orders whose coordinates were filled in by this run.
    pub geocoded: usize,
}

impl DispatchOutput {
    pub fn new(result: OptimizationResult, geocoded: usize) -> Self {
        let summaries = result.summaries();
        Self {
            routes: result.routes,
            unassigned_orders: result.unassigned_orders,
            total_optimized: result.total_optimized,
            summaries,
            geocoded,
        }
    }

    /// Pretty JSON to `--output` or stdout.
    pub fn write(&self, options: &DispatchOptions) -> Result<()> {
        match options.output_path() {
            Some(path) => {
                let mut file = File::create(path).map_err(|e| {
                    Error::other(format!(
                        "failed to create output file {}: {e}",
                        path.display()
                    ))
                })?;
                self.write_to(&mut file)
            }
            None => self.write_to(&mut std::io::stdout().lock()),
        }
    }

    pub(crate) fn write_to(&self, out: &mut impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
