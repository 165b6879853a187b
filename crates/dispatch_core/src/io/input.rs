use std::{collections::HashSet, fs, io::Read};

use dispatch_derive::KvDisplay;
use serde::Deserialize;

use crate::{Error, Result, options::DispatchOptions, order::Order};

/// Orders to route and the technicians to route them for.
#[derive(Clone, Debug, KvDisplay)]
pub struct DispatchInput {
    #[kv(fmt = "len")]
    pub technicians: Vec<String>,
    #[kv(fmt = "len")]
    pub orders: Vec<Order>,
    located: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Dispatch {
        #[serde(default)]
        technicians: Vec<String>,
        orders: Vec<Order>,
    },
    Orders(Vec<Order>),
}

impl DispatchInput {
    pub fn new(technicians: Vec<String>, orders: Vec<Order>) -> Result<Self> {
        let technicians = clean_technicians(technicians)?;
        ensure_unique_order_ids(&orders)?;
        let located = orders.iter().filter(|o| o.has_valid_location()).count();
        Ok(Self {
            technicians,
            orders,
            located,
        })
    }

    /// Reads the document from `--input` or stdin. `--technicians` replaces
    /// the document's technician list.
    pub fn from_options(options: &DispatchOptions) -> Result<Self> {
        let raw = match options.input_path() {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("failed to read input {}: {e}", path.display()))
            })?,
            None => {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                raw
            }
        };
        Self::parse(&raw, options.technician_ids())
    }

    pub(crate) fn parse(raw: &str, technician_override: Option<Vec<String>>) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::invalid_input("No dispatch document provided."));
        }
        let (technicians, orders) = match serde_json::from_str::<InputDocument>(raw) {
            Ok(InputDocument::Dispatch {
                technicians,
                orders,
            }) => (technicians, orders),
            Ok(InputDocument::Orders(orders)) => (Vec::new(), orders),
            Err(e) => {
                return Err(Error::invalid_input(format!(
                    "expected {{\"technicians\": [..], \"orders\": [..]}} or an array of orders: {e}"
                )));
            }
        };
        Self::new(technician_override.unwrap_or(technicians), orders)
    }

    pub fn located(&self) -> usize {
        self.located
    }

    pub fn needs_geocoding(&self) -> bool {
        self.located < self.orders.len()
    }
}

fn clean_technicians(technicians: Vec<String>) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(technicians.len());
    for id in technicians {
        let id = id.trim().to_string();
        if id.is_empty() {
            continue;
        }
        if !seen.insert(id.clone()) {
            return Err(Error::invalid_input(format!("duplicate technician id: {id}")));
        }
        cleaned.push(id);
    }
    Ok(cleaned)
}

fn ensure_unique_order_ids(orders: &[Order]) -> Result<()> {
    let mut seen = HashSet::with_capacity(orders.len());
    for order in orders {
        if !seen.insert(order.id.as_str()) {
            return Err(Error::invalid_input(format!(
                "duplicate order id: {}",
                order.id
            )));
        }
    }
    Ok(())
}
