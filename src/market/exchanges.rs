// src/market/exchanges.rs

use crate::market::traits::{Exchange, Request};
use crate::model::error::ReactorError;
use crate::model::material::{Lot, Material};
use log::warn;
use rand::Rng;

/// Shared bookkeeping: which commodities are served and the next lot id.
#[derive(Debug, Clone)]
struct Supplier {
    commodities: Vec<String>,
    next_lot_id: u64,
}

impl Supplier {
    fn new(commodities: Vec<String>) -> Self {
        Self {
            commodities,
            next_lot_id: 1,
        }
    }

    /// An empty commodity list serves everything.
    fn serves(&self, request: &Request) -> bool {
        self.commodities.is_empty() || self.commodities.contains(&request.commodity)
    }

    fn fill(&mut self, request: &Request) -> Material {
        let lot = Lot::new(
            self.next_lot_id,
            request.desired_quantity(),
            request.target.composition().clone(),
        );
        self.next_lot_id += 1;
        Material::Tracked(lot)
    }
}

// =========================================================================
// 1. Reliable Exchange
// =========================================================================

/// Fills every request for a served commodity, every step.
#[derive(Debug, Clone)]
pub struct ReliableExchange {
    supplier: Supplier,
}

impl ReliableExchange {
    pub fn new(commodities: Vec<String>) -> Self {
        Self {
            supplier: Supplier::new(commodities),
        }
    }
}

impl Exchange for ReliableExchange {
    fn resolve(&mut self, _step: usize, requests: &[Request]) -> Vec<Material> {
        let mut delivered = Vec::with_capacity(requests.len());
        for request in requests {
            if self.supplier.serves(request) {
                delivered.push(self.supplier.fill(request));
            }
        }
        delivered
    }
}

// =========================================================================
// 2. Scheduled Exchange
// =========================================================================

/// Supply follows an availability schedule (see `io::supply`).
///
/// Step `n` reads `availability[n - 1]`; steps past the end are treated as
/// outages.
#[derive(Debug, Clone)]
pub struct ScheduledExchange {
    supplier: Supplier,
    availability: Vec<bool>,
}

impl ScheduledExchange {
    pub fn new(commodities: Vec<String>, availability: Vec<bool>) -> Self {
        Self {
            supplier: Supplier::new(commodities),
            availability,
        }
    }

    fn is_available(&self, step: usize) -> bool {
        step
            .checked_sub(1)
            .and_then(|i| self.availability.get(i))
            .copied()
            .unwrap_or(false)
    }
}

impl Exchange for ScheduledExchange {
    fn resolve(&mut self, step: usize, requests: &[Request]) -> Vec<Material> {
        if !self.is_available(step) {
            if !requests.is_empty() {
                warn!(
                    "step {}: supply outage, {} request(s) lapse",
                    step,
                    requests.len()
                );
            }
            return Vec::new();
        }

        let mut delivered = Vec::with_capacity(requests.len());
        for request in requests {
            if self.supplier.serves(request) {
                delivered.push(self.supplier.fill(request));
            }
        }
        delivered
    }
}

// =========================================================================
// 3. Random Exchange
// =========================================================================

/// Fills each served request independently with a fixed probability.
/// Useful for simulating an unreliable supply chain.
#[derive(Debug, Clone)]
pub struct RandomExchange {
    supplier: Supplier,
    fill_probability: f64,
}

impl RandomExchange {
    pub fn new(commodities: Vec<String>, fill_probability: f64) -> Result<Self, ReactorError> {
        if !(0.0..=1.0).contains(&fill_probability) {
            return Err(ReactorError::InvalidConfig(format!(
                "fill probability must be within [0, 1], got {}",
                fill_probability
            )));
        }
        Ok(Self {
            supplier: Supplier::new(commodities),
            fill_probability,
        })
    }
}

impl Exchange for RandomExchange {
    fn resolve(&mut self, step: usize, requests: &[Request]) -> Vec<Material> {
        let mut rng = rand::thread_rng();
        let mut delivered = Vec::with_capacity(requests.len());
        for request in requests {
            if !self.supplier.serves(request) {
                continue;
            }
            if rng.gen_bool(self.fill_probability) {
                delivered.push(self.supplier.fill(request));
            } else {
                warn!("step {}: {} request went unfilled", step, request.commodity);
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::traits::RequestKind;
    use crate::model::material::Composition;

    fn request(kind: RequestKind, commodity: &str) -> Request {
        Request {
            kind,
            commodity: commodity.to_string(),
            target: Material::target(1000.0, Composition::new().with("U235", 0.04)),
            constraint: 1000.0,
        }
    }

    fn both() -> Vec<Request> {
        vec![
            request(RequestKind::Spot, "uox"),
            request(RequestKind::Contract, "uox-contract"),
        ]
    }

    #[test]
    fn reliable_fills_every_request_with_tracked_lots() {
        let mut exchange = ReliableExchange::new(Vec::new());
        let delivered = exchange.resolve(1, &both());
        assert_eq!(delivered.len(), 2);
        assert!(delivered
            .iter()
            .all(|m| matches!(m, Material::Tracked(_))));
        assert!(delivered.iter().all(|m| m.quantity() == 1000.0));

        let ids: Vec<u64> = delivered
            .into_iter()
            .map(|m| m.into_lot().unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn commodity_filter_skips_unserved_requests() {
        let mut exchange = ReliableExchange::new(vec!["uox".to_string()]);
        let delivered = exchange.resolve(1, &both());
        assert_eq!(delivered.len(), 1);
    }

    #[test]
    fn scheduled_exchange_follows_availability() {
        let mut exchange = ScheduledExchange::new(Vec::new(), vec![true, false]);
        assert_eq!(exchange.resolve(1, &both()).len(), 2);
        assert!(exchange.resolve(2, &both()).is_empty());
        // Past the end of the schedule.
        assert!(exchange.resolve(3, &both()).is_empty());
        assert!(exchange.resolve(0, &both()).is_empty());
    }

    #[test]
    fn random_exchange_extremes_are_deterministic() {
        let mut always = RandomExchange::new(Vec::new(), 1.0).unwrap();
        assert_eq!(always.resolve(1, &both()).len(), 2);

        let mut never = RandomExchange::new(Vec::new(), 0.0).unwrap();
        assert!(never.resolve(1, &both()).is_empty());
    }

    #[test]
    fn random_exchange_rejects_bad_probability() {
        assert!(matches!(
            RandomExchange::new(Vec::new(), 1.5),
            Err(ReactorError::InvalidConfig(_))
        ));
    }
}
