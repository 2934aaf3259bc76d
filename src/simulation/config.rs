// src/simulation/config.rs

use crate::io::supply;
use crate::market::exchanges::{RandomExchange, ReliableExchange, ScheduledExchange};
use crate::market::traits::Exchange;
use crate::model::error::ReactorError;
use crate::model::reactor::ReactorConfig;

/// When the scheduled market has fuel to sell.
#[derive(Debug, Clone, PartialEq)]
pub enum SupplySchedule {
    Constant,
    /// Each step is an outage with this probability.
    RandomOutages { probability: f64 },
    /// One outage of `length` steps starting at step `start`.
    OutageWindow { start: usize, length: usize },
}

/// Which market the reactor trades with.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketScenario {
    Reliable,
    Scheduled(SupplySchedule),
    Random { fill_probability: f64 },
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub max_steps: usize,
    pub market: MarketScenario,
    /// When false the market only sells the spot commodity and contract
    /// requests lapse.
    pub contracts_traded: bool,
    pub reactor: ReactorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: 120,
            market: MarketScenario::Scheduled(SupplySchedule::RandomOutages { probability: 0.05 }),
            contracts_traded: false,
            reactor: ReactorConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Builds the market described by `market`.
    pub fn build_exchange(&self) -> Result<Box<dyn Exchange>, ReactorError> {
        let commodities = if self.contracts_traded {
            Vec::new()
        } else {
            vec![self.reactor.commodity.clone()]
        };

        let exchange: Box<dyn Exchange> = match &self.market {
            MarketScenario::Reliable => Box::new(ReliableExchange::new(commodities)),
            MarketScenario::Scheduled(schedule) => {
                let availability = match schedule {
                    SupplySchedule::Constant => {
                        supply::generate_constant_availability(self.max_steps)
                    }
                    SupplySchedule::RandomOutages { probability } => {
                        supply::generate_random_outages(self.max_steps, *probability)?
                    }
                    SupplySchedule::OutageWindow { start, length } => {
                        supply::generate_outage_window(self.max_steps, *start, *length)
                    }
                };
                Box::new(ScheduledExchange::new(commodities, availability))
            }
            MarketScenario::Random { fill_probability } => {
                Box::new(RandomExchange::new(commodities, *fill_probability)?)
            }
        };
        Ok(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::traits::{Request, RequestKind};
    use crate::model::material::{Composition, Material};

    fn requests() -> Vec<Request> {
        [(RequestKind::Spot, "uox"), (RequestKind::Contract, "uox-contract")]
            .into_iter()
            .map(|(kind, commodity)| Request {
                kind,
                commodity: commodity.to_string(),
                target: Material::target(1000.0, Composition::new()),
                constraint: 1000.0,
            })
            .collect()
    }

    fn config(market: MarketScenario) -> SimulationConfig {
        SimulationConfig {
            max_steps: 10,
            market,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn spot_only_by_default() {
        let mut exchange = config(MarketScenario::Reliable).build_exchange().unwrap();
        assert_eq!(exchange.resolve(1, &requests()).len(), 1);
    }

    #[test]
    fn contracts_traded_serves_both_commodities() {
        let sim_config = SimulationConfig {
            contracts_traded: true,
            ..config(MarketScenario::Reliable)
        };
        let mut exchange = sim_config.build_exchange().unwrap();
        assert_eq!(exchange.resolve(1, &requests()).len(), 2);
    }

    #[test]
    fn scheduled_schedules_drive_availability() {
        let mut constant = config(MarketScenario::Scheduled(SupplySchedule::Constant))
            .build_exchange()
            .unwrap();
        assert_eq!(constant.resolve(10, &requests()).len(), 1);

        let mut window = config(MarketScenario::Scheduled(SupplySchedule::OutageWindow {
            start: 2,
            length: 3,
        }))
        .build_exchange()
        .unwrap();
        assert_eq!(window.resolve(1, &requests()).len(), 1);
        assert!(window.resolve(4, &requests()).is_empty());
        assert_eq!(window.resolve(5, &requests()).len(), 1);

        let mut always_out = config(MarketScenario::Scheduled(SupplySchedule::RandomOutages {
            probability: 1.0,
        }))
        .build_exchange()
        .unwrap();
        assert!(always_out.resolve(1, &requests()).is_empty());
    }

    #[test]
    fn invalid_probabilities_are_rejected() {
        let bad_fill = config(MarketScenario::Random {
            fill_probability: 2.0,
        });
        assert!(matches!(
            bad_fill.build_exchange(),
            Err(ReactorError::InvalidConfig(_))
        ));

        let bad_outage = config(MarketScenario::Scheduled(SupplySchedule::RandomOutages {
            probability: -1.0,
        }));
        assert!(matches!(
            bad_outage.build_exchange(),
            Err(ReactorError::InvalidConfig(_))
        ));
    }
}
