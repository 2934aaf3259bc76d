// src/simulation/engine.rs

use crate::market::traits::{Exchange, RecipeRegistry, RequestKind};
use crate::model::error::ReactorError;
use crate::model::reactor::Reactor;
use crate::simulation::config::SimulationConfig;
use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;

// We make this Serialize so we can write it to CSV later
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub step: usize,
    pub rx_time: i64,
    pub ct_time: i64,
    pub fresh_fuel_count: usize,
    pub fresh_fuel_kg: f64,
    pub core_count: usize,
    pub core_kg: f64,
    pub waste_count: usize,
    pub waste_kg: f64,
    pub spot_requested: bool,
    pub contract_requested: bool,
    pub lots_received: usize,
    pub refuelled: bool,
}

/// A fatal reactor error, tagged with the step it happened on.
#[derive(Debug, Error)]
#[error("step {step}: {source}")]
pub struct StepFailure {
    pub step: usize,
    #[source]
    pub source: ReactorError,
}

/// Plays the kernel and the market around a single reactor.
#[derive(Debug)]
pub struct ReactorSimulation {
    config: SimulationConfig,

    pub reactor: Reactor,
    recipes: Box<dyn RecipeRegistry>,
    exchange: Box<dyn Exchange>,

    pub current_step: usize,
    pub history: Vec<HistoryRecord>,
}

impl ReactorSimulation {
    pub fn new(
        config: SimulationConfig,
        recipes: Box<dyn RecipeRegistry>,
        exchange: Box<dyn Exchange>,
    ) -> Result<Self, ReactorError> {
        let reactor = Reactor::new(config.reactor.clone())?;
        Ok(Self {
            config,
            reactor,
            recipes,
            exchange,
            current_step: 1,
            history: Vec::new(),
        })
    }

    /// Runs until `max_steps` or the first fatal error.
    pub fn run(&mut self) -> Result<(), StepFailure> {
        while self.current_step <= self.config.max_steps {
            if let Err(source) = self.step() {
                error!("reactor halted at step {}: {}", self.current_step, source);
                return Err(StepFailure {
                    step: self.current_step,
                    source,
                });
            }
            self.current_step += 1;
        }
        info!(
            "run complete: {} steps, {} refuels, {} kg discharged to waste",
            self.config.max_steps,
            self.refuel_count(),
            self.total_waste_discharged()
        );
        Ok(())
    }

    fn step(&mut self) -> Result<(), ReactorError> {
        let step = self.current_step;

        // 1. Kernel advances the reactor
        let tick = self.reactor.tick()?;
        if let Some(event) = &tick.refuel {
            info!(
                "step {}: refuel, lot {} ({} kg) to waste, lot {} ({} kg) into core",
                step,
                event.discharged.id,
                event.discharged.quantity,
                event.loaded.id,
                event.loaded.quantity
            );
        }

        // 2. Market collects requests
        let requests = self.reactor.generate_requests(self.recipes.as_ref())?;
        if !requests.is_empty() {
            debug!("step {}: {} request(s)", step, requests.len());
        }

        // 3. Market resolves and hands material back
        let delivered = self.exchange.resolve(step, &requests);
        let lots_received = delivered.len();
        let trades = self.reactor.accept_trades(delivered)?;
        if lots_received > 0 {
            debug!(
                "step {}: {} lot(s) to core, {} to fresh fuel",
                step, trades.to_core, trades.to_fresh_fuel
            );
        }

        self.record_history(
            tick.refuel.is_some(),
            requests.iter().any(|r| r.kind == RequestKind::Spot),
            requests.iter().any(|r| r.kind == RequestKind::Contract),
            lots_received,
        );
        Ok(())
    }

    fn record_history(
        &mut self,
        refuelled: bool,
        spot_requested: bool,
        contract_requested: bool,
        lots_received: usize,
    ) {
        let clock = self.reactor.clock();
        self.history.push(HistoryRecord {
            step: self.current_step,
            rx_time: clock.rx_time(),
            ct_time: clock.ct_time(),
            fresh_fuel_count: self.reactor.fresh_fuel().count(),
            fresh_fuel_kg: self.reactor.fresh_fuel().quantity(),
            core_count: self.reactor.core().count(),
            core_kg: self.reactor.core().quantity(),
            waste_count: self.reactor.waste().count(),
            waste_kg: self.reactor.waste().quantity(),
            spot_requested,
            contract_requested,
            lots_received,
            refuelled,
        });
    }

    /// Number of refuel events across recorded steps.
    pub fn refuel_count(&self) -> usize {
        self.history.iter().filter(|record| record.refuelled).count()
    }

    pub fn total_waste_discharged(&self) -> f64 {
        self.reactor.waste().quantity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::supply::generate_outage_window;
    use crate::market::exchanges::{ReliableExchange, ScheduledExchange};
    use crate::market::recipes::RecipeBook;
    use crate::model::reactor::ReactorConfig;
    use crate::simulation::config::{MarketScenario, SupplySchedule};

    fn config(max_steps: usize) -> SimulationConfig {
        SimulationConfig {
            max_steps,
            reactor: ReactorConfig {
                cycle_length: 3,
                request_lead_time: 1,
                ..ReactorConfig::default()
            },
            ..SimulationConfig::default()
        }
    }

    fn spot_only() -> Vec<String> {
        vec!["uox".to_string()]
    }

    #[test]
    fn spot_supply_sustains_refuel_cycles() {
        let mut sim = ReactorSimulation::new(
            config(12),
            Box::new(RecipeBook::with_standard_recipes()),
            Box::new(ReliableExchange::new(spot_only())),
        )
        .unwrap();

        sim.run().unwrap();
        assert_eq!(sim.history.len(), 12);
        let refuel_steps: Vec<usize> = sim
            .history
            .iter()
            .filter(|r| r.refuelled)
            .map(|r| r.step)
            .collect();
        assert_eq!(refuel_steps, vec![6, 10]);
        assert_eq!(sim.refuel_count(), 2);
        assert_eq!(sim.reactor.waste().count(), 2);
        assert_eq!(sim.total_waste_discharged(), 2000.0);

        // The first step loads the core, the second fills fresh fuel.
        assert_eq!(sim.history[0].core_count, 1);
        assert_eq!(sim.history[1].fresh_fuel_count, 1);
        assert!(sim.history[0].spot_requested && sim.history[0].contract_requested);
    }

    #[test]
    fn filled_contracts_overflow_single_batch_fresh_fuel() {
        let mut sim = ReactorSimulation::new(
            config(10),
            Box::new(RecipeBook::with_standard_recipes()),
            Box::new(ReliableExchange::new(Vec::new())),
        )
        .unwrap();

        let failure = sim.run().unwrap_err();
        assert_eq!(failure.step, 3);
        assert!(matches!(
            failure.source,
            ReactorError::CapacityExceeded { ref buffer, .. } if buffer == "fresh_fuel"
        ));
        assert_eq!(sim.history.len(), 2);
    }

    #[test]
    fn outage_after_refuel_stalls_then_underflows() {
        let schedule = generate_outage_window(12, 6, 1);
        let mut sim = ReactorSimulation::new(
            config(12),
            Box::new(RecipeBook::with_standard_recipes()),
            Box::new(ScheduledExchange::new(spot_only(), schedule)),
        )
        .unwrap();

        let failure = sim.run().unwrap_err();
        assert_eq!(failure.step, 7);
        assert_eq!(
            failure.source,
            ReactorError::BufferUnderflow {
                buffer: "fresh_fuel".to_string()
            }
        );
        assert_eq!(
            failure.to_string(),
            "step 7: cannot remove a lot from empty buffer 'fresh_fuel'"
        );
        assert_eq!(sim.history.len(), 6);
        assert!(sim.history[5].refuelled);
        assert_eq!(sim.history[5].lots_received, 0);
    }

    #[test]
    fn configured_market_drives_the_run() {
        let sim_config = SimulationConfig {
            market: MarketScenario::Scheduled(SupplySchedule::OutageWindow {
                start: 6,
                length: 1,
            }),
            ..config(12)
        };
        let exchange = sim_config.build_exchange().unwrap();
        let mut sim = ReactorSimulation::new(
            sim_config,
            Box::new(RecipeBook::with_standard_recipes()),
            exchange,
        )
        .unwrap();

        let failure = sim.run().unwrap_err();
        assert_eq!(failure.step, 7);
        assert_eq!(sim.refuel_count(), 1);
    }

    #[test]
    fn missing_recipe_halts_on_first_step() {
        let mut sim = ReactorSimulation::new(
            config(5),
            Box::new(RecipeBook::new()),
            Box::new(ReliableExchange::new(Vec::new())),
        )
        .unwrap();

        let failure = sim.run().unwrap_err();
        assert_eq!(failure.step, 1);
        assert_eq!(
            failure.source,
            ReactorError::UnknownRecipe("fresh_uox".to_string())
        );
    }
}
