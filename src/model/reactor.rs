// src/model/reactor.rs

use crate::market::traits::{RecipeRegistry, Request, RequestKind, CONTRACT_SUFFIX};
use crate::model::buffer::ResourceBuffer;
use crate::model::error::ReactorError;
use crate::model::material::{Composition, Lot, Material};
use log::debug;

/// Fixed at construction; the reactor never changes it.
#[derive(Debug, Clone)]
pub struct ReactorConfig {
    /// Commodity name for fuel. Contract requests use `<commodity>-contract`.
    pub commodity: String,
    pub recipe_id: String,
    pub fuel_mass: f64, // kg per batch
    pub cycle_length: u32,
    /// Steps before refuel at which the forward contract is placed.
    pub request_lead_time: u32,
    pub fresh_fuel_capacity: f64,
    pub core_capacity: f64,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            commodity: "uox".to_string(),
            recipe_id: "fresh_uox".to_string(),
            fuel_mass: 1000.0,
            cycle_length: 18,
            request_lead_time: 3,
            fresh_fuel_capacity: 1000.0,
            core_capacity: 1000.0,
        }
    }
}

impl ReactorConfig {
    pub fn validate(&self) -> Result<(), ReactorError> {
        if self.cycle_length == 0 {
            return Err(ReactorError::InvalidConfig(
                "cycle_length must be at least 1".to_string(),
            ));
        }
        let masses = [
            ("fuel_mass", self.fuel_mass),
            ("fresh_fuel_capacity", self.fresh_fuel_capacity),
            ("core_capacity", self.core_capacity),
        ];
        for (name, value) in masses {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReactorError::InvalidConfig(format!(
                    "{} must be a positive finite mass, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn contract_commodity(&self) -> String {
        format!("{}{}", self.commodity, CONTRACT_SUFFIX)
    }
}

/// Where the reactor sits in its operating cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Operating,
    RefuelDue,
}

/// The only ways the cycle clock may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockDelta {
    /// Both counters move forward one step.
    Advance,
    Hold,
    /// Both counters go back to zero.
    Reset,
}

/// The two timing counters.
///
/// `rx_time` counts steps into the operating cycle, `ct_time` counts steps
/// since the last contract reset. `ct_time` starts at -2 so the first tick
/// lands on the -1 contract trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleClock {
    rx_time: i64,
    ct_time: i64,
}

impl Default for CycleClock {
    fn default() -> Self {
        Self {
            rx_time: 0,
            ct_time: -2,
        }
    }
}

impl CycleClock {
    pub fn rx_time(&self) -> i64 {
        self.rx_time
    }

    pub fn ct_time(&self) -> i64 {
        self.ct_time
    }

    pub fn phase(&self, cycle_length: u32) -> CyclePhase {
        if self.rx_time >= i64::from(cycle_length) {
            CyclePhase::RefuelDue
        } else {
            CyclePhase::Operating
        }
    }

    pub fn contract_due(&self, cycle_length: u32, lead_time: u32) -> bool {
        let trigger = i64::from(cycle_length) - i64::from(lead_time);
        self.ct_time == trigger || self.ct_time == -1
    }

    pub fn apply(self, delta: ClockDelta) -> Self {
        match delta {
            ClockDelta::Advance => Self {
                rx_time: self.rx_time + 1,
                ct_time: self.ct_time + 1,
            },
            ClockDelta::Hold => self,
            ClockDelta::Reset => Self {
                rx_time: 0,
                ct_time: 0,
            },
        }
    }
}

/// Lots moved by a refuel event.
#[derive(Debug, Clone, PartialEq)]
pub struct RefuelEvent {
    pub discharged: Lot,
    pub loaded: Lot,
}

/// What a call to `tick` did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub delta: ClockDelta,
    pub refuel: Option<RefuelEvent>,
}

/// What a call to `accept_trades` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeOutcome {
    pub delta: ClockDelta,
    pub to_core: usize,
    pub to_fresh_fuel: usize,
}

/// A single-batch reactor agent.
#[derive(Debug, Clone)]
pub struct Reactor {
    config: ReactorConfig,
    clock: CycleClock,
    fresh_fuel: ResourceBuffer,
    core: ResourceBuffer,
    waste: ResourceBuffer,
}

impl Reactor {
    pub fn new(config: ReactorConfig) -> Result<Self, ReactorError> {
        config.validate()?;
        Ok(Self {
            fresh_fuel: ResourceBuffer::new("fresh_fuel", config.fresh_fuel_capacity),
            core: ResourceBuffer::new("core", config.core_capacity),
            waste: ResourceBuffer::unbounded("waste"),
            clock: CycleClock::default(),
            config,
        })
    }

    /// Advances the cycle by one step, refuelling when the cycle is complete.
    ///
    /// A refuel moves the core lot to waste and the oldest fresh lot into the
    /// core. It does not move the clock: the next cycle starts only when
    /// `accept_trades` resets it.
    pub fn tick(&mut self) -> Result<TickOutcome, ReactorError> {
        let outcome = match self.clock.phase(self.config.cycle_length) {
            CyclePhase::Operating => TickOutcome {
                delta: ClockDelta::Advance,
                refuel: None,
            },
            CyclePhase::RefuelDue => TickOutcome {
                delta: ClockDelta::Hold,
                refuel: Some(self.refuel()?),
            },
        };
        self.clock = self.clock.apply(outcome.delta);

        debug!(
            "tick: rx_time={} ct_time={} refuelled={}",
            self.clock.rx_time,
            self.clock.ct_time,
            outcome.refuel.is_some()
        );
        Ok(outcome)
    }

    fn refuel(&mut self) -> Result<RefuelEvent, ReactorError> {
        // Check everything up front so a failed refuel leaves all buffers as they were.
        if self.core.is_empty() {
            return Err(self.underflow(&self.core));
        }
        let fresh_quantity = match self.fresh_fuel.peek() {
            Some(lot) => lot.quantity,
            None => return Err(self.underflow(&self.fresh_fuel)),
        };
        let remaining = self.core.quantity_after_pop();
        if remaining + fresh_quantity > self.core.capacity() {
            return Err(ReactorError::CapacityExceeded {
                buffer: self.core.label().to_string(),
                capacity: self.core.capacity(),
                quantity: remaining,
                incoming: fresh_quantity,
            });
        }

        let discharged = self.core.pop()?;
        self.waste.push(discharged.clone())?;
        let loaded = self.fresh_fuel.pop()?;
        self.core.push(loaded.clone())?;
        Ok(RefuelEvent { discharged, loaded })
    }

    fn underflow(&self, buffer: &ResourceBuffer) -> ReactorError {
        ReactorError::BufferUnderflow {
            buffer: buffer.label().to_string(),
        }
    }

    /// Requests for this step: a spot request when fresh fuel is empty, then a
    /// contract request when the contract counter hits its trigger.
    pub fn generate_requests(
        &self,
        recipes: &dyn RecipeRegistry,
    ) -> Result<Vec<Request>, ReactorError> {
        let spot = self.fresh_fuel.is_empty();
        let contract = self
            .clock
            .contract_due(self.config.cycle_length, self.config.request_lead_time);
        if !spot && !contract {
            return Ok(Vec::new());
        }

        let composition = recipes.resolve_recipe(&self.config.recipe_id)?;
        let mut requests = Vec::with_capacity(2);
        if spot {
            requests.push(self.request(
                RequestKind::Spot,
                self.config.commodity.clone(),
                composition.clone(),
            ));
        }
        if contract {
            requests.push(self.request(
                RequestKind::Contract,
                self.config.contract_commodity(),
                composition,
            ));
        }
        Ok(requests)
    }

    fn request(&self, kind: RequestKind, commodity: String, composition: Composition) -> Request {
        Request {
            kind,
            commodity,
            target: Material::target(self.config.fuel_mass, composition),
            constraint: self.config.fuel_mass,
        }
    }

    /// Stores delivered lots: into the core while it is empty, otherwise into
    /// fresh fuel. Any delivery resets the clock once.
    pub fn accept_trades(&mut self, materials: Vec<Material>) -> Result<TradeOutcome, ReactorError> {
        if materials.is_empty() {
            return Ok(TradeOutcome {
                delta: ClockDelta::Hold,
                to_core: 0,
                to_fresh_fuel: 0,
            });
        }

        let lots = materials
            .into_iter()
            .map(Material::into_lot)
            .collect::<Result<Vec<Lot>, ReactorError>>()?;

        let mut outcome = TradeOutcome {
            delta: ClockDelta::Reset,
            to_core: 0,
            to_fresh_fuel: 0,
        };
        for lot in lots {
            debug!("accepting lot {} ({} kg)", lot.id, lot.quantity);
            if self.core.is_empty() {
                self.core.push(lot)?;
                outcome.to_core += 1;
            } else {
                self.fresh_fuel.push(lot)?;
                outcome.to_fresh_fuel += 1;
            }
        }
        self.clock = self.clock.apply(outcome.delta);
        Ok(outcome)
    }

    pub fn clock(&self) -> CycleClock {
        self.clock
    }

    pub fn fresh_fuel(&self) -> &ResourceBuffer {
        &self.fresh_fuel
    }

    pub fn core(&self) -> &ResourceBuffer {
        &self.core
    }

    pub fn waste(&self) -> &ResourceBuffer {
        &self.waste
    }
}
