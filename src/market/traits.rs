// src/market/traits.rs

use crate::model::error::ReactorError;
use crate::model::material::{Composition, Material};
use serde::Serialize;
use std::fmt::Debug;

/// Suffix that turns a fuel commodity into its forward-contract commodity.
pub const CONTRACT_SUFFIX: &str = "-contract";

/// Which trigger produced a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestKind {
    /// Fresh fuel is needed now (the fresh-fuel buffer is empty).
    Spot,
    /// Forward-dated: placed a lead time before the fuel is needed.
    Contract,
}

/// A procurement request as handed to the market.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub kind: RequestKind,
    pub commodity: String,
    /// Always a `Material::Target`.
    pub target: Material,
    pub constraint: f64,
}

impl Request {
    pub fn desired_quantity(&self) -> f64 {
        self.target.quantity()
    }
}

/// Resolves recipe identifiers to compositions.
pub trait RecipeRegistry: Debug {
    fn resolve_recipe(&self, recipe_id: &str) -> Result<Composition, ReactorError>;
}

/// The market side of the request/trade protocol.
///
/// We require `Send` + `Sync` so an exchange can be shared across runs.
pub trait Exchange: Debug + Send + Sync {
    /// Matches this step's requests against supply.
    ///
    /// Returns one tracked lot per satisfied request, in request order, built
    /// from the request's target quantity and composition.
    /// Unsatisfied requests simply lapse.
    ///
    /// # Arguments
    /// * `step` - The current simulation step (1-based).
    /// * `requests` - What the reactor asked for this step.
    fn resolve(&mut self, step: usize, requests: &[Request]) -> Vec<Material>;
}
