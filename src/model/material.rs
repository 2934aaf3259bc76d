// src/model/material.rs

use crate::model::error::ReactorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nuclide name -> mass fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    fractions: BTreeMap<String, f64>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: `Composition::new().with("U235", 0.04)`.
    pub fn with(mut self, nuclide: &str, fraction: f64) -> Self {
        self.fractions.insert(nuclide.to_string(), fraction);
        self
    }
}

/// One discrete, real quantity of material. The atomic unit a buffer moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: u64,
    pub quantity: f64, // kg
    pub composition: Composition,
}

impl Lot {
    pub fn new(id: u64, quantity: f64, composition: Composition) -> Self {
        Self {
            id,
            quantity,
            composition,
        }
    }
}

/// Material as it crosses the market boundary.
///
/// Only `Tracked` material is real inventory. A `Target` only describes what a
/// request wants and has to be turned away before it reaches a buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Tracked(Lot),
    Target {
        quantity: f64,
        composition: Composition,
    },
}

impl Material {
    pub fn target(quantity: f64, composition: Composition) -> Self {
        Material::Target {
            quantity,
            composition,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            Material::Tracked(lot) => lot.quantity,
            Material::Target { quantity, .. } => *quantity,
        }
    }

    pub fn composition(&self) -> &Composition {
        match self {
            Material::Tracked(lot) => &lot.composition,
            Material::Target { composition, .. } => composition,
        }
    }

    /// Unwraps the real lot, refusing request targets.
    pub fn into_lot(self) -> Result<Lot, ReactorError> {
        match self {
            Material::Tracked(lot) => Ok(lot),
            Material::Target { .. } => Err(ReactorError::UntrackedMaterial),
        }
    }
}
