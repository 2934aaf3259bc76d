// src/model/error.rs

use thiserror::Error;

/// Everything that can stop a reactor mid-run.
///
/// None of these are recoverable inside the reactor: the caller decides
/// whether to abort the simulation or not.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReactorError {
    /// A pop on an empty buffer, e.g. a refuel with no fresh fuel delivered.
    #[error("cannot remove a lot from empty buffer '{buffer}'")]
    BufferUnderflow { buffer: String },

    #[error(
        "buffer '{buffer}' cannot take {incoming} kg: holds {quantity} kg of {capacity} kg capacity"
    )]
    CapacityExceeded {
        buffer: String,
        capacity: f64,
        quantity: f64,
        incoming: f64,
    },

    /// A lot whose mass is NaN, infinite or negative.
    #[error("buffer '{buffer}' cannot take a lot of {quantity} kg")]
    InvalidLotMass { buffer: String, quantity: f64 },

    #[error("unknown recipe '{0}'")]
    UnknownRecipe(String),

    /// A request target was handed back as if it were real inventory.
    #[error("untracked target material cannot be stored in a buffer")]
    UntrackedMaterial,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
