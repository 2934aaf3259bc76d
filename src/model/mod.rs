pub mod buffer;
pub mod error;
pub mod material;
pub mod reactor;
