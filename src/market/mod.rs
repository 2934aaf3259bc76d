pub mod exchanges;
pub mod recipes;
pub mod traits;
