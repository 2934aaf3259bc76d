pub mod reporting;
pub mod supply;
