pub mod cohort;
pub mod compare;
pub mod config;
pub mod error;
pub mod goals;
pub mod reporting;
pub mod week;
