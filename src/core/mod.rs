mod engine;
mod error;
mod types;

pub use engine::{calculate, current_waste_percentage};
pub use error::CalculationError;
pub use types::{
    CalculationInput, CalculationOutput, Industry, IndustryFactor, SavingsBreakdown, Workload,
    WorkloadFactor,
};
