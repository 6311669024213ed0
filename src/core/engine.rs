use tracing::debug;

use super::error::CalculationError;
use super::types::{CalculationInput, CalculationOutput, SavingsBreakdown};

const MONTHS_PER_YEAR: f64 = 12.0;

// One cent. Smaller positive spends underflow the payback division.
const MIN_MONTHLY_SPEND: f64 = 0.01;

const MAX_WASTE_PERCENTAGE: f64 = 50.0;
const BASELINE_WASTE_PERCENTAGE: f64 = 20.0;

// Share of annual spend attributed to each layer.
const INFRASTRUCTURE_SHARE: f64 = 0.6;
const DATABASE_SHARE: f64 = 0.25;
const STORAGE_SHARE: f64 = 0.15;

/// Fraction of identified waste (or manual labour) the platform can recover.
const ACHIEVABLE_FRACTION: f64 = 0.7;
const CROSS_LAYER_RATE: f64 = 0.15;
const SUSTAINABILITY_RATE: f64 = 0.05;
const PLATFORM_COST_RATE: f64 = 0.065;

// Dollars saved to tonnes of CO2-equivalent.
const CARBON_INTENSITY: f64 = 0.12;
const CARBON_RECOVERY: f64 = 0.4;

#[derive(Debug, Clone, Copy)]
struct LayerSavings {
    infrastructure: f64,
    database: f64,
    storage: f64,
}

impl LayerSavings {
    fn total(self) -> f64 {
        self.infrastructure + self.database + self.storage
    }
}

impl CalculationInput {
    /// Checks the numeric constraints. Industry and workload are already
    /// typed, so an unknown key can only fail earlier, at parse time.
    pub fn validate(&self) -> Result<(), CalculationError> {
        if !self.monthly_cloud_spend.is_finite() || self.monthly_cloud_spend < MIN_MONTHLY_SPEND {
            return Err(CalculationError::InvalidField {
                field: "monthlyCloudSpend",
                reason: "must be at least 0.01",
            });
        }

        if !self.current_utilization.is_finite()
            || !(0.0..=100.0).contains(&self.current_utilization)
        {
            return Err(CalculationError::InvalidField {
                field: "currentUtilization",
                reason: "must be between 0 and 100",
            });
        }

        if !self.manual_optimization_hours.is_finite() || self.manual_optimization_hours < 0.0 {
            return Err(CalculationError::InvalidField {
                field: "manualOptimizationHours",
                reason: "must be >= 0",
            });
        }

        if !self.engineer_hourly_cost.is_finite() || self.engineer_hourly_cost < 0.0 {
            return Err(CalculationError::InvalidField {
                field: "engineerHourlyCost",
                reason: "must be >= 0",
            });
        }

        Ok(())
    }
}

/// Share of infrastructure spend assumed wasted, in percent.
///
/// Grows as utilization drops and is capped at 50. There is no lower clamp:
/// utilization above 100 would push the result below 20, which is why
/// [`CalculationInput::validate`] rejects it.
pub fn current_waste_percentage(current_utilization: f64) -> f64 {
    MAX_WASTE_PERCENTAGE.min(BASELINE_WASTE_PERCENTAGE + (100.0 - current_utilization))
}

pub fn calculate(input: &CalculationInput) -> Result<CalculationOutput, CalculationError> {
    input.validate()?;

    let industry = input.industry.factor();
    let workload = input.primary_workload.factor();

    let annual_spend = input.monthly_cloud_spend * MONTHS_PER_YEAR;
    let waste_percentage = current_waste_percentage(input.current_utilization);

    let layers = LayerSavings {
        infrastructure: annual_spend
            * INFRASTRUCTURE_SHARE
            * (waste_percentage / 100.0)
            * ACHIEVABLE_FRACTION
            * industry.waste_multiplier,
        database: annual_spend
            * DATABASE_SHARE
            * workload.query_optimization
            * industry.query_complexity,
        storage: annual_spend * STORAGE_SHARE * ACHIEVABLE_FRACTION * workload.storage_waste,
    };

    let cross_layer = layers.total() * CROSS_LAYER_RATE;
    let productivity = input.manual_optimization_hours
        * input.engineer_hourly_cost
        * ACHIEVABLE_FRACTION
        * MONTHS_PER_YEAR;
    let sustainability = if input.sustainability_goals {
        (layers.infrastructure + layers.storage) * SUSTAINABILITY_RATE
    } else {
        0.0
    };

    let breakdown = SavingsBreakdown {
        infrastructure: layers.infrastructure,
        database: layers.database,
        storage: layers.storage,
        cross_layer,
        productivity,
        sustainability,
    };
    let total_savings = breakdown.total();

    let platform_cost = annual_spend * PLATFORM_COST_RATE;
    let net_savings = total_savings - platform_cost;
    let output = CalculationOutput {
        annual_spend: finite("annualSpend", annual_spend)?,
        total_savings: finite("totalSavings", total_savings)?,
        savings_percentage: finite("savingsPercentage", total_savings / annual_spend * 100.0)?,
        monthly_net_savings: finite("monthlyNetSavings", net_savings / MONTHS_PER_YEAR)?,
        roi: finite("roi", net_savings / platform_cost * 100.0)?,
        payback_months: finite(
            "paybackMonths",
            platform_cost / (total_savings / MONTHS_PER_YEAR),
        )?,
        carbon_saved: finite(
            "carbonSaved",
            total_savings * CARBON_INTENSITY * CARBON_RECOVERY,
        )?,
        platform_cost: finite("platformCost", platform_cost)?,
        net_savings: finite("netSavings", net_savings)?,
        breakdown,
    };

    debug!(
        industry = %input.industry,
        workload = %input.primary_workload,
        annual_spend = output.annual_spend,
        total_savings = output.total_savings,
        net_savings = output.net_savings,
        "computed savings estimate"
    );

    Ok(output)
}

fn finite(field: &'static str, value: f64) -> Result<f64, CalculationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculationError::NonFinite { field })
    }
}
