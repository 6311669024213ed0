use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::CalculationError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Industry {
    Technology,
    Fintech,
    Ecommerce,
    Analytics,
    Healthcare,
    Retail,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Workload {
    Oltp,
    Analytics,
    Mixed,
    Aiml,
}

/// Per-vertical multipliers applied to infrastructure waste and query savings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndustryFactor {
    pub waste_multiplier: f64,
    pub query_complexity: f64,
}

/// Per-workload optimization potential.
///
/// `compute_waste` is part of the published table but no savings term reads it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkloadFactor {
    pub compute_waste: f64,
    pub storage_waste: f64,
    pub query_optimization: f64,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Technology,
        Industry::Fintech,
        Industry::Ecommerce,
        Industry::Analytics,
        Industry::Healthcare,
        Industry::Retail,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Fintech => "fintech",
            Industry::Ecommerce => "ecommerce",
            Industry::Analytics => "analytics",
            Industry::Healthcare => "healthcare",
            Industry::Retail => "retail",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Fintech => "Fintech",
            Industry::Ecommerce => "E-commerce",
            Industry::Analytics => "Analytics",
            Industry::Healthcare => "Healthcare",
            Industry::Retail => "Retail",
        }
    }

    pub fn factor(self) -> IndustryFactor {
        let (waste_multiplier, query_complexity) = match self {
            Industry::Technology => (1.2, 1.1),
            Industry::Fintech => (1.3, 1.3),
            Industry::Ecommerce => (1.1, 1.2),
            Industry::Analytics => (1.4, 1.4),
            Industry::Healthcare => (1.0, 1.1),
            Industry::Retail => (1.1, 1.0),
        };
        IndustryFactor {
            waste_multiplier,
            query_complexity,
        }
    }
}

impl Workload {
    pub const ALL: [Workload; 4] = [
        Workload::Oltp,
        Workload::Analytics,
        Workload::Mixed,
        Workload::Aiml,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Workload::Oltp => "oltp",
            Workload::Analytics => "analytics",
            Workload::Mixed => "mixed",
            Workload::Aiml => "aiml",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Workload::Oltp => "OLTP",
            Workload::Analytics => "Analytics",
            Workload::Mixed => "Mixed",
            Workload::Aiml => "AI/ML",
        }
    }

    pub fn factor(self) -> WorkloadFactor {
        let (compute_waste, storage_waste, query_optimization) = match self {
            Workload::Oltp => (0.4, 0.3, 0.35),
            Workload::Analytics => (0.5, 0.4, 0.45),
            Workload::Mixed => (0.45, 0.35, 0.4),
            Workload::Aiml => (0.3, 0.2, 0.25),
        };
        WorkloadFactor {
            compute_waste,
            storage_waste,
            query_optimization,
        }
    }
}

// Keys are matched exactly, the way the form submits them.
impl FromStr for Industry {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::ALL
            .into_iter()
            .find(|industry| industry.key() == s)
            .ok_or_else(|| CalculationError::UnknownIndustry(s.to_string()))
    }
}

impl FromStr for Workload {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workload::ALL
            .into_iter()
            .find(|workload| workload.key() == s)
            .ok_or_else(|| CalculationError::UnknownWorkload(s.to_string()))
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    pub monthly_cloud_spend: f64,
    pub industry: Industry,
    pub primary_workload: Workload,
    /// Percentage in 0..=100.
    pub current_utilization: f64,
    /// Hours per month.
    pub manual_optimization_hours: f64,
    pub engineer_hourly_cost: f64,
    pub sustainability_goals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsBreakdown {
    pub infrastructure: f64,
    pub database: f64,
    pub storage: f64,
    pub cross_layer: f64,
    pub productivity: f64,
    pub sustainability: f64,
}

impl SavingsBreakdown {
    /// Sum of all six components, added in declaration order.
    pub fn total(&self) -> f64 {
        self.infrastructure
            + self.database
            + self.storage
            + self.cross_layer
            + self.productivity
            + self.sustainability
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOutput {
    pub annual_spend: f64,
    pub total_savings: f64,
    pub savings_percentage: f64,
    pub monthly_net_savings: f64,
    pub roi: f64,
    pub payback_months: f64,
    pub carbon_saved: f64,
    pub platform_cost: f64,
    pub net_savings: f64,
    pub breakdown: SavingsBreakdown,
}
