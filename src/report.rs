use crate::core::{CalculationInput, CalculationOutput};

/// Renders an estimate as the results panel of the web form, as plain text.
///
/// Currency and percentages use two decimals, payback uses one.
pub fn render(input: &CalculationInput, output: &CalculationOutput) -> String {
    let b = &output.breakdown;

    format!(
        "\
Cloud savings estimate ({industry}, {workload})
Annual Spend:        ${annual:.2}
Total Savings:       ${total:.2}
Savings Percentage:  {percentage:.2}%
ROI:                 {roi:.2}%
Net Monthly Savings: ${monthly_net:.2}
Payback in:          {payback:.1} months
Carbon Saved:        {carbon:.2} tons
Platform Cost:       ${platform:.2}
Net Savings:         ${net:.2}

Breakdown
  Infrastructure:    ${infrastructure:.2}
  Database:          ${database:.2}
  Storage:           ${storage:.2}
  Cross-layer:       ${cross_layer:.2}
  Productivity:      ${productivity:.2}
  Sustainability:    ${sustainability:.2}
",
        industry = input.industry.label(),
        workload = input.primary_workload.label(),
        annual = output.annual_spend,
        total = output.total_savings,
        percentage = output.savings_percentage,
        roi = output.roi,
        monthly_net = output.monthly_net_savings,
        payback = output.payback_months,
        carbon = output.carbon_saved,
        platform = output.platform_cost,
        net = output.net_savings,
        infrastructure = b.infrastructure,
        database = b.database,
        storage = b.storage,
        cross_layer = b.cross_layer,
        productivity = b.productivity,
        sustainability = b.sustainability,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Industry, Workload, calculate};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_reference_scenario_with_form_precision() {
        let input = CalculationInput {
            monthly_cloud_spend: 1_000.0,
            industry: Industry::Technology,
            primary_workload: Workload::Oltp,
            current_utilization: 60.0,
            manual_optimization_hours: 10.0,
            engineer_hourly_cost: 50.0,
            sustainability_goals: false,
        };
        let output = calculate(&input).expect("valid input");

        let expected = "\
Cloud savings estimate (Technology, OLTP)
Annual Spend:        $12000.00
Total Savings:       $9440.55
Savings Percentage:  78.67%
ROI:                 1110.33%
Net Monthly Savings: $721.71
Payback in:          1.0 months
Carbon Saved:        453.15 tons
Platform Cost:       $780.00
Net Savings:         $8660.55

Breakdown
  Infrastructure:    $3024.00
  Database:          $1155.00
  Storage:           $378.00
  Cross-layer:       $683.55
  Productivity:      $4200.00
  Sustainability:    $0.00
";
        assert_eq!(render(&input, &output), expected);
    }

    #[test]
    fn renders_every_metric_and_breakdown_line() {
        let input = CalculationInput {
            monthly_cloud_spend: 2_500.0,
            industry: Industry::Ecommerce,
            primary_workload: Workload::Aiml,
            current_utilization: 85.0,
            manual_optimization_hours: 0.0,
            engineer_hourly_cost: 0.0,
            sustainability_goals: true,
        };
        let output = calculate(&input).expect("valid input");
        let text = render(&input, &output);

        assert_eq!(text.lines().count(), 18);
        assert!(text.starts_with("Cloud savings estimate (E-commerce, AI/ML)\n"));
        assert!(text.contains(&format!(
            "  Sustainability:    ${:.2}\n",
            output.breakdown.sustainability
        )));
        assert!(text.contains(&format!(
            "Payback in:          {:.1} months\n",
            output.payback_months
        )));
    }
}
