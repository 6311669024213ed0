use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::error;

use cloud_savings::core::{CalculationError, CalculationInput, Industry, Workload, calculate};
use cloud_savings::{api, logging, report};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliIndustry {
    Technology,
    Fintech,
    Ecommerce,
    Analytics,
    Healthcare,
    Retail,
}

impl From<CliIndustry> for Industry {
    fn from(value: CliIndustry) -> Self {
        match value {
            CliIndustry::Technology => Industry::Technology,
            CliIndustry::Fintech => Industry::Fintech,
            CliIndustry::Ecommerce => Industry::Ecommerce,
            CliIndustry::Analytics => Industry::Analytics,
            CliIndustry::Healthcare => Industry::Healthcare,
            CliIndustry::Retail => Industry::Retail,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliWorkload {
    Oltp,
    Analytics,
    Mixed,
    Aiml,
}

impl From<CliWorkload> for Workload {
    fn from(value: CliWorkload) -> Self {
        match value {
            CliWorkload::Oltp => Workload::Oltp,
            CliWorkload::Analytics => Workload::Analytics,
            CliWorkload::Mixed => Workload::Mixed,
            CliWorkload::Aiml => Workload::Aiml,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cloud-savings",
    about = "Cloud cost savings estimator (infrastructure, database, storage and labour savings)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web form and the JSON API.
    Serve {
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        host: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run a single estimate and print it.
    Calculate(CalculateArgs),
}

#[derive(Args, Debug)]
struct CalculateArgs {
    #[arg(long, default_value_t = 1000.0, help = "Monthly cloud spend in dollars")]
    monthly_cloud_spend: f64,
    #[arg(long, value_enum, default_value_t = CliIndustry::Technology)]
    industry: CliIndustry,
    #[arg(long, value_enum, default_value_t = CliWorkload::Oltp)]
    workload: CliWorkload,
    #[arg(
        long,
        default_value_t = 60.0,
        help = "Current resource utilization in percent (0-100)"
    )]
    utilization: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Hours per month spent on manual optimization"
    )]
    manual_hours: f64,
    #[arg(long, default_value_t = 50.0, help = "Engineer cost per hour in dollars")]
    hourly_cost: f64,
    #[arg(long, help = "Credit the sustainability bonus")]
    sustainability: bool,
    #[arg(long, help = "Print the raw JSON estimate instead of the report")]
    json: bool,
}

impl From<&CalculateArgs> for CalculationInput {
    fn from(args: &CalculateArgs) -> Self {
        CalculationInput {
            monthly_cloud_spend: args.monthly_cloud_spend,
            industry: args.industry.into(),
            primary_workload: args.workload.into(),
            current_utilization: args.utilization,
            manual_optimization_hours: args.manual_hours,
            engineer_hourly_cost: args.hourly_cost,
            sustainability_goals: args.sustainability,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid input: {0}")]
    Invalid(CalculationError),
    #[error("calculation failed: {0}")]
    Calculation(CalculationError),
    #[error("failed to serialize estimate: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<CalculationError> for CliError {
    fn from(err: CalculationError) -> Self {
        if err.is_validation() {
            CliError::Invalid(err)
        } else {
            CliError::Calculation(err)
        }
    }
}

fn run_calculate(args: &CalculateArgs) -> Result<(), CliError> {
    let input = CalculationInput::from(args);
    let output = calculate(&input)?;

    if args.json {
        let json = serde_json::to_string_pretty(&output)?;
        println!("{json}");
    } else {
        print!("{}", report::render(&input, &output));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            if let Err(e) = api::run_http_server(SocketAddr::new(host, port)).await {
                error!(error = %e, "server error");
                return ExitCode::FAILURE;
            }
        }
        Command::Calculate(args) => {
            match run_calculate(&args) {
                Ok(()) => {}
                Err(CliError::Invalid(err)) => {
                    error!(error = %err, "rejected input");
                    return ExitCode::from(2);
                }
                Err(err) => {
                    error!(error = %err, "calculation failed");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_defaults_match_the_form() {
        let cli = Cli::try_parse_from(["cloud-savings", "calculate"]).expect("defaults parse");
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate subcommand");
        };
        let input = CalculationInput::from(&args);

        assert_eq!(input.monthly_cloud_spend, 1_000.0);
        assert_eq!(input.industry, Industry::Technology);
        assert_eq!(input.primary_workload, Workload::Oltp);
        assert_eq!(input.current_utilization, 60.0);
        assert_eq!(input.manual_optimization_hours, 10.0);
        assert_eq!(input.engineer_hourly_cost, 50.0);
        assert!(!input.sustainability_goals);
    }

    #[test]
    fn calculate_accepts_enum_flags() {
        let cli = Cli::try_parse_from([
            "cloud-savings",
            "calculate",
            "--industry",
            "healthcare",
            "--workload",
            "aiml",
            "--sustainability",
        ])
        .expect("flags parse");
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate subcommand");
        };
        let input = CalculationInput::from(&args);

        assert_eq!(input.industry, Industry::Healthcare);
        assert_eq!(input.primary_workload, Workload::Aiml);
        assert!(input.sustainability_goals);
    }

    #[test]
    fn calculate_rejects_unknown_industry_flag() {
        let err = Cli::try_parse_from(["cloud-savings", "calculate", "--industry", "unknown"])
            .expect_err("unknown industry must fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn serve_defaults_to_all_interfaces_on_8080() {
        let cli = Cli::try_parse_from(["cloud-savings", "serve"]).expect("defaults parse");
        let Command::Serve { host, port } = cli.command else {
            panic!("expected serve subcommand");
        };
        assert_eq!(host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(port, 8080);
    }

    #[test]
    fn run_calculate_reports_validation_errors() {
        let cli = Cli::try_parse_from(["cloud-savings", "calculate", "--utilization", "120"])
            .expect("flags parse");
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate subcommand");
        };
        let err = run_calculate(&args).expect_err("utilization above 100 must fail");
        assert!(matches!(err, CliError::Invalid(_)));
        assert!(err.to_string().contains("currentUtilization"));
    }

    #[test]
    fn run_calculate_separates_overflow_from_bad_input() {
        let cli = Cli::try_parse_from([
            "cloud-savings",
            "calculate",
            "--monthly-cloud-spend",
            "1e308",
        ])
        .expect("flags parse");
        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate subcommand");
        };
        let err = run_calculate(&args).expect_err("overflowing spend must fail");
        assert!(matches!(
            err,
            CliError::Calculation(CalculationError::NonFinite { .. })
        ));
    }
}
