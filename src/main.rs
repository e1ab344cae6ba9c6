use clap::Parser;

use aerox::core::{AnalysisEngine, ConfigProvider, SolverBackend, Su2Pipeline, XfoilPipeline};
use aerox::utils::{logger, validation::Validate};
use aerox::{CliConfig, LocalStorage, Result, TomlConfig};

async fn run_analysis<C: ConfigProvider + 'static>(
    config: C,
    monitor_enabled: bool,
) -> Result<String> {
    let storage = LocalStorage::new(config.output_path().to_string());
    match config.solver() {
        SolverBackend::Su2 => {
            let pipeline = Su2Pipeline::new(storage, config);
            AnalysisEngine::new_with_monitoring(pipeline, monitor_enabled)
                .run()
                .await
        }
        SolverBackend::Xfoil => {
            let pipeline = XfoilPipeline::new(storage, config);
            AnalysisEngine::new_with_monitoring(pipeline, monitor_enabled)
                .run()
                .await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting aerox CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = if let Some(config_path) = &cli.config {
        tracing::info!("Loading configuration from {}", config_path);
        let config = match TomlConfig::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("❌ Failed to load configuration: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        };
        if let Err(e) = config.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
        let monitor_enabled = monitor_enabled || config.monitoring_enabled();
        run_analysis(config, monitor_enabled).await
    } else {
        if let Err(e) = cli.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
        run_analysis(cli, monitor_enabled).await
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Analysis completed successfully!");
            tracing::info!("📁 Polar saved to: {}", output_path);
            println!("✅ Analysis completed successfully!");
            println!("📁 Polar saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                aerox::utils::error::ErrorSeverity::Low => 0,
                aerox::utils::error::ErrorSeverity::Medium => 2,
                aerox::utils::error::ErrorSeverity::High => 1,
                aerox::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
