use clap::Parser;
use goal_report::config::toml_config::TomlConfig;
use goal_report::core::Pipeline;
use goal_report::utils::error::ReportError;
use goal_report::utils::{logger, validation::Validate};
use goal_report::{CliConfig, LocalStorage, ReportEngine, ReportPipeline, ReportSettings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting goal-report");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let toml = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path).and_then(|config| {
                config.validate()?;
                Ok(config)
            }) {
                Ok(config) => Some(config),
                Err(e) => exit_with(&e),
            }
        }
        None => None,
    };

    let settings = match cli
        .settings(toml.as_ref())
        .and_then(|settings| settings.validate().map(|_| settings))
    {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    let registry = match toml.as_ref().map(TomlConfig::build_registry) {
        Some(Ok(registry)) => registry,
        Some(Err(e)) => exit_with(&e),
        None => goal_report::FormatRegistry::with_defaults(),
    };
    tracing::debug!("Registered formats: {:?}", registry.names());

    let monitor_enabled =
        cli.monitor || toml.as_ref().map(TomlConfig::monitoring_enabled).unwrap_or(false);
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(settings.output_path.clone());
    let pipeline = ReportPipeline::new(storage, settings.clone(), Arc::new(registry));

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no report will be written");
        return dry_run(&pipeline, &settings).await;
    }

    let engine = ReportEngine::new_with_monitoring(pipeline, monitor_enabled);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Report generated successfully!");
            println!("✅ Report generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

async fn dry_run(
    pipeline: &ReportPipeline<LocalStorage, ReportSettings>,
    settings: &ReportSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let ingested = match pipeline.extract().await {
        Ok(ingested) => ingested,
        Err(e) => exit_with(&e),
    };

    println!("📋 Input: {}", settings.input_path);
    println!("   Format: {}", settings.format_name);
    println!("   Template: {}", settings.template);
    println!("   Records: {}", ingested.records.len());
    println!("   Skipped rows: {}", ingested.dropped_rows);
    println!("   Pages: {}", ingested.records.len() + 1);
    println!("{}", serde_json::to_string_pretty(&ingested.records)?);
    Ok(())
}

fn exit_with(e: &ReportError) -> ! {
    // 詳細錯誤只寫入日誌
    tracing::error!(
        "❌ Report generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}
