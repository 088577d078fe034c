use clap::Parser;
use venue_maps::utils::{logger, validation::Validate};
use venue_maps::{
    CliConfig, ExportConfig, ExportEngine, ExportError, ExportPipeline, FoursquareClient,
    LocalStorage,
};

fn report_failure(stage: &str, e: &ExportError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting venue-maps");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", CliConfig { token: None, ..cli.clone() });
    }

    // 載入並驗證配置
    let config = match ExportConfig::from_cli(&cli).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => report_failure("Configuration", &e),
    };
    tracing::info!(
        "✅ Configuration loaded: {} lists, output {} → {}",
        config.interest.len(),
        config.format.label(),
        config.output_path
    );

    let source = match FoursquareClient::new(
        &config.api.base_url,
        &config.token,
        &config.api.version,
        config.timeout(),
    ) {
        Ok(source) => source,
        Err(e) => report_failure("Client setup", &e),
    };

    let pipeline = ExportPipeline::new(source, LocalStorage::default(), config);
    let engine = ExportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Export completed successfully!");
            println!("File to upload:\n{}", output_path);
        }
        Err(e) => report_failure("Export", &e),
    }
}
