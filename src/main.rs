use clap::Parser;
use customer_import::core::Storage;
use customer_import::domain::model::RecordOutcome;
use customer_import::utils::{logger, validation::Validate};
use customer_import::{
    CliConfig, ConfiguredRepository, ImportConfig, ImportError, ImportRunner, LocalStorage,
    SourceFormat,
};

const RECORD_FAILURE_EXIT_CODE: i32 = 4;

fn exit_with(e: &ImportError) -> ! {
    tracing::error!(
        "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    println!(
        "Importing customers from profile: {}, source: {}",
        cli.profile_name, cli.source
    );

    // 不支援的格式在讀取配置與連線之前就失敗
    if let Err(e) = SourceFormat::require(&cli.source) {
        exit_with(&e);
    }

    let config = match ImportConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let repository = match ConfiguredRepository::from_config(&config.repository, cli.dry_run) {
        Ok(repository) => repository,
        Err(e) => exit_with(&e),
    };

    let monitor_enabled = cli.monitor || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::default();
    let runner = ImportRunner::new_with_monitoring(storage.clone(), repository, config, monitor_enabled)
        .dry_run(cli.dry_run);

    let summary = match runner.run(&cli.profile_name, &cli.source).await {
        Ok(summary) => summary,
        Err(e) => exit_with(&e),
    };

    for record in &summary.records {
        let email = record.email.as_deref().unwrap_or("<no email>");
        match &record.outcome {
            RecordOutcome::Created { .. } => {}
            RecordOutcome::SkippedExisting { .. } => {
                println!("Customer {} already exists. Skipping...", email)
            }
            RecordOutcome::Failed { stage, reason } => println!(
                "Record {} ({}) failed at {:?}: {}",
                record.position, email, stage, reason
            ),
        }
    }

    println!("Import process completed.");
    println!(
        "📊 {} records: {} created, {} skipped, {} failed{}",
        summary.total(),
        summary.created,
        summary.skipped,
        summary.failed,
        if summary.dry_run { " (dry run)" } else { "" }
    );

    if let Some(report_path) = &cli.report {
        let report = match serde_json::to_vec_pretty(&summary) {
            Ok(report) => report,
            Err(e) => exit_with(&ImportError::from(e)),
        };
        if let Err(e) = storage.write_file(report_path, &report).await {
            exit_with(&e);
        }
        println!("📁 Report saved to: {}", report_path);
    }

    if cli.fail_on_record_errors && summary.has_failures() {
        tracing::warn!("{} records failed, exiting with code {}", summary.failed, RECORD_FAILURE_EXIT_CODE);
        std::process::exit(RECORD_FAILURE_EXIT_CODE);
    }

    Ok(())
}
