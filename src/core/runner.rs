use crate::core::dedup::{self, Lookup};
use crate::core::format::SourceFormat;
use crate::core::mapper::FieldMapper;
use crate::core::parser::{self, ParsedRecord};
use crate::core::{ConfigProvider, CustomerRepository, Storage};
use crate::domain::model::{FailureStage, RecordOutcome, RecordReport, RunSummary};
use crate::utils::error::{RecordError, Result};
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

/// Drives one import: detect, parse, then map / dedup / save each record in
/// file order. A failing record never stops the run.
pub struct ImportRunner<S: Storage, R: CustomerRepository, C: ConfigProvider> {
    storage: S,
    repository: R,
    config: C,
    monitor: SystemMonitor,
    dry_run: bool,
}

impl<S: Storage, R: CustomerRepository, C: ConfigProvider> ImportRunner<S, R, C> {
    pub fn new(storage: S, repository: R, config: C) -> Self {
        Self::new_with_monitoring(storage, repository, config, false)
    }

    pub fn new_with_monitoring(storage: S, repository: R, config: C, monitor_enabled: bool) -> Self {
        Self {
            storage,
            repository,
            config,
            monitor: SystemMonitor::new(monitor_enabled),
            dry_run: false,
        }
    }

    /// Marks the summary as a dry run. The repository choice is the caller's.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn run(&self, profile_name: &str, source_path: &str) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!(
            "🚀 Importing customers from profile: {}, source: {}",
            profile_name,
            source_path
        );

        // 先檢查格式，不支援的格式不讀檔
        let format = SourceFormat::require(source_path)?;
        let profile = self.config.profile(profile_name)?;
        let mapper = FieldMapper::new(profile.fields.clone(), profile.defaults);

        let data = self.storage.read_file(source_path).await?;
        let records = parser::parse_records(source_path, format, &data)?;
        tracing::info!("📥 Parsed {} {} records", records.len(), format);
        self.monitor.log_stats("Parse");

        let mut summary = RunSummary {
            profile: profile.name.clone(),
            source: source_path.to_string(),
            format: format.to_string(),
            dry_run: self.dry_run,
            started_at,
            finished_at: started_at,
            created: 0,
            skipped: 0,
            failed: 0,
            records: Vec::with_capacity(records.len()),
        };

        for parsed in &records {
            let report = self.process(&mapper, &profile.fields.email, parsed).await;
            log_report(&report);
            summary.push(report);
        }

        summary.finished_at = Utc::now();
        self.monitor.log_stats("Import");
        self.monitor.log_final_stats();

        tracing::info!(
            "✅ Import process completed: {} created, {} skipped, {} failed",
            summary.created,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    async fn process(
        &self,
        mapper: &FieldMapper,
        email_field: &str,
        parsed: &ParsedRecord,
    ) -> RecordReport {
        let raw = match parsed {
            ParsedRecord::Valid(raw) => raw,
            ParsedRecord::Malformed { position, error } => {
                return failed(*position, None, FailureStage::Mapping, error);
            }
        };
        let position = raw.position;

        let customer = match mapper.map(raw) {
            Ok(customer) => customer,
            Err(e) => {
                let email = raw.get(email_field).map(str::to_string);
                return failed(position, email, FailureStage::Mapping, &e);
            }
        };
        let email = Some(customer.email.clone());

        let outcome = match dedup::resolve(&customer.email, &self.repository).await {
            Lookup::Found(existing) => RecordOutcome::SkippedExisting {
                existing_id: existing.id,
            },
            Lookup::LookupFailed(reason) => {
                return failed(
                    position,
                    email,
                    FailureStage::Lookup,
                    &RecordError::LookupFailed(reason),
                );
            }
            Lookup::NotFound => match self.repository.save(&customer).await {
                Ok(stored) => RecordOutcome::Created { id: stored.id },
                Err(e) => {
                    return failed(
                        position,
                        email,
                        FailureStage::Save,
                        &RecordError::SaveFailed(e.to_string()),
                    );
                }
            },
        };

        RecordReport {
            position,
            email,
            outcome,
        }
    }
}

fn failed(
    position: usize,
    email: Option<String>,
    stage: FailureStage,
    error: &RecordError,
) -> RecordReport {
    RecordReport {
        position,
        email,
        outcome: RecordOutcome::Failed {
            stage,
            reason: error.to_string(),
        },
    }
}

fn log_report(report: &RecordReport) {
    let email = report.email.as_deref().unwrap_or("<none>");
    match &report.outcome {
        RecordOutcome::Created { id } => {
            tracing::info!("Record {}: created customer {} (id {})", report.position, email, id)
        }
        RecordOutcome::SkippedExisting { existing_id } => tracing::info!(
            "Record {}: customer {} already exists (id {}), skipping",
            report.position,
            email,
            existing_id
        ),
        RecordOutcome::Failed { stage, reason } => tracing::warn!(
            "Record {}: {:?} failed for {}: {}",
            report.position,
            stage,
            email,
            reason
        ),
    }
}
