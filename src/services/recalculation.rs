use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use log::info;

use super::recompute::{BulkRecalcReport, RecomputeService};
use crate::config::settings::AppConfig;
use crate::database;
use crate::rating::EntityKind;

/// Command-line bulk recalculation against the configured database.
pub struct RecalculationService {
    config: AppConfig,
    recompute: RecomputeService,
}

impl RecalculationService {
    pub fn new(config: AppConfig) -> Self {
        Self {
            recompute: RecomputeService::new(config.rating.clone()),
            config,
        }
    }

    pub fn run(&self, kinds: &[EntityKind]) -> Result<Vec<BulkRecalcReport>> {
        info!("=== Starting Rating Recalculation ===\n");
        info!("Target DB: {}", self.config.storage.database_path);

        let pool = database::create_pool(&self.config.storage.database_path)?;
        let conn = database::get_connection(&pool)?;
        database::setup::init_database(&conn)?;

        let now = Utc::now().naive_utc();
        let mut reports = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let report = self.recompute.recalculate_kind(&conn, *kind, now)?;
            print_summary(&report);
            reports.push(report);
        }

        info!("=== Recalculation Complete ===");
        Ok(reports)
    }
}

fn print_summary(report: &BulkRecalcReport) {
    let header = format!("{}:", report.kind.table());
    println!(
        "{} {} updated, {} failed",
        header.bold(),
        report.updated_count.to_string().green(),
        colour_failures(report.errors.len())
    );

    for line in &report.errors {
        println!("  {} {}", "✗".red(), line);
    }
}

fn colour_failures(count: usize) -> colored::ColoredString {
    if count == 0 {
        count.to_string().normal()
    } else {
        count.to_string().red()
    }
}
