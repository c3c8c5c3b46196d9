use super::errors::{guidance, MigrationError};
use super::outcome::{MigrationOutcome, RunVerdict};
use crate::errors::FailureKind;
use crate::logging::MigrationLogger;

/// Log a per-item failure with its remediation hints.
///
/// Plan limitation guidance is printed only for the first occurrence of a run;
/// `plan_guidance_shown` carries that state between items.
pub(crate) fn report_item_failure(
    logger: &dyn MigrationLogger,
    item: &str,
    err: &MigrationError,
    plan_guidance_shown: &mut bool,
) {
    let kind = err.kind();
    logger.error(&format!("{item}: {kind}: {err}"));

    match kind {
        FailureKind::PlanLimitation if *plan_guidance_shown => {
            logger.verbose("Plan limitation guidance already shown above");
        }
        FailureKind::PlanLimitation => {
            *plan_guidance_shown = true;
            for line in guidance(kind) {
                logger.info(&format!("   {line}"));
            }
        }
        FailureKind::Unexpected => {
            for line in guidance(kind) {
                logger.info(&format!("   {line}"));
            }
            logger.verbose(&err.detail());
        }
        _ => {
            for line in guidance(kind) {
                logger.info(&format!("   {line}"));
            }
        }
    }
}

/// Print the counts, the fixed caveats and the run verdict
pub(crate) fn emit_summary(
    logger: &dyn MigrationLogger,
    title: &str,
    outcome: &MigrationOutcome,
    caveats: &[&str],
) {
    logger.info("");
    logger.info(&format!("📊 {title} summary"));
    logger.info(&format!("   ✅ Migrated: {}", outcome.succeeded));
    logger.info(&format!("   ⏭️  Skipped:  {}", outcome.skipped));
    logger.info(&format!("   ❌ Failed:   {}", outcome.failed));

    if outcome.failed > 0 {
        for item in outcome.failures() {
            logger.verbose(&format!("failed: {}", item.item));
        }
    }

    if !caveats.is_empty() {
        logger.info("");
        logger.info("📝 Not migrated automatically:");
        for caveat in caveats {
            logger.info(&format!("   → {caveat}"));
        }
    }

    logger.info("");
    match outcome.verdict() {
        RunVerdict::Completed => logger.success(&format!("{title} completed")),
        RunVerdict::NothingMigrated => {
            logger.info(&format!("{title} finished: nothing was migrated"))
        }
        RunVerdict::PartialFailure => logger.error(&format!(
            "{title} partially failed: {} migrated, {} failed",
            outcome.succeeded, outcome.failed
        )),
        RunVerdict::Failed => logger.error(&format!(
            "{title} failed: all {} attempted items failed",
            outcome.failed
        )),
    }
}
