//! Background scheduler for case monitoring.
//!
//! Every tick checks the watched cases whose next check is due.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;
use jurisdesk_core::monitoring::CheckOutcome;

/// Initial delay before the first tick, to let the server start.
const INITIAL_DELAY_SECS: u64 = 10;

pub fn start_monitoring_scheduler(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        info!("Monitoring scheduler started ({}s interval)", period.as_secs());
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            run_due_checks(&state).await;
        }
    });
}

/// Runs one round of due checks.
pub async fn run_due_checks(state: &AppState) {
    match state.monitoring_service.check_due(Utc::now()).await {
        Ok(outcomes) if outcomes.is_empty() => debug!("No watched case due"),
        Ok(outcomes) => {
            let changed = outcomes
                .iter()
                .filter(|o| matches!(o, CheckOutcome::Changed { .. }))
                .count();
            let failed = outcomes
                .iter()
                .filter(|o| matches!(o, CheckOutcome::Failed { .. }))
                .count();
            info!(
                "Checked {} watched case(s): {} changed, {} failed",
                outcomes.len(),
                changed,
                failed
            );
        }
        Err(e) => warn!("Monitoring round failed: {}", e),
    }
}
