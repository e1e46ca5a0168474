use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use super::monitoring_model::{
    identity_keys, CheckOutcome, MonitoringStats, NewWatch, WatchStatus, WatchedCase,
};
use super::monitoring_traits::MonitoringServiceTrait;
use crate::constants::MONITORING_KEY;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::storage::{load_collection, save_collection, BlobStore};
use jurisdesk_court_data::{Case, CaseLookup, CaseNumber};

/// Registry of watched cases over the `monitoring` blob.
pub struct MonitoringService {
    blobs: Arc<dyn BlobStore>,
    lookup: Arc<dyn CaseLookup>,
    event_sink: Arc<dyn DomainEventSink>,
    watched: RwLock<Vec<WatchedCase>>,
    write_lock: Mutex<()>,
}

impl MonitoringService {
    pub fn load(
        blobs: Arc<dyn BlobStore>,
        lookup: Arc<dyn CaseLookup>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Result<Self> {
        let watched: Vec<WatchedCase> = load_collection(blobs.as_ref(), MONITORING_KEY)?;
        debug!("Loaded {} watched case(s)", watched.len());
        Ok(Self {
            blobs,
            lookup,
            event_sink,
            watched: RwLock::new(watched),
            write_lock: Mutex::new(()),
        })
    }

    fn snapshot(&self) -> Result<Vec<WatchedCase>> {
        self.watched
            .read()
            .map(|w| w.clone())
            .map_err(|_| Error::Repository("Monitoring registry lock poisoned".to_string()))
    }

    async fn commit(&self, watched: Vec<WatchedCase>) -> Result<()> {
        save_collection(self.blobs.as_ref(), MONITORING_KEY, &watched).await?;
        let mut guard = self
            .watched
            .write()
            .map_err(|_| Error::Repository("Monitoring registry lock poisoned".to_string()))?;
        *guard = watched;
        Ok(())
    }

    /// Applies `change` to the entry with `id` and persists the registry.
    async fn modify<F>(&self, id: &str, change: F) -> Result<WatchedCase>
    where
        F: FnOnce(&mut WatchedCase) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut watched = self.snapshot()?;
        let entry = watched
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::NotFound(format!("Watched case {}", id)))?;
        change(entry);
        let updated = entry.clone();
        self.commit(watched).await?;
        Ok(updated)
    }

    async fn set_status(&self, case_number: &str, status: WatchStatus) -> Result<WatchedCase> {
        let id = monitor_id_for(case_number)?;
        let updated = self.modify(&id, |w| w.status = status).await?;
        info!("Monitoring of {} is now {:?}", updated.case_number, status);
        Ok(updated)
    }

    async fn record_success(&self, id: &str, case: Case) -> Result<CheckOutcome> {
        let now = Utc::now();
        let mut outcome = None;
        let updated = self
            .modify(id, |w| {
                let known: HashSet<&str> = w.known_movements.iter().map(String::as_str).collect();
                let new_movements: Vec<_> = case
                    .activity_log
                    .iter()
                    .filter(|m| !known.contains(m.identity_key().as_str()))
                    .cloned()
                    .collect();
                let advanced = match (w.last_activity_date, case.last_activity_date) {
                    (Some(before), Some(after)) => after > before,
                    (None, Some(_)) => true,
                    _ => false,
                };

                outcome = Some(if new_movements.is_empty() && !advanced {
                    CheckOutcome::Unchanged {
                        case_number: w.case_number.clone(),
                    }
                } else {
                    CheckOutcome::Changed {
                        case_number: w.case_number.clone(),
                        new_movements,
                        last_activity_date: case.last_activity_date,
                    }
                });

                w.known_movements = identity_keys(&case.activity_log);
                if case.last_activity_date.is_some() {
                    w.last_activity_date = case.last_activity_date;
                }
                if w.court.is_empty() {
                    w.court = case.court.clone();
                }
                if w.status == WatchStatus::Error {
                    w.status = WatchStatus::Watching;
                }
                w.last_error = None;
                w.schedule_after(now);
            })
            .await?;

        let outcome = outcome.ok_or_else(|| {
            Error::Unexpected(format!("No check outcome for {}", updated.case_number))
        })?;
        if let CheckOutcome::Changed {
            case_number,
            new_movements,
            last_activity_date,
        } = &outcome
        {
            info!(
                "Case {} changed: {} new movement(s)",
                case_number,
                new_movements.len()
            );
            self.event_sink.emit(DomainEvent::monitored_case_changed(
                case_number.clone(),
                new_movements
                    .iter()
                    .map(|m| format!("{} - {}", m.kind, m.description))
                    .collect(),
                *last_activity_date,
            ));
        }
        Ok(outcome)
    }

    async fn record_failure(&self, id: &str, message: String) -> Result<CheckOutcome> {
        let now = Utc::now();
        let updated = self
            .modify(id, |w| {
                w.status = WatchStatus::Error;
                w.last_error = Some(message.clone());
                w.schedule_after(now);
            })
            .await?;

        warn!("Monitoring check of {} failed: {}", updated.case_number, message);
        self.event_sink.emit(DomainEvent::monitoring_failed(
            updated.case_number.clone(),
            message.clone(),
        ));
        Ok(CheckOutcome::Failed {
            case_number: updated.case_number,
            message,
        })
    }

    async fn check_entry(&self, entry: &WatchedCase) -> Result<CheckOutcome> {
        debug!("Checking watched case {}", entry.case_number);
        match self.lookup.resolve(&entry.case_number).await {
            Ok(case) => self.record_success(&entry.id, case).await,
            Err(e) => self.record_failure(&entry.id, e.to_string()).await,
        }
    }
}

fn monitor_id_for(case_number: &str) -> Result<String> {
    let number = CaseNumber::parse(case_number)?;
    Ok(WatchedCase::monitor_id(number.digits()))
}

#[async_trait]
impl MonitoringServiceTrait for MonitoringService {
    fn list(&self) -> Result<Vec<WatchedCase>> {
        self.snapshot()
    }

    fn get(&self, case_number: &str) -> Result<WatchedCase> {
        let id = monitor_id_for(case_number)?;
        self.snapshot()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::NotFound(format!("Watched case {}", case_number)))
    }

    fn stats(&self) -> Result<MonitoringStats> {
        Ok(MonitoringStats::from_watched(&self.snapshot()?))
    }

    async fn watch(&self, request: NewWatch) -> Result<WatchedCase> {
        if request.interval_minutes == 0 {
            return Err(ValidationError::InvalidInput(
                "Monitoring interval must be at least one minute".to_string(),
            )
            .into());
        }
        let number = CaseNumber::parse(&request.case_number)?;
        let id = WatchedCase::monitor_id(number.digits());
        if self.snapshot()?.iter().any(|w| w.id == id) {
            return Err(Error::ConstraintViolation(format!(
                "Case {} is already being monitored",
                number
            )));
        }

        let case = self.lookup.resolve(&request.case_number).await?;
        let watched = WatchedCase::from_case(number.digits(), &case, &request, Utc::now());

        let _guard = self.write_lock.lock().await;
        let mut all = self.snapshot()?;
        if all.iter().any(|w| w.id == id) {
            return Err(Error::ConstraintViolation(format!(
                "Case {} is already being monitored",
                number
            )));
        }
        all.push(watched.clone());
        self.commit(all).await?;

        info!(
            "Started monitoring {} every {} minute(s)",
            watched.case_number, watched.interval_minutes
        );
        Ok(watched)
    }

    async fn pause(&self, case_number: &str) -> Result<WatchedCase> {
        self.set_status(case_number, WatchStatus::Paused).await
    }

    async fn resume(&self, case_number: &str) -> Result<WatchedCase> {
        self.set_status(case_number, WatchStatus::Watching).await
    }

    async fn stop(&self, case_number: &str) -> Result<()> {
        let id = monitor_id_for(case_number)?;
        let _guard = self.write_lock.lock().await;
        let mut watched = self.snapshot()?;
        let before = watched.len();
        watched.retain(|w| w.id != id);
        if watched.len() == before {
            return Err(Error::NotFound(format!("Watched case {}", case_number)));
        }
        self.commit(watched).await?;
        info!("Stopped monitoring {}", case_number);
        Ok(())
    }

    async fn check(&self, case_number: &str) -> Result<CheckOutcome> {
        let entry = self.get(case_number)?;
        self.check_entry(&entry).await
    }

    async fn check_due(&self, now: DateTime<Utc>) -> Result<Vec<CheckOutcome>> {
        let due: Vec<WatchedCase> = self
            .snapshot()?
            .into_iter()
            .filter(|w| w.is_due(now))
            .collect();
        if due.is_empty() {
            return Ok(Vec::new());
        }

        debug!("{} watched case(s) due for a check", due.len());
        let mut outcomes = Vec::with_capacity(due.len());
        for entry in &due {
            match self.check_entry(entry).await {
                Ok(outcome) => outcomes.push(outcome),
                // Stopped while the lookup was running.
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(outcomes)
    }
}
