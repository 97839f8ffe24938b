//! Current presence status per employee.

use std::sync::Arc;

use presence_core::error::CoreError;
use presence_core::geo::GeoLocation;
use presence_core::presence::validate_comment;
use presence_core::settings::PresenceSettings;
use presence_core::types::DbId;
use presence_db::models::employee_status::{EmployeeStatus, UpsertEmployeeStatus};
use presence_db::PresenceStore;
use presence_events::{BroadcastHub, PresenceEvent};

use crate::clock::{system_clock, Clock};
use crate::error::EngineResult;

/// Sets and reads employee presence statuses.
///
/// Each employee has at most one status row; every write replaces it
/// entirely (last writer wins).
#[derive(Clone)]
pub struct PresenceEngine {
    store: Arc<dyn PresenceStore>,
    hub: Arc<BroadcastHub>,
    settings: PresenceSettings,
    clock: Clock,
}

impl PresenceEngine {
    pub fn new(
        store: Arc<dyn PresenceStore>,
        hub: Arc<BroadcastHub>,
        settings: PresenceSettings,
    ) -> Self {
        Self {
            store,
            hub,
            settings,
            clock: system_clock(),
        }
    }

    /// Replace the clock used for `last_updated`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> PresenceSettings {
        self.settings
    }

    /// Set the status of `employee_id` and broadcast `STATUS_UPDATE`.
    ///
    /// `status` must belong to the active profile and `comment` must fit
    /// the length limit; otherwise nothing is written.
    pub async fn set_status(
        &self,
        employee_id: DbId,
        status: &str,
        comment: Option<&str>,
        location: GeoLocation,
    ) -> EngineResult<EmployeeStatus> {
        self.settings.profile.validate_status(status)?;
        validate_comment(comment)?;
        self.require_employee(employee_id).await?;

        let saved = self
            .record(employee_id, status, comment.map(str::to_string), location)
            .await?;

        tracing::info!(employee_id, status = %saved.status, "Status updated");
        self.hub.publish(&PresenceEvent::status_update(saved.clone())).await;
        Ok(saved)
    }

    /// Current status of `employee_id`.
    pub async fn get_status(&self, employee_id: DbId) -> EngineResult<EmployeeStatus> {
        self.store
            .find_status(employee_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "EmployeeStatus",
                    id: employee_id,
                }
                .into()
            })
    }

    /// Every status row, ordered by employee.
    pub async fn list_statuses(&self) -> EngineResult<Vec<EmployeeStatus>> {
        Ok(self.store.list_statuses().await?)
    }

    /// Upsert the status row without validating or broadcasting.
    ///
    /// Used by clock-in/out, which announce the change through their own
    /// attendance event.
    pub(crate) async fn record(
        &self,
        employee_id: DbId,
        status: &str,
        comment: Option<String>,
        location: GeoLocation,
    ) -> EngineResult<EmployeeStatus> {
        let input = UpsertEmployeeStatus {
            employee_id,
            status: status.to_string(),
            comment,
            location,
            last_updated: (self.clock)(),
        };
        Ok(self.store.upsert_status(&input).await?)
    }

    pub(crate) async fn require_employee(&self, employee_id: DbId) -> EngineResult<()> {
        match self.store.find_employee(employee_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                entity: "Employee",
                id: employee_id,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use presence_db::MemoryStore;

    use super::*;
    use crate::error::EngineError;

    fn engine() -> PresenceEngine {
        PresenceEngine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(BroadcastHub::new()),
            PresenceSettings::default(),
        )
    }

    #[tokio::test]
    async fn unknown_status_is_rejected_before_lookup() {
        let err = engine()
            .set_status(1, "sleeping", None, GeoLocation::default())
            .await
            .unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::Validation(msg)) if msg.contains("sleeping"));
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let err = engine()
            .set_status(404, "remote", None, GeoLocation::default())
            .await
            .unwrap_err();
        assert_matches!(
            err,
            EngineError::Core(CoreError::NotFound { entity: "Employee", id: 404 })
        );
    }

    #[tokio::test]
    async fn missing_status_row_is_not_found() {
        let err = engine().get_status(7).await.unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::NotFound { .. }));
    }
}
