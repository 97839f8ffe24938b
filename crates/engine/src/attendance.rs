//! Clock-in/out and attendance history.

use std::sync::Arc;

use presence_core::attendance::{
    local_day, month_bounds, validate_clock_times, validate_date_range, work_minutes,
};
use presence_core::error::CoreError;
use presence_core::geo::GeoLocation;
use presence_core::types::{DbId, WorkDate};
use presence_db::models::attendance::{
    AttendanceRecord, CreateAttendanceRecord, UpdateAttendanceRecord,
};
use presence_db::{PresenceStore, ATTENDANCE_DAY_CONSTRAINT};
use presence_events::{AttendanceAction, BroadcastHub, PresenceEvent};

use crate::clock::{system_clock, Clock};
use crate::error::EngineResult;
use crate::presence::PresenceEngine;

/// Records one attendance row per employee per local calendar day.
///
/// Clock-in and clock-out also move the employee's presence status, but
/// only the attendance event is broadcast.
#[derive(Clone)]
pub struct AttendanceEngine {
    store: Arc<dyn PresenceStore>,
    hub: Arc<BroadcastHub>,
    presence: PresenceEngine,
    clock: Clock,
}

impl AttendanceEngine {
    pub fn new(
        store: Arc<dyn PresenceStore>,
        hub: Arc<BroadcastHub>,
        presence: PresenceEngine,
    ) -> Self {
        Self {
            store,
            hub,
            presence,
            clock: system_clock(),
        }
    }

    /// Replace the clock used for clock times and day buckets. The
    /// presence side effects keep the clock of the wrapped engine.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The local calendar day of "now".
    pub fn today(&self) -> WorkDate {
        local_day((self.clock)(), self.presence.settings().timezone)
    }

    /// Start today's record for `employee_id`.
    ///
    /// Fails with `AlreadyClockedIn` when today's record already has a
    /// clock-in time, including when a concurrent clock-in wins the insert.
    pub async fn clock_in(
        &self,
        employee_id: DbId,
        status: &str,
        location: GeoLocation,
    ) -> EngineResult<AttendanceRecord> {
        self.presence.settings().profile.validate_status(status)?;
        self.presence.require_employee(employee_id).await?;

        let now = (self.clock)();
        let today = local_day(now, self.presence.settings().timezone);

        let record = match self.store.find_attendance_for_day(employee_id, today).await? {
            Some(existing) if existing.is_clocked_in() => {
                return Err(CoreError::AlreadyClockedIn { employee_id }.into());
            }
            Some(placeholder) => {
                let patch = UpdateAttendanceRecord::clock_in(now, location.clone(), status);
                self.store
                    .update_attendance(placeholder.id, &patch)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "AttendanceRecord",
                        id: placeholder.id,
                    })?
            }
            None => {
                let input = CreateAttendanceRecord {
                    employee_id,
                    work_date: today,
                    clock_in_time: Some(now),
                    clock_in: location.clone(),
                    status: status.to_string(),
                };
                match self.store.create_attendance(&input).await {
                    Ok(record) => record,
                    Err(e) if e.is_conflict_on(ATTENDANCE_DAY_CONSTRAINT) => {
                        tracing::debug!(employee_id, "Lost clock-in race for today");
                        return Err(CoreError::AlreadyClockedIn { employee_id }.into());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        self.presence
            .record(employee_id, status, None, location)
            .await?;

        tracing::info!(employee_id, record_id = record.id, %today, "Clocked in");
        self.publish(AttendanceAction::ClockIn, &record).await;
        Ok(record)
    }

    /// Close today's record for `employee_id` and set the off-duty status.
    pub async fn clock_out(
        &self,
        employee_id: DbId,
        location: GeoLocation,
    ) -> EngineResult<AttendanceRecord> {
        self.presence.require_employee(employee_id).await?;

        let now = (self.clock)();
        let today = local_day(now, self.presence.settings().timezone);

        let existing = self
            .store
            .find_attendance_for_day(employee_id, today)
            .await?
            .filter(AttendanceRecord::is_clocked_in)
            .ok_or(CoreError::NoClockIn { employee_id })?;
        let clock_in = existing
            .clock_in_time
            .ok_or(CoreError::NoClockIn { employee_id })?;
        validate_clock_times(Some(clock_in), Some(now))?;

        let patch =
            UpdateAttendanceRecord::clock_out(now, location.clone(), work_minutes(clock_in, now));
        let record = self
            .store
            .update_attendance(existing.id, &patch)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "AttendanceRecord",
                id: existing.id,
            })?;

        let off_duty = self.presence.settings().profile.off_duty_status();
        self.presence
            .record(employee_id, off_duty, None, location)
            .await?;

        tracing::info!(
            employee_id,
            record_id = record.id,
            work_minutes = record.work_hours,
            "Clocked out"
        );
        self.publish(AttendanceAction::ClockOut, &record).await;
        Ok(record)
    }

    /// Apply a manual correction to record `id`.
    ///
    /// Always marks the record modified. When the clock times change and
    /// `work_hours` is not supplied, it is recomputed from the merged times.
    pub async fn update_record(
        &self,
        id: DbId,
        mut patch: UpdateAttendanceRecord,
    ) -> EngineResult<AttendanceRecord> {
        let not_found = || CoreError::NotFound {
            entity: "AttendanceRecord",
            id,
        };
        let existing = self.store.find_attendance(id).await?.ok_or_else(not_found)?;

        patch.is_modified = Some(true);
        if let Some(status) = &patch.status {
            self.presence.settings().profile.validate_status(status)?;
        }

        let mut merged = existing;
        patch.apply_to(&mut merged);
        validate_clock_times(merged.clock_in_time, merged.clock_out_time)?;

        let times_changed = patch.clock_in_time.is_some() || patch.clock_out_time.is_some();
        if times_changed && patch.work_hours.is_none() {
            if let (Some(clock_in), Some(clock_out)) = (merged.clock_in_time, merged.clock_out_time)
            {
                patch.work_hours = Some(work_minutes(clock_in, clock_out));
            }
        }

        let record = self
            .store
            .update_attendance(id, &patch)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(
            record_id = id,
            employee_id = record.employee_id,
            reason = record.modification_reason.as_deref().unwrap_or(""),
            "Attendance record corrected"
        );
        Ok(record)
    }

    /// Records of `employee_id` in `(year, month)`, newest day first.
    pub async fn get_monthly_attendance(
        &self,
        employee_id: DbId,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let (start, end) = month_bounds(year, month)?;
        Ok(self
            .store
            .list_attendance_between(employee_id, start, end)
            .await?)
    }

    /// Today's record of `employee_id`, if any.
    pub async fn get_today(&self, employee_id: DbId) -> EngineResult<Option<AttendanceRecord>> {
        Ok(self
            .store
            .find_attendance_for_day(employee_id, self.today())
            .await?)
    }

    /// Records of `employee_id` with `work_date` in `[start, end]`, newest
    /// first.
    pub async fn get_attendance_between(
        &self,
        employee_id: DbId,
        start: WorkDate,
        end: WorkDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        validate_date_range(start, end)?;
        Ok(self
            .store
            .list_attendance_between(employee_id, start, end)
            .await?)
    }

    async fn publish(&self, action: AttendanceAction, record: &AttendanceRecord) {
        let event = PresenceEvent::attendance_update(action, record.clone());
        self.hub.publish(&event).await;
    }
}
