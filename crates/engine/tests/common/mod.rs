//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use presence_core::settings::PresenceSettings;
use presence_core::types::Timestamp;
use presence_db::models::department::CreateDepartment;
use presence_db::models::employee::{CreateEmployee, Employee};
use presence_db::{MemoryStore, PresenceStore};
use presence_engine::{AttendanceEngine, Clock, Directory, PresenceEngine};
use presence_events::{BroadcastHub, HubFrame, Subscription};

/// A manually driven clock shared by every engine of a [`TestEnv`].
#[derive(Clone)]
pub struct TestClock(Arc<Mutex<Timestamp>>);

impl TestClock {
    pub fn at(at: Timestamp) -> Self {
        Self(Arc::new(Mutex::new(at)))
    }

    pub fn set(&self, at: Timestamp) {
        *self.0.lock().unwrap() = at;
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }

    pub fn now(&self) -> Timestamp {
        *self.0.lock().unwrap()
    }

    pub fn clock(&self) -> Clock {
        let inner = Arc::clone(&self.0);
        Arc::new(move || *inner.lock().unwrap())
    }
}

pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub hub: Arc<BroadcastHub>,
    pub clock: TestClock,
    pub presence: PresenceEngine,
    pub attendance: AttendanceEngine,
    pub directory: Directory,
}

/// 2024-02-05 09:00 in Tokyo.
pub fn monday_morning() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap()
}

pub fn env() -> TestEnv {
    env_with(PresenceSettings::default())
}

pub fn env_with(settings: PresenceSettings) -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    let hub = Arc::new(BroadcastHub::new());
    let clock = TestClock::at(monday_morning());
    let dyn_store: Arc<dyn PresenceStore> = store.clone();

    let presence = PresenceEngine::new(dyn_store.clone(), hub.clone(), settings)
        .with_clock(clock.clock());
    let attendance = AttendanceEngine::new(dyn_store.clone(), hub.clone(), presence.clone())
        .with_clock(clock.clock());
    let directory = Directory::new(dyn_store, attendance.clone(), settings);

    TestEnv {
        store,
        hub,
        clock,
        presence,
        attendance,
        directory,
    }
}

impl TestEnv {
    pub async fn department(&self, name: &str) -> i64 {
        self.store
            .create_department(&CreateDepartment {
                name: name.to_string(),
                name_ja: format!("{name}部"),
                icon: None,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn employee(&self, department_id: i64, first_name: &str) -> Employee {
        self.store
            .create_employee(&CreateEmployee {
                first_name: first_name.to_string(),
                last_name: "Tanaka".to_string(),
                first_name_ja: first_name.to_string(),
                last_name_ja: "田中".to_string(),
                email: format!("{}@example.com", first_name.to_lowercase()),
                position: "Engineer".to_string(),
                position_ja: "エンジニア".to_string(),
                department_id,
                profile_image_url: None,
            })
            .await
            .unwrap()
    }
}

/// Decode the next queued frame as JSON, failing if none is queued.
pub fn next_event(sub: &mut Subscription) -> serde_json::Value {
    match sub.receiver.try_recv() {
        Ok(HubFrame::Payload(json)) => serde_json::from_str(&json).unwrap(),
        other => panic!("Expected a queued event, got: {other:?}"),
    }
}

/// Assert nothing is queued for `sub`.
pub fn assert_no_event(sub: &mut Subscription) {
    assert!(
        sub.receiver.try_recv().is_err(),
        "Expected no queued event"
    );
}
