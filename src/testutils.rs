use crate::{
    configuration::Configuration,
    error::StoreError,
    store::{AppointmentFilter, AppointmentStore},
    types::Appointment,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};
use uuid::Uuid;

pub struct MockAppointmentStoreInner {
    pub fail_saves: AtomicBool,
    pub calls_to_find: AtomicU64,
    pub calls_to_find_one: AtomicU64,
    pub calls_to_save: AtomicU64,
    pub calls_to_delete: AtomicU64,
    pub appointments: Mutex<HashMap<Uuid, Appointment>>,
}

/// A real in-memory store with call counters and switchable save
/// failures, for driving the engine down its persistence-error paths.
#[derive(Clone)]
pub struct MockAppointmentStore(pub Arc<MockAppointmentStoreInner>);

impl MockAppointmentStore {
    pub fn new() -> Self {
        Self(Arc::new(MockAppointmentStoreInner {
            fail_saves: AtomicBool::new(false),
            calls_to_find: AtomicU64::default(),
            calls_to_find_one: AtomicU64::default(),
            calls_to_save: AtomicU64::default(),
            calls_to_delete: AtomicU64::default(),
            appointments: Mutex::default(),
        }))
    }

    pub fn fail_saves(&self, fail: bool) {
        self.0.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn appointment(&self, id: Uuid) -> Option<Appointment> {
        self.0.appointments.lock().unwrap().get(&id).cloned()
    }
}

impl AppointmentStore for MockAppointmentStore {
    fn find(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        self.0.calls_to_find.fetch_add(1, Ordering::SeqCst);
        let appointments = self.0.appointments.lock().unwrap();
        let mut matching: Vec<Appointment> = appointments
            .values()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect();
        matching.sort_unstable_by(|a, b| a.time.cmp(&b.time));
        Ok(matching)
    }

    fn find_one(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        self.0.calls_to_find_one.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.appointments.lock().unwrap().get(&id).cloned())
    }

    fn save(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        self.0.calls_to_save.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("save supposed to fail".into()));
        }
        self.0
            .appointments
            .lock()
            .unwrap()
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn delete(&self, filter: &AppointmentFilter) -> Result<usize, StoreError> {
        self.0.calls_to_delete.fetch_add(1, Ordering::SeqCst);
        let mut appointments = self.0.appointments.lock().unwrap();
        let before = appointments.len();
        appointments.retain(|_, appointment| !filter.matches(appointment));
        Ok(before - appointments.len())
    }
}

#[derive(Debug, Clone)]
pub struct TestConfiguration {
    pub port: u16,
    pub slot_duration_minutes: i64,
    pub lead_time_hours: i64,
    pub unconfirmed_expiry_minutes: u64,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            port: 0,
            slot_duration_minutes: 15,
            lead_time_hours: 24,
            unconfirmed_expiry_minutes: 30,
        }
    }
}

impl Configuration for TestConfiguration {
    fn port(&self) -> u16 {
        self.port
    }

    fn slot_duration_minutes(&self) -> i64 {
        self.slot_duration_minutes
    }

    fn lead_time_hours(&self) -> i64 {
        self.lead_time_hours
    }

    fn unconfirmed_expiry_minutes(&self) -> u64 {
        self.unconfirmed_expiry_minutes
    }
}
