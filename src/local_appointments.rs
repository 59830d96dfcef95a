use crate::{
    error::StoreError,
    store::{AppointmentFilter, AppointmentStore},
    types::Appointment,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

/// In-memory appointment store. The default backend when no external
/// database is wired up; everything is gone when the process exits.
#[derive(Debug, Clone, Default)]
pub struct LocalAppointments {
    appointments: Arc<Mutex<HashMap<Uuid, Appointment>>>,
}

impl AppointmentStore for LocalAppointments {
    fn find(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError> {
        let appointments = self.appointments.lock().unwrap();
        let mut matching: Vec<Appointment> = appointments
            .values()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect();
        matching.sort_unstable_by(|a, b| a.time.cmp(&b.time));
        Ok(matching)
    }

    fn find_one(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.lock().unwrap().get(&id).cloned())
    }

    fn save(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        self.appointments
            .lock()
            .unwrap()
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn delete(&self, filter: &AppointmentFilter) -> Result<usize, StoreError> {
        let mut appointments = self.appointments.lock().unwrap();
        let before = appointments.len();
        appointments.retain(|_, appointment| !filter.matches(appointment));
        Ok(before - appointments.len())
    }
}
