use crate::{
    configuration::Configuration,
    error::SchedulingError,
    expiry_scheduler::ExpiryScheduler,
    slots::generate_window_slots,
    store::{AppointmentFilter, AppointmentStore},
    types::{Appointment, AppointmentState, AppointmentSummary, AvailabilityWindow},
};
use chrono::{Duration, NaiveDate, Utc};
use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, Mutex},
};
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Get-or-create async mutexes addressed by key. Handles are shared, so
/// two tasks acquiring the same key serialize against each other.
struct KeyedLocks<K> {
    locks: Arc<Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>>,
}

impl<K> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self {
        Self {
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Arc::default(),
        }
    }
}

impl<K: Eq + Hash> KeyedLocks<K> {
    async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}

/// The appointment state machine. Owns every transition of an appointment
/// record; the store is only ever mutated from here.
///
/// All transitions for one appointment id are serialized through a per-id
/// lock, so a confirm and a concurrently firing expiry can never interleave
/// their read-modify-write cycles. Availability generation serializes per
/// (provider, day) for the same reason.
#[derive(Clone)]
pub struct AppointmentManager<S: AppointmentStore> {
    store: S,
    scheduler: ExpiryScheduler,
    slot_duration_minutes: i64,
    lead_time: Duration,
    unconfirmed_expiry: std::time::Duration,
    appointment_locks: KeyedLocks<Uuid>,
    availability_locks: KeyedLocks<(String, NaiveDate)>,
}

impl<S: AppointmentStore> AppointmentManager<S> {
    pub fn new<C: Configuration>(store: S, scheduler: ExpiryScheduler, configuration: &C) -> Self {
        Self {
            store,
            scheduler,
            slot_duration_minutes: configuration.slot_duration_minutes(),
            lead_time: Duration::hours(configuration.lead_time_hours()),
            unconfirmed_expiry: std::time::Duration::from_secs(
                configuration.unconfirmed_expiry_minutes() * 60,
            ),
            appointment_locks: KeyedLocks::default(),
            availability_locks: KeyedLocks::default(),
        }
    }

    pub fn list_available(
        &self,
        date: Option<NaiveDate>,
        provider: Option<&str>,
    ) -> Result<Vec<AppointmentSummary>, SchedulingError> {
        let filter = AppointmentFilter {
            provider: provider.map(str::to_owned),
            day: date,
            state: Some(AppointmentState::Available),
        };
        let mut appointments = self.store.find(&filter)?;
        appointments.sort_unstable_by(|a, b| a.time.cmp(&b.time));
        Ok(appointments.iter().map(Appointment::summary).collect())
    }

    pub fn get_by_id(&self, appointment_id: Uuid) -> Result<Appointment, SchedulingError> {
        self.store
            .find_one(appointment_id)?
            .ok_or(SchedulingError::NotFound(appointment_id))
    }

    /// Tentatively assigns the appointment to a client and starts the
    /// unconfirmed-reservation expiry timer. Re-reserving by the client
    /// already holding the slot succeeds and replaces the timer.
    pub async fn reserve(
        &self,
        appointment_id: Uuid,
        client: &str,
    ) -> Result<Appointment, SchedulingError> {
        let _guard = self.appointment_locks.acquire(appointment_id).await;

        let mut appointment = self
            .store
            .find_one(appointment_id)?
            .ok_or(SchedulingError::NotFound(appointment_id))?;

        if appointment.state != AppointmentState::Available
            && appointment.client.as_deref() != Some(client)
        {
            return Err(SchedulingError::AlreadyScheduled(appointment_id));
        }

        // Both instants are UTC, so the difference is timezone-skew free.
        let until_appointment = appointment.time.signed_duration_since(Utc::now());
        if until_appointment < self.lead_time {
            return Err(SchedulingError::LeadTimeViolation {
                required_hours: self.lead_time.num_hours(),
                actual_hours: until_appointment.num_minutes() as f64 / 60.0,
            });
        }

        appointment.state = AppointmentState::Reserved;
        appointment.client = Some(client.to_owned());
        let appointment = self.store.save(appointment)?;

        info!("appointment {appointment_id} reserved for client {client}");
        self.schedule_expiry(appointment_id);

        Ok(appointment)
    }

    /// Confirms a reserved appointment and cancels its expiry timer.
    /// Confirming an already confirmed appointment is idempotent.
    pub async fn confirm(&self, appointment_id: Uuid) -> Result<Appointment, SchedulingError> {
        let _guard = self.appointment_locks.acquire(appointment_id).await;

        let mut appointment = self
            .store
            .find_one(appointment_id)?
            .ok_or(SchedulingError::NotFound(appointment_id))?;

        if appointment.state == AppointmentState::Available {
            return Err(SchedulingError::NotReserved(appointment_id));
        }

        appointment.state = AppointmentState::Confirmed;
        let appointment = self.store.save(appointment)?;
        self.scheduler.cancel(appointment_id);

        info!("appointment {appointment_id} confirmed");
        Ok(appointment)
    }

    /// Replaces the provider's slots for the window's day with freshly
    /// generated ones. Without `overwrite`, existing appointments on that
    /// day are a conflict and stay untouched.
    pub async fn set_availability(
        &self,
        provider: &str,
        window: &AvailabilityWindow,
        overwrite: bool,
    ) -> Result<(), SchedulingError> {
        let slots = generate_window_slots(window, self.slot_duration_minutes)?;

        let _guard = self
            .availability_locks
            .acquire((provider.to_owned(), window.date))
            .await;

        let day_filter = AppointmentFilter::provider_day(provider, window.date);
        let existing = self.store.find(&day_filter)?;
        if !existing.is_empty() {
            if !overwrite {
                return Err(SchedulingError::AvailabilityExists(provider.to_owned()));
            }
            self.store.delete(&day_filter)?;
        }

        info!(
            "generating {} slots for provider {provider} on {}",
            slots.len(),
            window.date
        );
        for slot in slots {
            self.store.save(Appointment::available(provider, slot))?;
        }
        Ok(())
    }

    fn schedule_expiry(&self, appointment_id: Uuid) {
        let store = self.store.clone();
        let locks = self.appointment_locks.clone();
        self.scheduler
            .schedule(appointment_id, self.unconfirmed_expiry, move || {
                expire(store, locks, appointment_id)
            });
    }
}

/// Reverts a still-unconfirmed reservation back to available. Runs on the
/// expiry scheduler's timer, never on a request path. The appointment is
/// re-fetched by id because the record may have moved on since the timer
/// was registered; anything other than `Reserved` is left alone.
async fn expire<S: AppointmentStore>(store: S, locks: KeyedLocks<Uuid>, appointment_id: Uuid) {
    let _guard = locks.acquire(appointment_id).await;

    let mut appointment = match store.find_one(appointment_id) {
        Ok(Some(appointment)) => appointment,
        Ok(None) => return,
        Err(err) => {
            error!(?err, "could not load appointment {appointment_id} for expiry");
            return;
        }
    };

    if appointment.state != AppointmentState::Reserved {
        return;
    }

    warn!("appointment {appointment_id} unconfirmed, marking it available again");
    appointment.state = AppointmentState::Available;
    appointment.client = None;
    if let Err(err) = store.save(appointment) {
        // The record stays reserved until a later confirm or a manual
        // correction; no retry at this layer.
        error!(?err, "failed to release unconfirmed appointment {appointment_id}");
    }
}
