use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{task::JoinHandle, time::sleep};
use tracing::debug;
use uuid::Uuid;

/// One cancellable delayed task per outstanding reservation.
///
/// Timers live in process memory only; a restart forgets them all. The
/// expiry callback must therefore tolerate firing against state that has
/// moved on, and confirmation must win any race against a firing timer.
#[derive(Debug, Clone, Default)]
pub struct ExpiryScheduler {
    timers: Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>,
}

impl ExpiryScheduler {
    /// Registers a timer for the appointment, replacing and aborting any
    /// timer already registered under the same id.
    pub fn schedule<F, Fut>(&self, appointment_id: Uuid, delay: Duration, on_expire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let timers = Arc::clone(&self.timers);
        let task = tokio::spawn(async move {
            sleep(delay).await;
            on_expire().await;
            timers.lock().unwrap().remove(&appointment_id);
        });

        if let Some(previous) = self.timers.lock().unwrap().insert(appointment_id, task) {
            debug!("replacing expiry timer for appointment {appointment_id}");
            previous.abort();
        }
    }

    /// Cancels the appointment's timer. Absence is a normal outcome, not
    /// an error: the timer may already have fired or never been scheduled.
    pub fn cancel(&self, appointment_id: Uuid) {
        if let Some(task) = self.timers.lock().unwrap().remove(&appointment_id) {
            task.abort();
        }
    }

    pub fn is_scheduled(&self, appointment_id: Uuid) -> bool {
        self.timers.lock().unwrap().contains_key(&appointment_id)
    }
}
