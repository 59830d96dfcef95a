use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a single appointment slot. An unconfirmed
/// reservation falls back to `Available` when its expiry timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentState {
    Available,
    Reserved,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub provider: String,
    pub time: DateTime<Utc>,
    pub state: AppointmentState,
    /// Present exactly when the appointment is reserved or confirmed.
    pub client: Option<String>,
}

impl Appointment {
    pub fn available(provider: &str, time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.to_owned(),
            time,
            state: AppointmentState::Available,
            client: None,
        }
    }

    pub fn summary(&self) -> AppointmentSummary {
        AppointmentSummary {
            id: self.id,
            provider: self.provider.clone(),
            time: self.time,
            state: self.state,
        }
    }
}

/// Listing projection without the client assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub id: Uuid,
    pub provider: String,
    pub time: DateTime<Utc>,
    pub state: AppointmentState,
}

/// Time-of-day offset on an availability day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn minutes_from_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

/// One provider's working hours for one day. Consumed by the slot
/// generator and discarded, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}
