use crate::{
    error::StoreError,
    types::{Appointment, AppointmentState},
};
use chrono::NaiveDate;
use uuid::Uuid;

/// Criteria for `find`/`delete`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub provider: Option<String>,
    pub day: Option<NaiveDate>,
    pub state: Option<AppointmentState>,
}

impl AppointmentFilter {
    pub fn provider_day(provider: &str, day: NaiveDate) -> Self {
        Self {
            provider: Some(provider.to_owned()),
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(provider) = &self.provider {
            if appointment.provider != *provider {
                return false;
            }
        }
        if let Some(day) = self.day {
            if appointment.time.date_naive() != day {
                return false;
            }
        }
        if let Some(state) = self.state {
            if appointment.state != state {
                return false;
            }
        }
        true
    }
}

/// Durable home of appointment records. The scheduling engine only talks
/// to this trait; what sits behind it is not its concern.
pub trait AppointmentStore: Clone + Send + Sync + 'static {
    fn find(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, StoreError>;
    fn find_one(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;
    /// Upsert by id. Ids are assigned when the appointment is created.
    fn save(&self, appointment: Appointment) -> Result<Appointment, StoreError>;
    /// Removes matching records, returning how many were deleted.
    fn delete(&self, filter: &AppointmentFilter) -> Result<usize, StoreError>;
}
