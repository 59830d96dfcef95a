use thiserror::Error;
use uuid::Uuid;

/// Failure reported by an [`AppointmentStore`](crate::store::AppointmentStore)
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("appointment store unavailable: {0}")]
    Unavailable(String),
}

/// Everything a scheduling operation can fail with. Each variant maps to
/// one status code in the HTTP adapter; the engine itself never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    #[error("appointment {0} not found, please confirm the appointment id and try again")]
    NotFound(Uuid),

    #[error("appointment {0} is already scheduled for another client, please choose a new time")]
    AlreadyScheduled(Uuid),

    #[error("appointments already exist for provider {0}, request an overwrite to replace them")]
    AvailabilityExists(String),

    #[error("provider must submit enough availability for at least one appointment")]
    InsufficientAvailability,

    #[error(
        "appointments must be reserved {required_hours} hours in advance, \
         difference: {actual_hours:.2} hours"
    )]
    LeadTimeViolation { required_hours: i64, actual_hours: f64 },

    #[error("appointment {0} is currently available, please reserve it before attempting to confirm")]
    NotReserved(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
