pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> u16;
    /// Fixed length of every bookable slot.
    fn slot_duration_minutes(&self) -> i64;
    /// Minimum interval between now and a slot's start for a reservation
    /// to be accepted.
    fn lead_time_hours(&self) -> i64;
    /// How long a reservation may stay unconfirmed before it is released.
    fn unconfirmed_expiry_minutes(&self) -> u64;
}
