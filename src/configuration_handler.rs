use crate::configuration::Configuration;
use clap::Parser;

/// Runtime settings, taken from command line flags or the environment
/// (main loads a `.env` file before parsing).
#[derive(Debug, Clone, Parser)]
#[command(name = "appointment_scheduler")]
pub struct ConfigurationHandler {
    #[arg(long, env = "SCHEDULER_PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, env = "SLOT_DURATION_MINUTES", default_value_t = 15)]
    slot_duration_minutes: i64,

    #[arg(long, env = "LEAD_TIME_HOURS", default_value_t = 24)]
    lead_time_hours: i64,

    #[arg(long, env = "UNCONFIRMED_EXPIRY_MINUTES", default_value_t = 30)]
    unconfirmed_expiry_minutes: u64,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
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
