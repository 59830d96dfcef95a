use crate::{
    configuration::Configuration, configuration_handler::ConfigurationHandler, http::create_app,
    local_appointments::LocalAppointments,
};
use tracing_subscriber::EnvFilter;

mod appointment_manager;
mod configuration;
mod configuration_handler;
mod error;
mod expiry_scheduler;
mod http;
mod local_appointments;
mod slots;
mod store;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#########################");
    println!("# Appointment Scheduler #");
    println!("#########################");

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Listening at:\n{}", address.clone());
    let listener = tokio::net::TcpListener::bind(address).await.unwrap();

    let store = LocalAppointments::default();
    let app = create_app(store, configuration);
    axum::serve(listener, app).await.unwrap();
}
