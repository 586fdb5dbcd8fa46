pub mod appointments;
pub mod auth;
pub mod client;
pub mod doctors;
pub mod patients;
pub mod prescriptions;

pub use client::ApiClient;
