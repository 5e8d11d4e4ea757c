//! Record-keeping backend for KPA form submissions: bogie checksheets are
//! created through `POST /api/forms/bogie-checksheet`, wheel specifications
//! are queried through `GET /api/forms/wheel-specifications`.
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod response;
pub mod seed;
pub mod server;
pub mod state;
pub mod validation;

pub use config::Config;
pub use database::{FormStore, StoreError};
pub use server::{build_router, run};
pub use state::AppState;
