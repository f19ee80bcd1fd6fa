//! `iptuapi` is an async HTTP client for the IPTU API: property tax records,
//! zoning, valuation and ITBI transfer tax for São Paulo, Belo Horizonte and
//! Recife.
//!
//! Every endpoint is a method on [`IptuClient`]. Transport failures are
//! retried with exponential backoff according to [`RetryPolicy`]; HTTP error
//! responses are returned as the matching [`IptuApiError`] variant.
//!
//! ```no_run
//! use iptuapi::{City, IptuClient};
//!
//! # async fn run() -> iptuapi::Result<()> {
//! let client = IptuClient::new("my-api-key");
//! let properties = client
//!     .property_by_address("Avenida Paulista", "1000", City::Sp)
//!     .await?;
//! println!("{} matches", properties.len());
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
mod endpoints;
mod error;
mod options;
mod rate_limit;
mod types;
mod wire;

pub use classify::classify_response;
pub use client::IptuClient;
pub use error::{ErrorKind, FieldErrors, IptuApiError};
pub use options::{Backoff, ClientOptions, InvalidOptions, RetryPolicy, DEFAULT_BASE_URL};
pub use rate_limit::RateLimitSnapshot;
pub use types::{
    City, Comparable, ComparablesQuery, ItbiCalculation, ItbiExemption, ItbiGuide,
    ItbiGuideRequest, ItbiGuideValidation, ItbiRates, ItbiSimulation, ItbiSimulationRequest,
    ItbiStatus, ItbiTransaction, Party, Property, Valuation, ValuationQuery, Zoning,
};

pub type Result<T> = std::result::Result<T, IptuApiError>;
