//! Access to the booking backend. Everything here speaks HTTP/JSON; the
//! rest of the crate only sees the [`BookingApi`] trait and validated
//! domain types.

pub mod endpoints;
pub mod http;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::CitaRequest;

use crate::booking::availability::MonthAvailability;
use crate::error::ApiError;
use crate::models::{Appointment, ClientSummary, CurrentUser, Role, Service, SlotTime};

pub use http::HttpBookingApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountStatus {
    pub suspended: bool,
}

/// Free start times for one day and one service duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAvailabilityParams {
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub role: Role,
}

/// Free-slot counts for every day of one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAvailabilityParams {
    pub year: i32,
    pub month: u32,
    pub duration_minutes: u32,
    pub role: Role,
}

// Futures are not `Send`: the browser runs them on the single UI thread.
#[async_trait(?Send)]
pub trait BookingApi {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;

    async fn account_status(&self, token: &str) -> Result<AccountStatus, ApiError>;

    async fn profile(&self, token: &str) -> Result<CurrentUser, ApiError>;

    async fn services(&self) -> Result<Vec<Service>, ApiError>;

    /// Customers an admin can book on behalf of.
    async fn clients(&self, token: &str) -> Result<Vec<ClientSummary>, ApiError>;

    async fn minimum_lead_hours(&self, token: Option<&str>) -> Result<u32, ApiError>;

    async fn day_availability(
        &self,
        params: &DayAvailabilityParams,
    ) -> Result<Vec<SlotTime>, ApiError>;

    async fn month_availability(
        &self,
        params: &MonthAvailabilityParams,
    ) -> Result<MonthAvailability, ApiError>;

    async fn create_booking(
        &self,
        token: Option<&str>,
        booking: &CitaRequest,
    ) -> Result<(), ApiError>;

    /// Every appointment, for the admin calendar.
    async fn appointments(&self, token: &str) -> Result<Vec<Appointment>, ApiError>;
}
