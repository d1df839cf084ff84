use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::CitaRequest;

use super::{AccountStatus, BookingApi, DayAvailabilityParams, MonthAvailabilityParams};
use crate::booking::availability::MonthAvailability;
use crate::error::ApiError;
use crate::models::{Appointment, ClientSummary, CurrentUser, Service, SlotTime};

/// Scripted backend for tests. Every call is recorded by name.
#[derive(Default)]
pub struct MockApi {
    pub calls: RefCell<Vec<String>>,
    pub login_result: RefCell<Option<Result<String, ApiError>>>,
    pub status: RefCell<Option<Result<AccountStatus, ApiError>>>,
    pub profile: RefCell<Option<Result<CurrentUser, ApiError>>>,
    pub lead_hours: RefCell<Option<Result<u32, ApiError>>>,
    pub day_slots: RefCell<HashMap<NaiveDate, Vec<SlotTime>>>,
    pub month: RefCell<Option<MonthAvailability>>,
    pub booking_result: RefCell<Option<Result<(), ApiError>>>,
    pub bookings: RefCell<Vec<CitaRequest>>,
    pub booking_tokens: RefCell<Vec<Option<String>>>,
}

impl MockApi {
    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }
}

#[async_trait(?Send)]
impl BookingApi for MockApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<String, ApiError> {
        self.record("login");
        self.login_result
            .borrow()
            .clone()
            .unwrap_or(Err(ApiError::Rejected("no login scripted".into())))
    }

    async fn account_status(&self, _token: &str) -> Result<AccountStatus, ApiError> {
        self.record("account_status");
        self.status
            .borrow()
            .clone()
            .unwrap_or(Ok(AccountStatus { suspended: false }))
    }

    async fn profile(&self, _token: &str) -> Result<CurrentUser, ApiError> {
        self.record("profile");
        // gives concurrently polled futures a chance to run first
        tokio::task::yield_now().await;
        self.profile
            .borrow()
            .clone()
            .unwrap_or(Err(ApiError::Unauthorized))
    }

    async fn services(&self) -> Result<Vec<Service>, ApiError> {
        self.record("services");
        Ok(Vec::new())
    }

    async fn clients(&self, _token: &str) -> Result<Vec<ClientSummary>, ApiError> {
        self.record("clients");
        Ok(Vec::new())
    }

    async fn minimum_lead_hours(&self, _token: Option<&str>) -> Result<u32, ApiError> {
        self.record("minimum_lead_hours");
        self.lead_hours
            .borrow()
            .clone()
            .unwrap_or(Err(ApiError::Network("offline".into())))
    }

    async fn day_availability(
        &self,
        params: &DayAvailabilityParams,
    ) -> Result<Vec<SlotTime>, ApiError> {
        self.record("day_availability");
        Ok(self
            .day_slots
            .borrow()
            .get(&params.date)
            .cloned()
            .unwrap_or_default())
    }

    async fn month_availability(
        &self,
        _params: &MonthAvailabilityParams,
    ) -> Result<MonthAvailability, ApiError> {
        self.record("month_availability");
        self.month
            .borrow()
            .clone()
            .ok_or_else(|| ApiError::Network("offline".into()))
    }

    async fn create_booking(
        &self,
        token: Option<&str>,
        booking: &CitaRequest,
    ) -> Result<(), ApiError> {
        self.record("create_booking");
        self.booking_tokens.borrow_mut().push(token.map(str::to_string));
        self.bookings.borrow_mut().push(booking.clone());
        self.booking_result.borrow().clone().unwrap_or(Ok(()))
    }

    async fn appointments(&self, _token: &str) -> Result<Vec<Appointment>, ApiError> {
        self.record("appointments");
        Ok(Vec::new())
    }
}
