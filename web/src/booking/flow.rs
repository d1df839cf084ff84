use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime};

use super::wizard::{BookingWizard, SubmitOutcome};
use crate::api::BookingApi;
use crate::error::BookingError;
use crate::models::SlotTime;

type Listener = Box<dyn Fn(&BookingWizard)>;

/// Runs the queries a [`BookingWizard`] asks for against a backend.
///
/// Methods take `&self` so several of them may be in flight at once on
/// the UI thread; the wizard's generations decide which responses land.
/// No borrow of the wizard is held across an await.
pub struct BookingFlow<A> {
    api: A,
    token: RefCell<Option<String>>,
    wizard: RefCell<BookingWizard>,
    listeners: RefCell<Vec<Listener>>,
}

impl<A: BookingApi> BookingFlow<A> {
    pub fn new(api: A, wizard: BookingWizard, token: Option<String>) -> Self {
        Self {
            api,
            token: RefCell::new(token),
            wizard: RefCell::new(wizard),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Called with the new wizard state after every change.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&BookingWizard) + 'static,
    {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn snapshot(&self) -> BookingWizard {
        self.wizard.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the bearer token used from the next request on, e.g.
    /// after the session was renewed or ended.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    fn notify(&self) {
        let wizard = self.wizard.borrow();
        for listener in self.listeners.borrow().iter() {
            listener(&wizard);
        }
    }

    fn update<T>(&self, f: impl FnOnce(&mut BookingWizard) -> T) -> T {
        let out = f(&mut self.wizard.borrow_mut());
        self.notify();
        out
    }

    /// Fetches the minimum lead time and the displayed month.
    pub async fn start(&self) {
        let token = self.token.borrow().clone();
        let lead = self.api.minimum_lead_hours(token.as_deref()).await;
        self.update(|wizard| wizard.set_lead_hours(lead));
        self.load_month().await;
    }

    pub async fn load_month(&self) {
        let query = self.update(|wizard| wizard.refresh_month());
        tracing::debug!(generation = query.generation, "month availability requested");
        let result = self.api.month_availability(&query.params).await;
        if self.wizard.borrow_mut().apply_month_availability(&query, result) {
            self.notify();
        }
    }

    pub async fn select_month(&self, delta: i32, today: NaiveDate) -> Result<(), BookingError> {
        let query = self.update(|wizard| wizard.select_month(delta, today))?;
        tracing::debug!(
            generation = query.generation,
            year = query.params.year,
            month = query.params.month,
            "month availability requested"
        );
        let result = self.api.month_availability(&query.params).await;
        if self.wizard.borrow_mut().apply_month_availability(&query, result) {
            self.notify();
        }
        Ok(())
    }

    pub async fn select_day(&self, day: u32, now: NaiveDateTime) -> Result<(), BookingError> {
        let query = self.wizard.borrow_mut().select_day(day, now)?;
        self.notify();
        tracing::debug!(generation = query.generation, date = %query.params.date, "day slots requested");
        let result = self.api.day_availability(&query.params).await;
        if self.wizard.borrow_mut().apply_day_slots(&query, result) {
            self.notify();
        }
        Ok(())
    }

    pub fn select_time(&self, time: SlotTime, now: NaiveDateTime) -> Result<(), BookingError> {
        let result = self.wizard.borrow_mut().select_time(time, now);
        self.notify();
        result
    }

    pub fn advance_to_confirmation(&self) -> Result<(), BookingError> {
        self.update(|wizard| wizard.advance_to_confirmation())
    }

    pub fn back_to_selection(&self) {
        self.update(|wizard| wizard.back_to_selection());
    }

    pub fn set_comment(&self, comment: String) {
        self.update(|wizard| wizard.set_comment(comment));
    }

    pub fn set_target_client(&self, client_id: Option<i64>) {
        self.update(|wizard| wizard.set_target_client(client_id));
    }

    /// Sends the booking. Local refusals, such as an admin without a
    /// target client, return before any request is made.
    pub async fn submit(&self) -> Result<SubmitOutcome, BookingError> {
        let prepared = self.wizard.borrow_mut().prepare_submission();
        self.notify();
        let request = prepared?;
        let token = self.token.borrow().clone();
        let result = self.api.create_booking(token.as_deref(), &request.body).await;
        Ok(self.update(|wizard| wizard.apply_submission(&request, result)))
    }

    /// Clears the finished booking and reloads the current month.
    pub async fn restart(&self, today: NaiveDate) {
        let query = self.update(|wizard| wizard.reset(today));
        let result = self.api.month_availability(&query.params).await;
        if self.wizard.borrow_mut().apply_month_availability(&query, result) {
            self.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use super::*;
    use crate::api::mock::MockApi;
    use crate::booking::availability::MonthAvailability;
    use crate::booking::calendar::MonthCursor;
    use crate::booking::wizard::WizardStep;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::models::{Role, Service};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(10, 0, 0).unwrap()
    }

    fn slot(raw: &str) -> SlotTime {
        raw.parse().unwrap()
    }

    fn flow(role: Role, api: MockApi) -> BookingFlow<MockApi> {
        let service = Service {
            id: 7,
            name: "Barba".into(),
            description: String::new(),
            price: 8.0,
            duration_minutes: 20,
            emoji: None,
            details: None,
        };
        let wizard = BookingWizard::new(service, role, today(), &ClientConfig::default());
        BookingFlow::new(api, wizard, Some("token".into()))
    }

    fn api_with_march(free: &[(u32, u32)]) -> MockApi {
        let api = MockApi::default();
        *api.month.borrow_mut() = Some(MonthAvailability::new(
            MonthCursor::new(2025, 3).unwrap(),
            free.iter().copied().collect::<BTreeMap<_, _>>(),
        ));
        api
    }

    #[tokio::test]
    async fn start_loads_month_and_falls_back_to_default_lead() {
        let flow = flow(Role::Client, api_with_march(&[(12, 4)]));
        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        flow.subscribe(move |_| counter.set(counter.get() + 1));

        flow.start().await;

        let wizard = flow.snapshot();
        assert_eq!(wizard.lead_hours(), 24);
        assert_eq!(wizard.month_availability().and_then(|m| m.free_slots(12)), Some(4));
        assert!(!wizard.is_month_loading());
        assert!(notified.get() >= 2);
    }

    #[tokio::test]
    async fn client_cannot_open_full_day() {
        let flow = flow(Role::Client, api_with_march(&[(12, 0)]));
        flow.start().await;

        assert_eq!(flow.select_day(12, now()).await, Err(BookingError::NoFreeSlots));
        assert_eq!(flow.api().call_count("day_availability"), 0);
    }

    #[tokio::test]
    async fn admin_opens_full_day() {
        let api = api_with_march(&[(12, 0)]);
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        api.day_slots.borrow_mut().insert(date, vec![slot("09:00")]);
        let flow = flow(Role::Admin, api);
        flow.start().await;

        flow.select_day(12, now()).await.unwrap();
        assert_eq!(flow.snapshot().day_slots(), Some(&[slot("09:00")][..]));
    }

    #[tokio::test]
    async fn admin_without_client_makes_no_request() {
        let api = api_with_march(&[(12, 3)]);
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        api.day_slots.borrow_mut().insert(date, vec![slot("09:00")]);
        let flow = flow(Role::Admin, api);
        flow.start().await;
        flow.select_day(12, now()).await.unwrap();
        flow.select_time(slot("09:00"), now()).unwrap();
        flow.advance_to_confirmation().unwrap();

        assert_eq!(flow.submit().await, Err(BookingError::MissingClient));
        assert_eq!(flow.api().call_count("create_booking"), 0);
        assert_eq!(flow.snapshot().step(), WizardStep::Confirming);

        flow.set_target_client(Some(5));
        assert_eq!(flow.submit().await, Ok(SubmitOutcome::Submitted));
        assert_eq!(flow.api().bookings.borrow()[0].cliente_id, Some(5));
    }

    #[tokio::test]
    async fn failed_booking_stays_on_confirmation() {
        let api = api_with_march(&[(12, 3)]);
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        api.day_slots.borrow_mut().insert(date, vec![slot("11:00")]);
        *api.booking_result.borrow_mut() = Some(Err(ApiError::Status {
            status: 500,
            message: "boom".into(),
        }));
        let flow = flow(Role::Client, api);
        flow.start().await;
        flow.select_day(12, now()).await.unwrap();
        flow.select_time(slot("11:00"), now()).unwrap();
        flow.advance_to_confirmation().unwrap();

        assert_eq!(flow.submit().await, Ok(SubmitOutcome::Failed));
        let wizard = flow.snapshot();
        assert_eq!(wizard.step(), WizardStep::Confirming);
        assert!(wizard.error().is_some());
    }

    #[tokio::test]
    async fn submit_uses_the_latest_token() {
        let api = api_with_march(&[(12, 3)]);
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        api.day_slots.borrow_mut().insert(date, vec![slot("11:00")]);
        *api.booking_result.borrow_mut() = Some(Err(ApiError::Unauthorized));
        let flow = flow(Role::Client, api);
        flow.start().await;
        flow.select_day(12, now()).await.unwrap();
        flow.select_time(slot("11:00"), now()).unwrap();
        flow.advance_to_confirmation().unwrap();

        // logged out while confirming, then logged back in
        flow.set_token(None);
        assert_eq!(flow.submit().await, Ok(SubmitOutcome::Failed));
        flow.set_token(Some("renewed".into()));
        assert_eq!(flow.submit().await, Ok(SubmitOutcome::Failed));

        assert_eq!(
            *flow.api().booking_tokens.borrow(),
            vec![None, Some("renewed".to_string())]
        );
    }

    #[tokio::test]
    async fn restart_after_success_reloads_month() {
        let api = api_with_march(&[(12, 3)]);
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        api.day_slots.borrow_mut().insert(date, vec![slot("11:00")]);
        let flow = flow(Role::Client, api);
        flow.start().await;
        flow.select_day(12, now()).await.unwrap();
        flow.select_time(slot("11:00"), now()).unwrap();
        flow.advance_to_confirmation().unwrap();
        flow.submit().await.unwrap();

        flow.restart(today()).await;
        assert_eq!(flow.snapshot().step(), WizardStep::Empty);
        assert_eq!(flow.api().call_count("month_availability"), 2);
    }
}
