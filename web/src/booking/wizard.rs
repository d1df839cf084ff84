//! Booking wizard state machine.
//!
//! The wizard never performs I/O. Operations that need data return a query
//! value; the caller runs it against a [`crate::api::BookingApi`] and hands
//! the outcome back through the matching `apply_*` method. Each query is
//! tagged with a generation so a late response for an abandoned selection
//! is dropped instead of overwriting newer state.

use chrono::{NaiveDate, NaiveDateTime};
use shared_types::CitaRequest;

use super::availability::{percentage, AvailabilityLevel, MonthAvailability};
use super::calendar::MonthCursor;
use super::generation::QueryGeneration;
use super::slots;
use crate::api::{DayAvailabilityParams, MonthAvailabilityParams};
use crate::config::ClientConfig;
use crate::error::{ApiError, BookingError, SUBMIT_FAILED_MESSAGE};
use crate::models::{Role, Service, SlotTime, LOCAL_TIMESTAMP_FORMAT};

pub const DAY_SLOTS_FAILED_MESSAGE: &str = "Could not load the free times for this day.";
pub const MONTH_FAILED_MESSAGE: &str = "Could not load availability for this month.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthQuery {
    pub generation: u64,
    pub params: MonthAvailabilityParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayQuery {
    pub generation: u64,
    pub params: DayAvailabilityParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub generation: u64,
    pub body: CitaRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Empty,
    DayChosen,
    TimeChosen,
    Confirming,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Failed,
    /// The response belonged to an abandoned submission.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Selecting,
    Confirming,
    Submitted,
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub is_past: bool,
    pub is_today: bool,
    pub free_slots: Option<u32>,
    /// Share of the day's slots still free.
    pub free_percentage: u32,
    pub level: Option<AvailabilityLevel>,
    pub selectable: bool,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    service: Service,
    role: Role,
    slots_per_day: u32,
    lead_hours: u32,
    month: MonthCursor,
    month_availability: Option<MonthAvailability>,
    month_loading: bool,
    month_generation: QueryGeneration,
    selected_day: Option<NaiveDate>,
    day_slots: Option<Vec<SlotTime>>,
    day_loading: bool,
    day_generation: QueryGeneration,
    selected_time: Option<SlotTime>,
    comment: String,
    target_client: Option<i64>,
    phase: Phase,
    submitting: bool,
    submit_generation: QueryGeneration,
    error: Option<String>,
    notice: Option<String>,
}

impl BookingWizard {
    pub fn new(service: Service, role: Role, today: NaiveDate, config: &ClientConfig) -> Self {
        Self {
            service,
            role,
            slots_per_day: config.slots_per_day,
            lead_hours: config.default_lead_hours,
            month: MonthCursor::of(today),
            month_availability: None,
            month_loading: false,
            month_generation: QueryGeneration::default(),
            selected_day: None,
            day_slots: None,
            day_loading: false,
            day_generation: QueryGeneration::default(),
            selected_time: None,
            comment: String::new(),
            target_client: None,
            phase: Phase::Selecting,
            submitting: false,
            submit_generation: QueryGeneration::default(),
            error: None,
            notice: None,
        }
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn month(&self) -> MonthCursor {
        self.month
    }

    pub fn month_availability(&self) -> Option<&MonthAvailability> {
        self.month_availability.as_ref()
    }

    pub fn is_month_loading(&self) -> bool {
        self.month_loading
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    pub fn day_slots(&self) -> Option<&[SlotTime]> {
        self.day_slots.as_deref()
    }

    pub fn is_day_loading(&self) -> bool {
        self.day_loading
    }

    pub fn selected_time(&self) -> Option<SlotTime> {
        self.selected_time
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn target_client(&self) -> Option<i64> {
        self.target_client
    }

    pub fn lead_hours(&self) -> u32 {
        self.lead_hours
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Inline error for the confirmation step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Non-blocking message about a failed background load.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn step(&self) -> WizardStep {
        match self.phase {
            Phase::Submitted => WizardStep::Submitted,
            Phase::Confirming => WizardStep::Confirming,
            Phase::Selecting if self.selected_time.is_some() => WizardStep::TimeChosen,
            Phase::Selecting if self.selected_day.is_some() => WizardStep::DayChosen,
            Phase::Selecting => WizardStep::Empty,
        }
    }

    fn month_params(&self) -> MonthAvailabilityParams {
        MonthAvailabilityParams {
            year: self.month.year(),
            month: self.month.month(),
            duration_minutes: self.service.duration_minutes,
            role: self.role,
        }
    }

    fn clear_selection(&mut self) {
        self.selected_day = None;
        self.selected_time = None;
        self.day_slots = None;
        self.day_loading = false;
        self.day_generation.invalidate();
    }

    /// (Re)loads availability for the displayed month.
    pub fn refresh_month(&mut self) -> MonthQuery {
        self.month_loading = true;
        MonthQuery {
            generation: self.month_generation.issue(),
            params: self.month_params(),
        }
    }

    pub fn can_go_to_previous_month(&self, today: NaiveDate) -> bool {
        self.month > MonthCursor::of(today)
    }

    /// Moves the displayed month by `delta`. Months before the current one
    /// are refused. Changing month drops the day and time selection.
    pub fn select_month(&mut self, delta: i32, today: NaiveDate) -> Result<MonthQuery, BookingError> {
        let target = self.month.shift(delta);
        if target < MonthCursor::of(today) {
            return Err(BookingError::MonthBeforeCurrent);
        }
        self.month = target;
        self.month_availability = None;
        self.phase = Phase::Selecting;
        self.notice = None;
        self.clear_selection();
        Ok(self.refresh_month())
    }

    pub fn apply_month_availability(
        &mut self,
        query: &MonthQuery,
        result: Result<MonthAvailability, ApiError>,
    ) -> bool {
        if !self.month_generation.is_current(query.generation) || query.params != self.month_params() {
            tracing::debug!(month = %self.month, "discarding stale month availability");
            return false;
        }
        self.month_loading = false;
        match result {
            Ok(availability) => {
                self.month_availability = Some(availability);
            }
            Err(err) => {
                tracing::warn!(month = %self.month, "month availability failed: {err}");
                self.month_availability = None;
                self.notice = Some(MONTH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Failure keeps the configured default.
    pub fn set_lead_hours(&mut self, result: Result<u32, ApiError>) {
        match result {
            Ok(hours) => self.lead_hours = hours,
            Err(err) => {
                tracing::warn!(default = self.lead_hours, "minimum lead time unavailable: {err}");
            }
        }
    }

    /// Picks a day of the displayed month and asks for its free times.
    pub fn select_day(&mut self, day: u32, now: NaiveDateTime) -> Result<DayQuery, BookingError> {
        let date = self.month.date(day).ok_or(BookingError::DayOutOfRange)?;
        if date < now.date() {
            return Err(BookingError::DayInPast);
        }
        if !self.role.is_admin() {
            let free = self
                .month_availability
                .as_ref()
                .and_then(|availability| availability.free_slots(day))
                .unwrap_or(0);
            if free == 0 {
                return Err(BookingError::NoFreeSlots);
            }
        }

        self.phase = Phase::Selecting;
        self.selected_day = Some(date);
        self.selected_time = None;
        self.day_slots = None;
        self.day_loading = true;
        self.error = None;
        Ok(DayQuery {
            generation: self.day_generation.issue(),
            params: DayAvailabilityParams {
                date,
                duration_minutes: self.service.duration_minutes,
                role: self.role,
            },
        })
    }

    pub fn apply_day_slots(&mut self, query: &DayQuery, result: Result<Vec<SlotTime>, ApiError>) -> bool {
        if !self.day_generation.is_current(query.generation)
            || self.selected_day != Some(query.params.date)
        {
            tracing::debug!(date = %query.params.date, "discarding stale day availability");
            return false;
        }
        self.day_loading = false;
        match result {
            Ok(slots) => self.day_slots = Some(slots),
            Err(err) => {
                tracing::warn!(date = %query.params.date, "day availability failed: {err}");
                self.day_slots = Some(Vec::new());
                self.notice = Some(DAY_SLOTS_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Start times to offer for the selected day.
    pub fn visible_slots(&self, now: NaiveDateTime) -> Vec<SlotTime> {
        match (self.selected_day, self.day_slots.as_deref()) {
            (Some(date), Some(slots)) => {
                slots::presentable(slots, date, now, self.role, self.lead_hours)
            }
            _ => Vec::new(),
        }
    }

    pub fn select_time(&mut self, time: SlotTime, now: NaiveDateTime) -> Result<(), BookingError> {
        let date = self.selected_day.ok_or(BookingError::NoDaySelected)?;
        let offered = self.day_slots.as_ref().ok_or(BookingError::SlotsNotLoaded)?;
        if !offered.contains(&time) {
            return Err(BookingError::SlotNotOffered);
        }
        slots::check_start(time, date, now, self.role)?;

        self.phase = Phase::Selecting;
        self.selected_time = Some(time);
        self.error = None;
        Ok(())
    }

    pub fn advance_to_confirmation(&mut self) -> Result<(), BookingError> {
        if self.selected_day.is_none() || self.selected_time.is_none() {
            return Err(BookingError::IncompleteSelection);
        }
        self.phase = Phase::Confirming;
        self.error = None;
        Ok(())
    }

    /// Leaves the confirmation step keeping day and time.
    pub fn back_to_selection(&mut self) {
        if self.phase == Phase::Confirming && !self.submitting {
            self.phase = Phase::Selecting;
            self.error = None;
        }
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Customer an admin is booking for. Ignored for clients.
    pub fn set_target_client(&mut self, client_id: Option<i64>) {
        self.target_client = client_id;
        if client_id.is_some()
            && self.error.as_deref() == Some(BookingError::MissingClient.to_string().as_str())
        {
            self.error = None;
        }
    }

    /// Builds the booking request and marks the wizard as submitting.
    pub fn prepare_submission(&mut self) -> Result<SubmitRequest, BookingError> {
        if self.phase != Phase::Confirming {
            return Err(BookingError::NotConfirming);
        }
        if self.submitting {
            return Err(BookingError::SubmissionInFlight);
        }
        let (Some(date), Some(time)) = (self.selected_day, self.selected_time) else {
            return Err(BookingError::IncompleteSelection);
        };
        let cliente_id = if self.role.is_admin() {
            match self.target_client {
                Some(id) => Some(id),
                None => {
                    self.error = Some(BookingError::MissingClient.to_string());
                    return Err(BookingError::MissingClient);
                }
            }
        } else {
            None
        };

        let comment = self.comment.trim();
        let body = CitaRequest {
            servicio_id: self.service.id,
            fecha: date
                .and_time(time.to_naive_time())
                .format(LOCAL_TIMESTAMP_FORMAT)
                .to_string(),
            comentario: (!comment.is_empty()).then(|| comment.to_string()),
            cliente_id,
        };

        self.submitting = true;
        self.error = None;
        Ok(SubmitRequest {
            generation: self.submit_generation.issue(),
            body,
        })
    }

    pub fn apply_submission(
        &mut self,
        request: &SubmitRequest,
        result: Result<(), ApiError>,
    ) -> SubmitOutcome {
        if !self.submit_generation.is_current(request.generation) {
            tracing::debug!("discarding stale booking response");
            return SubmitOutcome::Discarded;
        }
        self.submitting = false;
        match result {
            Ok(()) => {
                tracing::info!(fecha = %request.body.fecha, service = self.service.id, "appointment booked");
                self.phase = Phase::Submitted;
                SubmitOutcome::Submitted
            }
            Err(err) => {
                tracing::warn!(fecha = %request.body.fecha, "booking failed: {err}");
                self.phase = Phase::Confirming;
                self.error = Some(SUBMIT_FAILED_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Starts over on the current month, e.g. after a successful booking.
    pub fn reset(&mut self, today: NaiveDate) -> MonthQuery {
        self.clear_selection();
        self.submit_generation.invalidate();
        self.submitting = false;
        self.comment.clear();
        self.target_client = None;
        self.phase = Phase::Selecting;
        self.error = None;
        self.notice = None;
        self.month = MonthCursor::of(today);
        self.month_availability = None;
        self.refresh_month()
    }

    /// Grid for the displayed month: `None` for the blanks before day 1
    /// in a Monday-first week, then one cell per day.
    pub fn month_grid(&self, now: NaiveDateTime) -> Vec<Option<DayCell>> {
        let today = now.date();
        let blanks = self.month.leading_blanks() as usize;
        let mut grid: Vec<Option<DayCell>> = vec![None; blanks];

        for day in 1..=self.month.days_in_month() {
            let Some(date) = self.month.date(day) else {
                continue;
            };
            let free_slots = self
                .month_availability
                .as_ref()
                .and_then(|availability| availability.free_slots(day));
            let free_percentage = free_slots
                .map(|free| percentage(free, self.slots_per_day))
                .unwrap_or(0);
            let is_past = date < today;
            grid.push(Some(DayCell {
                day,
                date,
                is_past,
                is_today: date == today,
                free_slots,
                free_percentage,
                level: free_slots.map(|_| AvailabilityLevel::from_percentage(free_percentage)),
                selectable: !is_past && (self.role.is_admin() || free_slots.unwrap_or(0) > 0),
                selected: self.selected_day == Some(date),
            }));
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn service() -> Service {
        Service {
            id: 3,
            name: "Corte".into(),
            description: "Corte clasico".into(),
            price: 12.5,
            duration_minutes: 30,
            emoji: None,
            details: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }

    fn slot(raw: &str) -> SlotTime {
        raw.parse().unwrap()
    }

    fn wizard(role: Role) -> BookingWizard {
        BookingWizard::new(service(), role, today(), &ClientConfig::default())
    }

    fn march(free: &[(u32, u32)]) -> MonthAvailability {
        MonthAvailability::new(
            MonthCursor::new(2025, 3).unwrap(),
            free.iter().copied().collect::<BTreeMap<_, _>>(),
        )
    }

    fn loaded(role: Role, free: &[(u32, u32)]) -> BookingWizard {
        let mut wizard = wizard(role);
        let query = wizard.refresh_month();
        assert!(wizard.apply_month_availability(&query, Ok(march(free))));
        wizard
    }

    fn with_day(role: Role, day: u32, slots: &[&str]) -> BookingWizard {
        let mut wizard = loaded(role, &[(day, 5)]);
        let query = wizard.select_day(day, at(today(), 10, 0)).unwrap();
        wizard.apply_day_slots(&query, Ok(slots.iter().map(|s| slot(s)).collect()));
        wizard
    }

    #[test]
    fn cannot_navigate_before_current_month() {
        let mut wizard = wizard(Role::Client);
        assert!(!wizard.can_go_to_previous_month(today()));
        assert_eq!(
            wizard.select_month(-1, today()),
            Err(BookingError::MonthBeforeCurrent)
        );
        assert_eq!(wizard.month(), MonthCursor::of(today()));

        let query = wizard.select_month(1, today()).unwrap();
        assert_eq!((query.params.year, query.params.month), (2025, 4));
        assert!(wizard.can_go_to_previous_month(today()));
        assert!(wizard.select_month(-1, today()).is_ok());
    }

    #[test]
    fn month_change_clears_selection() {
        let mut wizard = with_day(Role::Client, 12, &["09:00"]);
        wizard.select_time(slot("09:00"), at(today(), 10, 0)).unwrap();

        wizard.select_month(1, today()).unwrap();
        assert_eq!(wizard.selected_day(), None);
        assert_eq!(wizard.selected_time(), None);
        assert_eq!(wizard.step(), WizardStep::Empty);
    }

    #[test]
    fn client_cannot_pick_full_or_past_day() {
        let mut wizard = loaded(Role::Client, &[(9, 4), (11, 0), (12, 3)]);
        let now = at(today(), 10, 0);

        assert_eq!(wizard.select_day(9, now), Err(BookingError::DayInPast));
        assert_eq!(wizard.select_day(11, now), Err(BookingError::NoFreeSlots));
        assert_eq!(wizard.select_day(13, now), Err(BookingError::NoFreeSlots));
        assert_eq!(wizard.select_day(32, now), Err(BookingError::DayOutOfRange));
        assert_eq!(wizard.selected_day(), None);

        let query = wizard.select_day(12, now).unwrap();
        assert_eq!(query.params.date, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        assert_eq!(query.params.duration_minutes, 30);
        assert_eq!(wizard.step(), WizardStep::DayChosen);
        assert!(wizard.is_day_loading());
    }

    #[test]
    fn admin_can_pick_full_day() {
        let mut wizard = loaded(Role::Admin, &[(11, 0)]);
        assert!(wizard.select_day(11, at(today(), 10, 0)).is_ok());
    }

    #[test]
    fn stale_day_response_is_discarded() {
        let mut wizard = loaded(Role::Client, &[(12, 5), (13, 5)]);
        let now = at(today(), 10, 0);

        let first = wizard.select_day(12, now).unwrap();
        let second = wizard.select_day(13, now).unwrap();

        assert!(wizard.apply_day_slots(&second, Ok(vec![slot("16:00")])));
        assert!(!wizard.apply_day_slots(&first, Ok(vec![slot("09:00"), slot("09:30")])));

        assert_eq!(wizard.selected_day(), NaiveDate::from_ymd_opt(2025, 3, 13));
        assert_eq!(wizard.day_slots(), Some(&[slot("16:00")][..]));
    }

    #[test]
    fn stale_month_response_is_discarded() {
        let mut wizard = wizard(Role::Client);
        let march_query = wizard.refresh_month();
        let april_query = wizard.select_month(1, today()).unwrap();

        assert!(!wizard.apply_month_availability(&march_query, Ok(march(&[(12, 5)]))));
        assert!(wizard.month_availability().is_none());
        assert!(wizard.is_month_loading());

        let april = MonthAvailability::new(april_query.params_month(), BTreeMap::from([(2, 8)]));
        assert!(wizard.apply_month_availability(&april_query, Ok(april)));
        assert_eq!(wizard.month_availability().and_then(|m| m.free_slots(2)), Some(8));
    }

    #[test]
    fn day_failure_leaves_empty_list_and_notice() {
        let mut wizard = loaded(Role::Client, &[(12, 5)]);
        let query = wizard.select_day(12, at(today(), 10, 0)).unwrap();
        wizard.apply_day_slots(&query, Err(ApiError::Network("down".into())));
        assert_eq!(wizard.day_slots(), Some(&[][..]));
        assert_eq!(wizard.notice(), Some(DAY_SLOTS_FAILED_MESSAGE));
    }

    #[test]
    fn client_cannot_select_time_already_past_today() {
        let mut wizard = with_day(Role::Client, 10, &["09:00", "14:00"]);
        let now = at(today(), 10, 0);

        assert_eq!(
            wizard.select_time(slot("09:00"), now),
            Err(BookingError::SlotInPast)
        );
        assert_eq!(wizard.selected_time(), None);
        assert!(wizard.select_time(slot("14:00"), now).is_ok());
        assert_eq!(wizard.step(), WizardStep::TimeChosen);
    }

    #[test]
    fn admin_may_select_earlier_time_today() {
        let mut wizard = with_day(Role::Admin, 10, &["09:00", "14:00"]);
        assert!(wizard.select_time(slot("09:00"), at(today(), 10, 0)).is_ok());
    }

    #[test]
    fn only_offered_times_can_be_selected() {
        let mut wizard = with_day(Role::Client, 12, &["09:00"]);
        assert_eq!(
            wizard.select_time(slot("11:00"), at(today(), 10, 0)),
            Err(BookingError::SlotNotOffered)
        );

        let mut pending = loaded(Role::Client, &[(12, 5)]);
        pending.select_day(12, at(today(), 10, 0)).unwrap();
        assert_eq!(
            pending.select_time(slot("09:00"), at(today(), 10, 0)),
            Err(BookingError::SlotsNotLoaded)
        );
    }

    #[test]
    fn lead_time_narrows_visible_slots_for_clients() {
        let mut wizard = with_day(Role::Client, 11, &["09:00", "12:00"]);
        let now = at(today(), 10, 0);

        wizard.set_lead_hours(Ok(24));
        assert_eq!(wizard.visible_slots(now), vec![slot("12:00")]);

        wizard.set_lead_hours(Err(ApiError::Network("down".into())));
        assert_eq!(wizard.lead_hours(), 24);

        wizard.set_lead_hours(Ok(0));
        assert_eq!(wizard.visible_slots(now), vec![slot("09:00"), slot("12:00")]);
    }

    #[test]
    fn cannot_confirm_without_day_and_time() {
        let mut wizard = with_day(Role::Client, 12, &["09:00"]);
        assert_eq!(
            wizard.advance_to_confirmation(),
            Err(BookingError::IncompleteSelection)
        );
        assert_eq!(wizard.prepare_submission(), Err(BookingError::NotConfirming));
    }

    #[test]
    fn client_submission_uses_local_timestamp_and_trimmed_comment() {
        let mut wizard = with_day(Role::Client, 12, &["09:30"]);
        wizard.select_time(slot("09:30"), at(today(), 10, 0)).unwrap();
        wizard.advance_to_confirmation().unwrap();
        wizard.set_comment("  sin prisa  ");
        wizard.set_target_client(Some(99));

        let request = wizard.prepare_submission().unwrap();
        assert_eq!(request.body.servicio_id, 3);
        assert_eq!(request.body.fecha, "2025-03-12T09:30:00");
        assert_eq!(request.body.comentario.as_deref(), Some("sin prisa"));
        assert_eq!(request.body.cliente_id, None);
        assert!(wizard.is_submitting());
        assert_eq!(
            wizard.prepare_submission(),
            Err(BookingError::SubmissionInFlight)
        );
    }

    #[test]
    fn blank_comment_is_omitted() {
        let mut wizard = with_day(Role::Client, 12, &["09:30"]);
        wizard.select_time(slot("09:30"), at(today(), 10, 0)).unwrap();
        wizard.advance_to_confirmation().unwrap();
        wizard.set_comment("   ");
        let request = wizard.prepare_submission().unwrap();
        assert_eq!(request.body.comentario, None);
    }

    #[test]
    fn admin_must_choose_client_before_submitting() {
        let mut wizard = with_day(Role::Admin, 12, &["09:30"]);
        wizard.select_time(slot("09:30"), at(today(), 10, 0)).unwrap();
        wizard.advance_to_confirmation().unwrap();

        assert_eq!(wizard.prepare_submission(), Err(BookingError::MissingClient));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.step(), WizardStep::Confirming);
        assert!(wizard.error().is_some());

        wizard.set_target_client(Some(41));
        assert_eq!(wizard.error(), None);
        let request = wizard.prepare_submission().unwrap();
        assert_eq!(request.body.cliente_id, Some(41));
    }

    #[test]
    fn failed_submission_returns_to_confirmation() {
        let mut wizard = with_day(Role::Client, 12, &["09:30"]);
        wizard.select_time(slot("09:30"), at(today(), 10, 0)).unwrap();
        wizard.advance_to_confirmation().unwrap();
        let request = wizard.prepare_submission().unwrap();

        let outcome = wizard.apply_submission(
            &request,
            Err(ApiError::Status {
                status: 409,
                message: "taken".into(),
            }),
        );
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(wizard.step(), WizardStep::Confirming);
        assert_eq!(wizard.error(), Some(SUBMIT_FAILED_MESSAGE));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.selected_time(), Some(slot("09:30")));
    }

    #[test]
    fn successful_submission_then_reset() {
        let mut wizard = with_day(Role::Client, 12, &["09:30"]);
        wizard.select_time(slot("09:30"), at(today(), 10, 0)).unwrap();
        wizard.advance_to_confirmation().unwrap();
        wizard.set_comment("hola");
        let request = wizard.prepare_submission().unwrap();

        assert_eq!(wizard.apply_submission(&request, Ok(())), SubmitOutcome::Submitted);
        assert_eq!(wizard.step(), WizardStep::Submitted);

        let query = wizard.reset(today());
        assert_eq!(wizard.step(), WizardStep::Empty);
        assert_eq!(wizard.comment(), "");
        assert_eq!((query.params.year, query.params.month), (2025, 3));
        assert_eq!(
            wizard.apply_submission(&request, Ok(())),
            SubmitOutcome::Discarded
        );
    }

    #[test]
    fn back_keeps_selection() {
        let mut wizard = with_day(Role::Client, 12, &["09:30"]);
        wizard.select_time(slot("09:30"), at(today(), 10, 0)).unwrap();
        wizard.advance_to_confirmation().unwrap();
        wizard.back_to_selection();
        assert_eq!(wizard.step(), WizardStep::TimeChosen);
    }

    #[test]
    fn grid_starts_on_monday_and_marks_days() {
        // 1 March 2025 is a Saturday: five blanks
        let wizard = loaded(Role::Client, &[(10, 8), (11, 0), (12, 4)]);
        let grid = wizard.month_grid(at(today(), 10, 0));

        assert_eq!(grid.iter().take_while(|cell| cell.is_none()).count(), 5);
        assert_eq!(grid.len(), 5 + 31);

        let cell = |day: u32| grid[4 + day as usize].unwrap();
        assert!(cell(9).is_past && !cell(9).selectable);
        assert!(cell(10).is_today && cell(10).selectable);
        assert_eq!(cell(10).free_percentage, 80);
        assert_eq!(cell(10).level, Some(AvailabilityLevel::High));
        assert!(!cell(11).selectable);
        assert_eq!(cell(12).level, Some(AvailabilityLevel::Medium));
        assert_eq!(cell(13).level, None);
    }

    impl MonthQuery {
        fn params_month(&self) -> MonthCursor {
            MonthCursor::new(self.params.year, self.params.month).unwrap()
        }
    }
}
