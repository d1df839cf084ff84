use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{BookingApi, HttpBookingApi};
use crate::booking::{BookingFlow, BookingWizard, SubmitOutcome};
use crate::config::ClientConfig;
use crate::error::BookingError;
use crate::models::{Role, Service, SlotTime};
use crate::session::local_now;

type Flow = Rc<BookingFlow<HttpBookingApi>>;

/// Seconds the success message stays up before the parent is told.
#[cfg(feature = "hydrate")]
const SUCCESS_DISPLAY_SECS: u64 = 3;

/// Handle the booking components share. The wizard state is mirrored into
/// `state`; the flow driving it lives on the UI thread only.
///
/// Every flow is attached under a fresh epoch. Closing or starting over
/// moves the epoch on, so whatever an abandoned flow still has in flight
/// never reaches `state`.
#[derive(Clone, Copy)]
pub struct BookingController {
    pub state: RwSignal<Option<BookingWizard>>,
    /// Last local refusal, e.g. picking a full day.
    pub refusal: RwSignal<Option<String>>,
    flow: StoredValue<Option<Flow>, LocalStorage>,
    epoch: StoredValue<u64>,
    on_complete: StoredValue<Option<Callback<()>>>,
}

impl BookingController {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(None),
            refusal: RwSignal::new(None),
            flow: StoredValue::new_local(None),
            epoch: StoredValue::new(0),
            on_complete: StoredValue::new(None),
        }
    }

    /// Run once a booking went through and its success message was shown.
    pub fn on_complete(&self, callback: Callback<()>) {
        self.on_complete.set_value(Some(callback));
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.try_get_value() == Some(epoch)
    }

    fn next_epoch(&self) -> u64 {
        self.epoch
            .try_update_value(|epoch| {
                *epoch += 1;
                *epoch
            })
            .unwrap_or_default()
    }

    /// Mirrors `flow` into `state` until another flow is attached or the
    /// calendar is closed.
    fn attach<A: BookingApi>(&self, flow: &BookingFlow<A>) -> u64 {
        let epoch = self.next_epoch();
        let this = *self;
        flow.subscribe(move |wizard| {
            if this.is_current(epoch) {
                this.state.try_set(Some(wizard.clone()));
            }
        });
        self.state.set(Some(flow.snapshot()));
        self.refusal.set(None);
        epoch
    }

    /// Opens the calendar for `service` and loads lead time and month.
    pub fn start(&self, service: Service, role: Role, token: Option<String>, config: &ClientConfig) {
        let today = local_now().date();
        let wizard = BookingWizard::new(service, role, today, config);
        let flow = Rc::new(BookingFlow::new(HttpBookingApi::new(config), wizard, token));

        self.attach(&flow);
        self.flow.set_value(Some(flow.clone()));

        spawn_local(async move { flow.start().await });
    }

    /// Back to the service list.
    pub fn close(&self) {
        self.next_epoch();
        self.flow.try_set_value(None);
        self.state.try_set(None);
        self.refusal.try_set(None);
    }

    fn flow(&self) -> Option<Flow> {
        self.flow.try_get_value().flatten()
    }

    fn report(&self, result: Result<(), BookingError>) {
        match result {
            Ok(()) => self.refusal.try_set(None),
            Err(e) => self.refusal.try_set(Some(e.to_string())),
        };
    }

    pub fn select_month(&self, delta: i32) {
        let Some(flow) = self.flow() else { return };
        let this = *self;
        spawn_local(async move {
            let result = flow.select_month(delta, local_now().date()).await;
            this.report(result);
        });
    }

    pub fn select_day(&self, day: u32) {
        let Some(flow) = self.flow() else { return };
        let this = *self;
        spawn_local(async move {
            let result = flow.select_day(day, local_now()).await;
            this.report(result);
        });
    }

    pub fn select_time(&self, time: SlotTime) {
        if let Some(flow) = self.flow() {
            self.report(flow.select_time(time, local_now()));
        }
    }

    pub fn advance_to_confirmation(&self) {
        if let Some(flow) = self.flow() {
            self.report(flow.advance_to_confirmation());
        }
    }

    pub fn back_to_selection(&self) {
        if let Some(flow) = self.flow() {
            flow.back_to_selection();
        }
    }

    pub fn set_comment(&self, comment: String) {
        if let Some(flow) = self.flow() {
            flow.set_comment(comment);
        }
    }

    pub fn set_target_client(&self, client_id: Option<i64>) {
        if let Some(flow) = self.flow() {
            flow.set_target_client(client_id);
        }
    }

    /// Sends the booking with the session's current token.
    pub fn submit(&self, token: Option<String>) {
        let Some(flow) = self.flow() else { return };
        let Some(epoch) = self.epoch.try_get_value() else { return };
        flow.set_token(token);
        let this = *self;
        spawn_local(async move {
            let outcome = flow.submit().await;
            if this.settle(outcome, epoch) {
                this.complete_later(flow, epoch);
            }
        });
    }

    /// Records a submission outcome. True when the booking went through on
    /// the flow still on screen.
    fn settle(&self, outcome: Result<SubmitOutcome, BookingError>, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        match outcome {
            Ok(SubmitOutcome::Submitted) => {
                self.refusal.try_set(None);
                true
            }
            Ok(_) => false,
            // the wizard already shows the inline message
            Err(BookingError::MissingClient) => false,
            Err(e) => {
                self.refusal.try_set(Some(e.to_string()));
                false
            }
        }
    }

    /// Hands the finished booking to the parent. True when the calendar is
    /// still open afterwards and should start over.
    fn finish(&self, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        if let Some(callback) = self.on_complete.try_get_value().flatten() {
            callback.run(());
        }
        self.is_current(epoch)
    }

    fn complete_later(self, flow: Flow, epoch: u64) {
        let complete = move || {
            if self.finish(epoch) {
                spawn_local(async move { flow.restart(local_now().date()).await });
            }
        };

        #[cfg(feature = "hydrate")]
        set_timeout(complete, std::time::Duration::from_secs(SUCCESS_DISPLAY_SECS));

        #[cfg(not(feature = "hydrate"))]
        complete();
    }
}

impl Default for BookingController {
    fn default() -> Self {
        Self::new()
    }
}
