use leptos::prelude::*;
use thaw::*;

use crate::booking::WizardStep;
use crate::components::{
    use_client_config, use_session, AvailabilityCalendar, BookingConfirmation, BookingController,
    RoleGuard, ServicePicker,
};
use crate::models::{Role, Service};

#[component]
fn BookingSteps(controller: BookingController) -> impl IntoView {
    let state = controller.state;
    let step = move || state.with(|w| w.as_ref().map(|w| w.step()));
    let service_name = move || state.with(|w| w.as_ref().map(|w| w.service().name.clone()).unwrap_or_default());

    view! {
        <div class="booking-steps">
            <div class="booking-steps-header">
                <Button
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| controller.close()
                >
                    "← Services"
                </Button>
                <h2>{service_name}</h2>
            </div>
            {move || match step() {
                Some(WizardStep::Confirming) => view! {
                    <BookingConfirmation controller=controller/>
                }.into_any(),
                Some(WizardStep::Submitted) => view! {
                    <div class="booking-success">
                        <MessageBar intent=MessageBarIntent::Success>
                            "Your appointment has been booked!"
                        </MessageBar>
                    </div>
                }.into_any(),
                Some(_) => view! {
                    <AvailabilityCalendar controller=controller/>
                }.into_any(),
                None => view! {}.into_any(),
            }}
        </div>
    }
}

/// Service list first, then the calendar for the chosen service.
#[component]
pub fn BookingPage() -> impl IntoView {
    let session = use_session();
    let config = StoredValue::new(use_client_config());
    let controller = BookingController::new();
    let has_service = move || controller.state.with(Option::is_some);
    let booked = RwSignal::new(false);

    // back to the service list, with the confirmation on top
    controller.on_complete(Callback::new(move |_| {
        controller.close();
        booked.set(true);
    }));

    let on_select = move |service: Service| {
        booked.set(false);
        let role = session.role().unwrap_or(Role::Client);
        let token = session.token.get_untracked();
        config.with_value(|config| controller.start(service, role, token, config));
    };

    view! {
        <RoleGuard>
            <div class="booking-page">
                <Show
                    when=has_service
                    fallback=move || view! {
                        <Show when=move || booked.get()>
                            <div class="booking-complete">
                                <MessageBar intent=MessageBarIntent::Success>
                                    "Your appointment is booked. We look forward to seeing you!"
                                </MessageBar>
                            </div>
                        </Show>
                        <ServicePicker on_select=on_select/>
                    }
                >
                    <BookingSteps controller=controller/>
                </Show>
            </div>
        </RoleGuard>
    }
}
