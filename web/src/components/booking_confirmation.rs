use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::booking_controller::BookingController;
use super::session_provider::{use_client_config, use_session};
use crate::api::{BookingApi, HttpBookingApi};
use crate::models::ClientSummary;

#[component]
fn ClientSelect(controller: BookingController) -> impl IntoView {
    let session = use_session();
    let config = use_client_config();
    let clients = RwSignal::new(Vec::<ClientSummary>::new());
    let load_error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let Some(token) = session.token.get() else {
            return;
        };
        let api = HttpBookingApi::new(&config);
        spawn_local(async move {
            match api.clients(&token).await {
                Ok(list) => clients.set(list),
                Err(e) => {
                    leptos::logging::error!("Failed to fetch clients: {}", e);
                    load_error.set(Some("Could not load the client list.".to_string()));
                }
            }
        });
    });

    let selected = move || {
        controller
            .state
            .with(|w| w.as_ref().and_then(|w| w.target_client()))
            .map(|id| id.to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="booking-form-group">
            <label for="booking-client">"Client"</label>
            <select
                id="booking-client"
                prop:value=selected
                on:change=move |ev| {
                    let client_id = event_target_value(&ev).parse::<i64>().ok();
                    controller.set_target_client(client_id);
                }
            >
                <option value="">"Select a client"</option>
                {move || clients.get().into_iter().map(|client| view! {
                    <option value=client.id.to_string()>{client.label()}</option>
                }).collect::<Vec<_>>()}
            </select>
            {move || load_error.get().map(|message| view! {
                <p class="booking-form-error">{message}</p>
            })}
        </div>
    }
}

/// Summary of the chosen service, day and time with the optional comment.
/// Admins also pick which client the appointment is for.
#[component]
pub fn BookingConfirmation(controller: BookingController) -> impl IntoView {
    let session = use_session();
    let state = controller.state;
    let comment = RwSignal::new(
        state.with_untracked(|w| w.as_ref().map(|w| w.comment().to_string()).unwrap_or_default()),
    );

    Effect::new(move |_| {
        controller.set_comment(comment.get());
    });

    let submitting = Signal::derive(move || state.with(|w| w.as_ref().is_some_and(|w| w.is_submitting())));

    let summary = move || {
        state.with(|w| {
            w.as_ref().map(|w| {
                let service = w.service();
                let date = w
                    .selected_day()
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default();
                let time = w.selected_time().map(|t| t.to_string()).unwrap_or_default();
                view! {
                    <dl class="booking-summary">
                        <dt>"Service"</dt>
                        <dd>{format!("{} {}", service.emoji.clone().unwrap_or_default(), service.name)}</dd>
                        <dt>"Duration"</dt>
                        <dd>{format!("{} min", service.duration_minutes)}</dd>
                        <dt>"Price"</dt>
                        <dd>{format!("{:.2} €", service.price)}</dd>
                        <dt>"Date"</dt>
                        <dd>{date}</dd>
                        <dt>"Time"</dt>
                        <dd>{time}</dd>
                    </dl>
                }
            })
        })
    };

    view! {
        <div class="booking-confirmation">
            <h3>"Confirm your appointment"</h3>
            {summary}

            <Show when=move || session.is_admin()>
                <ClientSelect controller=controller/>
            </Show>

            <div class="booking-form-group">
                <label for="booking-comment">"Comment (optional)"</label>
                <Textarea
                    id="booking-comment"
                    placeholder="Anything we should know?"
                    value=comment
                />
            </div>

            {move || state.with(|w| w.as_ref().and_then(|w| w.error().map(str::to_string))).map(|message| view! {
                <MessageBar intent=MessageBarIntent::Error>{message}</MessageBar>
            })}

            <div class="booking-confirmation-actions">
                <Button
                    appearance=ButtonAppearance::Secondary
                    disabled=submitting
                    on_click=move |_| controller.back_to_selection()
                >
                    "Back"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    loading=submitting
                    disabled=submitting
                    on_click=move |_| controller.submit(session.token.get_untracked())
                >
                    "Confirm booking"
                </Button>
            </div>
        </div>
    }
}
