use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::error::ErrorView;
use super::loading::LoadingView;
use super::session_provider::use_client_config;
use crate::api::{BookingApi, HttpBookingApi};
use crate::models::Service;

#[component]
pub fn ServicePicker(on_select: impl Fn(Service) + 'static + Copy + Send + Sync) -> impl IntoView {
    let config = use_client_config();
    let services = RwSignal::new(None::<Result<Vec<Service>, String>>);

    Effect::new(move |_| {
        let api = HttpBookingApi::new(&config);
        spawn_local(async move {
            match api.services().await {
                Ok(list) => services.set(Some(Ok(list))),
                Err(e) => {
                    leptos::logging::error!("Failed to fetch services: {}", e);
                    services.set(Some(Err(e.to_string())));
                }
            }
        });
    });

    view! {
        <div class="service-picker">
            <h2>"Choose a service"</h2>
            {move || match services.get() {
                None => view! {
                    <LoadingView message=Some("Loading services...".to_string())/>
                }.into_any(),
                Some(Err(_)) => view! {
                    <ErrorView message=Some("Could not load the services. Please try again later.".to_string())/>
                }.into_any(),
                Some(Ok(list)) if list.is_empty() => view! {
                    <p class="service-picker-empty">"No services are available right now."</p>
                }.into_any(),
                Some(Ok(list)) => view! {
                    <div class="service-grid">
                        {list.into_iter().map(|service| {
                            let chosen = service.clone();
                            view! {
                                <Card class="service-card">
                                    <div class="service-card-header">
                                        <span class="service-emoji">{service.emoji.clone().unwrap_or_default()}</span>
                                        <h3>{service.name.clone()}</h3>
                                    </div>
                                    <p class="service-description">{service.description.clone()}</p>
                                    {service.details.clone().map(|details| view! {
                                        <p class="service-details">{details}</p>
                                    })}
                                    <div class="service-meta">
                                        <span>{format!("{} min", service.duration_minutes)}</span>
                                        <span>{format!("{:.2} €", service.price)}</span>
                                    </div>
                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        on_click=move |_| on_select(chosen.clone())
                                    >
                                        "Book"
                                    </Button>
                                </Card>
                            }
                        }).collect::<Vec<_>>()}
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
