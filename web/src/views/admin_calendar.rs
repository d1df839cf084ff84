use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::api::{BookingApi, HttpBookingApi};
use crate::booking::calendar::{MonthCursor, WEEKDAY_HEADERS};
use crate::booking::occupancy::{day_occupancy, month_occupancy, MonthOccupancy};
use crate::components::error::ErrorView;
use crate::components::loading::LoadingView;
use crate::components::{use_client_config, use_session, RoleGuard};
use crate::models::{Appointment, Role};
use crate::session::local_now;

#[component]
fn OccupancyGrid(
    occupancy: Memo<MonthOccupancy>,
    selected_date: RwSignal<Option<NaiveDate>>,
) -> impl IntoView {
    view! {
        <div class="calendar-grid">
            <div class="weekday-headers">
                {WEEKDAY_HEADERS.iter().map(|name| view! {
                    <div class="weekday-header">{*name}</div>
                }).collect::<Vec<_>>()}
            </div>
            <div class="calendar-days">
                {move || {
                    let month = occupancy.get();
                    let blanks = (0..month.month.leading_blanks()).map(|_| view! {
                        <div class="calendar-day empty"></div>
                    }.into_any());
                    let days = month.days.iter().map(|(day, occ)| {
                        let date = month.month.date(*day);
                        let occ = *occ;
                        view! {
                            <button
                                class=format!("calendar-day {}", occ.level().css_class())
                                class:selected=move || selected_date.get().is_some() && selected_date.get() == date
                                title=occ.level().label()
                                on:click=move |_| selected_date.set(date)
                            >
                                <span class="calendar-day-number">{*day}</span>
                                <span class="calendar-day-occupancy">
                                    {format!("{}/{} ({}%)", occ.occupied, occ.total, occ.percentage)}
                                </span>
                            </button>
                        }.into_any()
                    });
                    blanks.chain(days).collect::<Vec<_>>()
                }}
            </div>
        </div>
    }
}

#[component]
fn DayDetails(
    appointments: RwSignal<Vec<Appointment>>,
    selected_date: RwSignal<Option<NaiveDate>>,
    slots_per_day: u32,
) -> impl IntoView {
    view! {
        {move || selected_date.get().map(|date| {
            let list = appointments.get();
            let occupancy = day_occupancy(&list, date, slots_per_day);
            let mut todays: Vec<Appointment> = list
                .into_iter()
                .filter(|a| a.starts_at.date() == date)
                .collect();
            todays.sort_by_key(|a| a.starts_at);

            view! {
                <Card class="day-occupancy">
                    <h3>{format!("Occupancy for {}", date.format("%d/%m/%Y"))}</h3>
                    <p class="day-occupancy-summary">
                        {format!(
                            "{}/{} booked ({}%) · {}",
                            occupancy.occupied,
                            occupancy.total,
                            occupancy.percentage,
                            occupancy.level().label(),
                        )}
                    </p>
                    {if todays.is_empty() {
                        view! { <p>"No appointments this day."</p> }.into_any()
                    } else {
                        view! {
                            <ul class="day-appointments">
                                {todays.into_iter().map(|a| view! {
                                    <li class:unconfirmed=!a.confirmed>
                                        <strong>{a.starts_at.format("%H:%M").to_string()}</strong>
                                        " "
                                        {a.service_name.clone().unwrap_or_else(|| "Service".to_string())}
                                        " · "
                                        {a.client_name.clone().unwrap_or_else(|| "Unknown client".to_string())}
                                        {a.recurring_every_days.map(|days| format!(" · every {} days", days))}
                                        {a.comment.clone().map(|c| view! { <p class="appointment-comment">{c}</p> })}
                                    </li>
                                }).collect::<Vec<_>>()}
                            </ul>
                        }.into_any()
                    }}
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| selected_date.set(None)
                    >
                        "Close"
                    </Button>
                </Card>
            }
        })}
    }
}

#[component]
fn AdminCalendar() -> impl IntoView {
    let session = use_session();
    let config = use_client_config();
    let slots_per_day = config.slots_per_day;

    let appointments = RwSignal::new(Vec::<Appointment>::new());
    let is_loading = RwSignal::new(true);
    let load_error = RwSignal::new(None::<String>);
    let month = RwSignal::new(MonthCursor::of(local_now().date()));
    let selected_date = RwSignal::new(None::<NaiveDate>);

    Effect::new(move |_| {
        let Some(token) = session.token.get() else {
            return;
        };
        let api = HttpBookingApi::new(&config);
        is_loading.set(true);
        spawn_local(async move {
            match api.appointments(&token).await {
                Ok(list) => {
                    appointments.set(list);
                    load_error.set(None);
                }
                Err(e) => {
                    leptos::logging::error!("Failed to fetch appointments: {}", e);
                    load_error.set(Some("Could not load the appointments.".to_string()));
                }
            }
            is_loading.set(false);
        });
    });

    let occupancy = Memo::new(move |_| {
        appointments.with(|list| month_occupancy(list, month.get(), slots_per_day))
    });

    let navigate_month = move |delta: i32| {
        month.update(|m| *m = m.shift(delta));
        selected_date.set(None);
    };

    view! {
        <div class="admin-calendar-container">
            <div class="calendar-navigation">
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| navigate_month(-1)>
                    "← Previous"
                </Button>
                <h2 class="current-month">{move || month.get().label()}</h2>
                <Button appearance=ButtonAppearance::Subtle on_click=move |_| navigate_month(1)>
                    "Next →"
                </Button>
            </div>

            {move || load_error.get().map(|message| view! { <ErrorView message=Some(message)/> })}

            <Show
                when=move || !is_loading.get()
                fallback=|| view! { <LoadingView message=Some("Loading appointments...".to_string())/> }
            >
                <div class="occupancy-stats">
                    {move || {
                        let stats = occupancy.get().stats;
                        let daily = if stats.total_days > 0 {
                            (f64::from(stats.total_appointments) / f64::from(stats.total_days)).round() as u32
                        } else {
                            0
                        };
                        view! {
                            <p><strong>"Appointments: "</strong>{stats.total_appointments}</p>
                            <p><strong>"Days with appointments: "</strong>{format!("{}/{}", stats.days_with_appointments, stats.total_days)}</p>
                            <p><strong>"Average occupancy: "</strong>{format!("{}%", stats.average_occupancy)}</p>
                            <p><strong>"Daily average: "</strong>{format!("{} appointments", daily)}</p>
                        }
                    }}
                </div>

                <div class="occupancy-legend">
                    <span class="legend-item occupancy-low">"Low (1-50%)"</span>
                    <span class="legend-item occupancy-medium">"Medium (51-80%)"</span>
                    <span class="legend-item occupancy-high">"High (81-100%)"</span>
                </div>

                <OccupancyGrid occupancy=occupancy selected_date=selected_date/>
                <DayDetails appointments=appointments selected_date=selected_date slots_per_day=slots_per_day/>
            </Show>
        </div>
    }
}

/// Month overview of bookings for administrators.
#[component]
pub fn AdminCalendarPage() -> impl IntoView {
    view! {
        <RoleGuard role=Role::Admin>
            <AdminCalendar/>
        </RoleGuard>
    }
}
