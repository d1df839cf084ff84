use leptos::prelude::*;
use thaw::*;

use super::booking_controller::BookingController;
use super::loading::LoadingView;
use crate::booking::calendar::WEEKDAY_HEADERS;
use crate::booking::DayCell;
use crate::session::local_now;

#[component]
fn DayButton(cell: DayCell, controller: BookingController) -> impl IntoView {
    let level_class = cell.level.map(|level| level.css_class()).unwrap_or("");
    let title = match cell.free_slots {
        Some(free) => format!("{} free slots ({}%)", free, cell.free_percentage),
        None => "No availability data".to_string(),
    };

    view! {
        <button
            class=format!("calendar-day {}", level_class)
            class:past=cell.is_past
            class:today=cell.is_today
            class:selected=cell.selected
            class:unavailable=!cell.selectable
            disabled=!cell.selectable
            title=title
            on:click=move |_| controller.select_day(cell.day)
        >
            <span class="calendar-day-number">{cell.day}</span>
            {cell.free_slots.map(|free| view! { <span class="calendar-day-slots">{free}</span> })}
        </button>
    }
}

#[component]
fn SlotList(controller: BookingController) -> impl IntoView {
    let state = controller.state;

    view! {
        {move || {
            state.with(|wizard| {
                let Some(wizard) = wizard else {
                    return view! {}.into_any();
                };
                let Some(date) = wizard.selected_day() else {
                    return view! {
                        <p class="time-slot-picker-subtitle">"Select a day to see free times"</p>
                    }.into_any();
                };
                if wizard.is_day_loading() {
                    return view! {
                        <LoadingView message=Some("Loading available time slots...".to_string())/>
                    }.into_any();
                }

                let slots = wizard.visible_slots(local_now());
                let selected = wizard.selected_time();
                let heading = format!("Free times on {}", date.format("%d/%m/%Y"));

                if slots.is_empty() {
                    view! {
                        <div class="time-slot-picker-empty">
                            <h4>{heading}</h4>
                            <p>"No free times left for this day."</p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="time-slot-picker">
                            <h4>{heading}</h4>
                            <div class="time-slot-picker-grid">
                                {slots.into_iter().map(|slot| {
                                    let appearance = if selected == Some(slot) {
                                        ButtonAppearance::Primary
                                    } else {
                                        ButtonAppearance::Secondary
                                    };
                                    view! {
                                        <Button
                                            class="time-slot-button"
                                            appearance=appearance
                                            on_click=move |_| controller.select_time(slot)
                                        >
                                            {slot.to_string()}
                                        </Button>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                        </div>
                    }.into_any()
                }
            })
        }}
    }
}

/// Month grid with occupancy colouring plus the free times of the
/// selected day.
#[component]
pub fn AvailabilityCalendar(controller: BookingController) -> impl IntoView {
    let state = controller.state;

    let can_go_back = Signal::derive(move || {
        state.with(|w| {
            w.as_ref()
                .is_some_and(|w| w.can_go_to_previous_month(local_now().date()))
        })
    });
    let month_label = move || state.with(|w| w.as_ref().map(|w| w.month().label()).unwrap_or_default());
    let month_summary = move || {
        state.with(|w| {
            w.as_ref()
                .and_then(|w| w.month_availability())
                .map(|month| format!("{} free slots this month", month.total_free()))
        })
    };
    let can_continue = Signal::derive(move || {
        state.with(|w| w.as_ref().is_some_and(|w| w.selected_time().is_some()))
    });

    view! {
        <div class="availability-calendar">
            <div class="date-picker-header">
                <Button
                    appearance=ButtonAppearance::Secondary
                    size=ButtonSize::Small
                    on_click=move |_| controller.select_month(-1)
                    disabled=Signal::derive(move || !can_go_back.get())
                >
                    "←"
                </Button>
                <div class="month-label">
                    {month_label}
                    {move || month_summary().map(|summary| view! {
                        <span class="month-summary">{summary}</span>
                    })}
                </div>
                <Button
                    appearance=ButtonAppearance::Secondary
                    size=ButtonSize::Small
                    on_click=move |_| controller.select_month(1)
                >
                    "→"
                </Button>
            </div>

            {move || state.with(|w| w.as_ref().and_then(|w| w.notice().map(str::to_string))).map(|notice| view! {
                <MessageBar intent=MessageBarIntent::Warning>{notice}</MessageBar>
            })}

            {move || controller.refusal.get().map(|message| view! {
                <p class="calendar-refusal">{message}</p>
            })}

            {move || {
                let loading = state.with(|w| w.as_ref().is_some_and(|w| w.is_month_loading()));
                if loading {
                    view! {
                        <LoadingView message=Some("Checking availability...".to_string())/>
                    }.into_any()
                } else {
                    let cells = state.with(|w| {
                        w.as_ref().map(|w| w.month_grid(local_now())).unwrap_or_default()
                    });
                    view! {
                        <div class="date-picker-calendar">
                            <div class="weekday-headers">
                                {WEEKDAY_HEADERS.iter().map(|name| view! {
                                    <div class="weekday-header">{*name}</div>
                                }).collect::<Vec<_>>()}
                            </div>
                            <div class="calendar-days">
                                {cells.into_iter().map(|cell| match cell {
                                    Some(cell) => view! { <DayButton cell=cell controller=controller/> }.into_any(),
                                    None => view! { <div class="calendar-day empty"></div> }.into_any(),
                                }).collect::<Vec<_>>()}
                            </div>
                        </div>
                    }.into_any()
                }
            }}

            <div class="availability-legend">
                <span class="legend-item availability-high">"Plenty of room"</span>
                <span class="legend-item availability-medium">"Filling up"</span>
                <span class="legend-item availability-low">"Almost full"</span>
            </div>

            <SlotList controller=controller/>

            <div class="date-picker-footer">
                <Button
                    appearance=ButtonAppearance::Primary
                    disabled=Signal::derive(move || !can_continue.get())
                    on_click=move |_| controller.advance_to_confirmation()
                >
                    "Continue"
                </Button>
            </div>
        </div>
    }
}
