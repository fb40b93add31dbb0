//! Card for one assessment visit: student, destination, timeline, and the
//! next workflow action.

#[cfg(test)]
#[path = "visit_card_test.rs"]
mod visit_card_test;

use leptos::prelude::*;

use crate::net::types::{Destination, LocationSample, Visit, VisitStatus};
use crate::state::visits::VisitAction;
use crate::util::format::short_datetime;

/// Search link for the destination on Google Maps.
pub fn maps_url(destination: &Destination) -> String {
    let query = if destination.address.trim().is_empty() {
        destination.name.as_str()
    } else {
        destination.address.as_str()
    };
    format!("https://www.google.com/maps/search/?api=1&query={}", urlencoding::encode(query.trim()))
}

/// `tel:` link with spaces and punctuation other than `+` removed.
pub fn tel_url(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    if digits.is_empty() { None } else { Some(format!("tel:{digits}")) }
}

/// Coordinates with accuracy, e.g. `41.38720, 2.17000 (±12 m)`.
pub fn describe_location(sample: &LocationSample) -> String {
    format!("{:.5}, {:.5} (±{:.0} m)", sample.latitude, sample.longitude, sample.accuracy)
}

/// CSS modifier for a status badge.
pub fn status_class(status: VisitStatus) -> String {
    format!("visit-status visit-status--{}", status.as_str().replace('_', "-"))
}

/// A status action chosen on a card: visit id, action, and the note typed with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub visit_id: String,
    pub action: VisitAction,
    pub notes: String,
}

#[component]
pub fn VisitCard(
    visit: Visit,
    #[prop(into)] tracking: Signal<bool>,
    #[prop(into)] updating: Signal<bool>,
    #[prop(into)] current_location: Signal<Option<LocationSample>>,
    on_action: Callback<ActionRequest>,
    on_stop_tracking: Callback<String>,
) -> impl IntoView {
    let notes = RwSignal::new(String::new());
    let action = VisitAction::available_for(visit.status);
    let visit_id = visit.id.clone();
    let stop_id = visit.id.clone();

    let on_click = move |_| {
        let Some(action) = action else {
            return;
        };
        on_action.run(ActionRequest { visit_id: visit_id.clone(), action, notes: notes.get_untracked() });
        notes.set(String::new());
    };

    let phone_link = visit
        .student
        .phone
        .as_deref()
        .and_then(|p| tel_url(p).map(|href| (href, p.to_owned())));
    let map_link = maps_url(&visit.destination);

    let timeline = visit
        .timeline
        .iter()
        .map(|event| {
            let notes = (!event.notes.is_empty()).then(|| event.notes.clone());
            view! {
                <li class="visit-card__timeline-item">
                    <span class=status_class(event.status)>{event.status.label()}</span>
                    <span class="visit-card__timeline-time">{short_datetime(event.timestamp)}</span>
                    {notes.map(|n| view! { <span class="visit-card__timeline-notes">{n}</span> })}
                </li>
            }
        })
        .collect_view();

    view! {
        <article class=move || if tracking.get() { "visit-card visit-card--tracking" } else { "visit-card" }>
            <header class="visit-card__header">
                <h3 class="visit-card__title">{visit.title.clone()}</h3>
                <span class=status_class(visit.status)>{visit.status.label()}</span>
            </header>

            <dl class="visit-card__details">
                <dt>"Student"</dt>
                <dd>
                    {visit.student.name.clone()}
                    <span class="visit-card__muted">" · " {visit.student.school_id.clone()}</span>
                    {phone_link.map(|(href, label)| view! { <a class="visit-card__phone" href=href>{label}</a> })}
                </dd>
                <dt>"Assessment"</dt>
                <dd>{visit.assessment_type.clone()}</dd>
                <dt>"Scheduled"</dt>
                <dd>{short_datetime(visit.scheduled_date)}</dd>
                <dt>"Destination"</dt>
                <dd>
                    {visit.destination.name.clone()}
                    <a class="visit-card__map" href=map_link target="_blank" rel="noopener">
                        {visit.destination.address.clone()}
                    </a>
                </dd>
            </dl>

            <Show when=move || tracking.get()>
                <div class="visit-card__location">
                    <span class="visit-card__live-dot"></span>
                    {move || {
                        current_location
                            .get()
                            .map_or_else(|| "Waiting for location…".to_owned(), |s| describe_location(&s))
                    }}
                    <button
                        class="btn visit-card__stop"
                        on:click={
                            let stop_id = stop_id.clone();
                            move |_| on_stop_tracking.run(stop_id.clone())
                        }
                    >
                        "Stop sharing"
                    </button>
                </div>
            </Show>

            <ol class="visit-card__timeline">{timeline}</ol>

            {action.map(|action| {
                view! {
                    <div class="visit-card__actions">
                        <input
                            class="visit-card__notes"
                            type="text"
                            placeholder="Notes (optional)"
                            prop:value=move || notes.get()
                            on:input=move |ev| notes.set(event_target_value(&ev))
                        />
                        <button
                            class="btn btn--primary visit-card__action"
                            disabled=move || updating.get()
                            on:click=on_click
                        >
                            {move || if updating.get() { "Updating…" } else { action.label() }}
                        </button>
                    </div>
                }
            })}
        </article>
    }
}
