//! Visit tracker page for teachers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lists the teacher's active assessment visits and drives their status
//! workflow. While a visit is en route the device position is watched; each
//! fix is persisted over REST and broadcast on the push channel.
//!
//! ARCHITECTURE
//! ============
//! The push channel is opened on mount and closed on unmount. The single
//! [`LocationTracker`] lives in a local stored value owned by this page, so
//! tearing the page down stops the watch. Status updates are stamped by
//! [`VisitsState`] and only the newest response per visit is applied.

use leptos::prelude::*;

use crate::app::use_api;
use crate::components::visit_card::{ActionRequest, VisitCard};
use crate::net::push_channel::{PushSender, PushStatus};
use crate::net::types::Visit;
use crate::state::visits::VisitsState;

#[cfg(feature = "hydrate")]
use crate::state::tracking::LocationTracker;
#[cfg(feature = "hydrate")]
use crate::util::geolocation::BrowserGeolocation;

#[cfg(feature = "hydrate")]
type Tracker = StoredValue<LocationTracker<BrowserGeolocation>, LocalStorage>;

/// Start watching the device position for `visit_id`, replacing any active watch.
#[cfg(feature = "hydrate")]
fn start_tracking(
    visit_id: &str,
    api: &crate::net::api::ApiClient,
    state: RwSignal<VisitsState>,
    push: RwSignal<PushSender>,
    tracker: Tracker,
) {
    use crate::net::push_channel::{location_event, start_sharing_event};
    use crate::state::tracking::{ErrorHandler, SampleHandler};

    state.update(|s| s.select_for_tracking(visit_id));

    let sample_visit = visit_id.to_owned();
    let sample_api = api.clone();
    let on_sample: SampleHandler = Box::new(move |sample| {
        if !state.try_update(|s| s.record_location(&sample_visit, sample)).unwrap_or(false) {
            return;
        }
        push.with_untracked(|p| p.send(&location_event(&sample_visit, &sample)));
        let api = sample_api.clone();
        let visit_id = sample_visit.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = api.update_visit_location(&visit_id, &sample).await {
                leptos::logging::warn!("location update for {visit_id} failed: {e}");
            }
        });
    });

    let error_visit = visit_id.to_owned();
    let on_error: ErrorHandler = Box::new(move |err| {
        leptos::logging::warn!("tracking {error_visit} halted: {err}");
        tracker.update_value(|t| {
            t.stop_visit(&error_visit);
        });
        state.update(|s| s.tracking_failed(err.to_string()));
    });

    match tracker.try_update_value(|t| t.start(visit_id, on_sample, on_error)) {
        Some(Ok(())) => {
            push.with_untracked(|p| p.send(&start_sharing_event(visit_id)));
        }
        Some(Err(err)) => state.update(|s| s.tracking_failed(err.to_string())),
        None => {}
    }
}

/// Forget `visit_id` as the tracked visit, if it is the one selected.
fn clear_selection(visit_id: &str, state: RwSignal<VisitsState>) {
    state.update(|s| {
        if s.selected_visit_id.as_deref() == Some(visit_id) {
            s.clear_tracking();
        }
    });
}

/// Stop watching `visit_id` if it is the tracked visit.
#[cfg(feature = "hydrate")]
fn stop_tracking(visit_id: &str, state: RwSignal<VisitsState>, tracker: Tracker) {
    tracker.update_value(|t| {
        t.stop_visit(visit_id);
    });
    clear_selection(visit_id, state);
}

fn push_label(status: PushStatus) -> &'static str {
    match status {
        PushStatus::Connected => "Live",
        PushStatus::Connecting => "Connecting…",
        PushStatus::Disconnected => "Offline",
    }
}

/// Visit tracker page.
#[component]
pub fn VisitTrackerPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(VisitsState::default());
    let push_status = RwSignal::new(PushStatus::Disconnected);
    let push = RwSignal::new(PushSender::default());

    #[cfg(feature = "hydrate")]
    let tracker: Tracker = StoredValue::new_local(LocationTracker::new(BrowserGeolocation::default()));

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        state.update(|s| s.loading = true);
        leptos::task::spawn_local(async move {
            match api.fetch_active_visits().await {
                Ok(visits) => state.update(|s| s.set_visits(visits)),
                Err(e) => state.update(|s| {
                    s.loading = false;
                    s.error = Some(e.user_message());
                }),
            }
        });

        let session = expect_context::<RwSignal<crate::state::session::Session>>().get_untracked();
        let config = expect_context::<crate::config::ClientConfig>();
        let location = web_sys::window().map(|w| w.location());
        if let (Some(token), Some(location)) = (session.token, location) {
            let href = location.href().unwrap_or_default();
            let host = location.host().unwrap_or_default();
            push.set(crate::net::push_channel::open_push_channel(
                config.push_endpoint(&href, &host, &token),
                push_status,
            ));
        }
    }

    on_cleanup(move || {
        push.try_with_untracked(PushSender::close);
        #[cfg(feature = "hydrate")]
        tracker.try_update_value(|t| t.stop());
    });

    let on_action = Callback::new(move |req: ActionRequest| {
        let pending = match state.try_update(|s| s.begin_status_update(&req.visit_id, req.action, &req.notes)) {
            Some(Ok(pending)) => pending,
            Some(Err(err)) => {
                state.update(|s| s.error = Some(err.to_string()));
                return;
            }
            None => return,
        };
        #[cfg(feature = "hydrate")]
        {
            use crate::net::push_channel::status_event;

            let api = api.clone();
            leptos::task::spawn_local(async move {
                let result = api
                    .update_visit_status(&pending.visit_id, pending.status, &pending.notes, pending.location.as_ref())
                    .await;
                match result {
                    Ok(visit) => {
                        if !state.try_update(|s| s.apply_status_response(&pending, visit)).unwrap_or(false) {
                            return;
                        }
                        push.with_untracked(|p| p.send(&status_event(&pending.visit_id, pending.status, &pending.notes)));
                        if pending.action.starts_tracking() {
                            start_tracking(&pending.visit_id, &api, state, push, tracker);
                        } else if pending.action.stops_tracking() {
                            stop_tracking(&pending.visit_id, state, tracker);
                        }
                    }
                    Err(e) => {
                        leptos::logging::warn!("status update for {} failed: {e}", pending.visit_id);
                        state.try_update(|s| s.fail_status_update(&pending, e.user_message()));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api, pending, push);
        }
    });

    let on_stop_tracking = Callback::new(move |visit_id: String| {
        #[cfg(feature = "hydrate")]
        stop_tracking(&visit_id, state, tracker);
        #[cfg(not(feature = "hydrate"))]
        clear_selection(&visit_id, state);
    });

    let visits = move || state.with(|s| s.visits.clone());

    view! {
        <section class="visits-page">
            <header class="visits-page__header">
                <h1>"My Visits"</h1>
                <span class=move || format!("push-status push-status--{:?}", push_status.get()).to_lowercase()>
                    {move || push_label(push_status.get())}
                </span>
            </header>

            <Show when=move || state.with(|s| s.error.is_some())>
                <p class="visits-page__error" role="alert">
                    {move || state.with(|s| s.error.clone().unwrap_or_default())}
                    <button class="btn btn--link" on:click=move |_| state.update(|s| s.error = None)>"Dismiss"</button>
                </p>
            </Show>

            <Show
                when=move || !state.with(|s| s.loading)
                fallback=|| view! { <p class="visits-page__loading">"Loading visits…"</p> }
            >
                <Show
                    when=move || state.with(|s| !s.visits.is_empty())
                    fallback=|| view! { <p class="visits-page__empty">"No active visits."</p> }
                >
                    <div class="visits-page__list">
                        <For
                            each=visits
                            key=|v: &Visit| (v.id.clone(), v.status, v.timeline.len())
                            children=move |visit: Visit| {
                                let tracked_id = visit.id.clone();
                                let updating_id = visit.id.clone();
                                let location_id = visit.id.clone();
                                view! {
                                    <VisitCard
                                        visit=visit
                                        tracking=Signal::derive(move || {
                                            state.with(|s| s.selected_visit_id.as_deref() == Some(tracked_id.as_str()))
                                        })
                                        updating=Signal::derive(move || state.with(|s| s.is_updating(&updating_id)))
                                        current_location=Signal::derive(move || {
                                            state.with(|s| {
                                                if s.selected_visit_id.as_deref() == Some(location_id.as_str()) {
                                                    s.current_location
                                                } else {
                                                    None
                                                }
                                            })
                                        })
                                        on_action=on_action
                                        on_stop_tracking=on_stop_tracking
                                    />
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>
        </section>
    }
}
