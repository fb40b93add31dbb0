//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{A, Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::pages::{
    homework::HomeworkPage, notifications::NotificationsPage, profile::ProfilePage, visits::VisitTrackerPage,
};
use crate::state::session::Session;

/// HTML shell rendered on the server for SSR + hydration.
#[cfg(feature = "ssr")]
pub fn shell(options: LeptosOptions) -> impl IntoView {
    use leptos_meta::MetaTags;

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// REST client for the current session, built from the provided contexts.
pub fn use_api() -> ApiClient {
    let config = expect_context::<ClientConfig>();
    let session = expect_context::<RwSignal<Session>>();
    session.with_untracked(|s| ApiClient::new(&config, s))
}

/// Root application component.
///
/// Provides the session and client configuration and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // The server never sees localStorage, so the session is read after hydration.
    let session = RwSignal::new(Session::default());
    provide_context(session);
    provide_context(ClientConfig::load());
    Effect::new(move || session.set(Session::load()));

    let signed_in = move || session.with(Session::is_signed_in);
    let user_name = move || session.with(|s| s.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());

    view! {
        <Stylesheet id="leptos" href="/pkg/fieldwork.css"/>
        <Title text="Fieldwork"/>

        <Router>
            <nav class="app-nav">
                <A href="/visits">"Visits"</A>
                <A href="/homework">"Homework"</A>
                <A href="/notifications">"Notifications"</A>
                <A href="/profile">"Profile"</A>
                <span class="app-nav__user">{user_name}</span>
            </nav>
            <main class="app-main">
                <Show
                    when=signed_in
                    fallback=|| {
                        view! {
                            <div class="app-main__signed-out">
                                <h1>"Sign in required"</h1>
                                <p>"Sign in from the main portal, then reload this page."</p>
                            </div>
                        }
                    }
                >
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("") view=VisitTrackerPage/>
                        <Route path=StaticSegment("visits") view=VisitTrackerPage/>
                        <Route path=StaticSegment("homework") view=HomeworkPage/>
                        <Route path=StaticSegment("notifications") view=NotificationsPage/>
                        <Route path=StaticSegment("profile") view=ProfilePage/>
                    </Routes>
                </Show>
            </main>
        </Router>
    }
}
