use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes, A},
    StaticSegment,
};
use thaw::ssr::SSRMountStyleProvider;
use thaw::*;

use crate::components::{use_session, SessionProvider};
use crate::config::ClientConfig;
use crate::views::{AdminCalendarPage, BookingPage, LoginPage, NotFoundPage};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <SSRMountStyleProvider>
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <AutoReload options=options.clone() />
                    <HydrationScripts options/>
                    <MetaTags/>
                </head>
                <body>
                    <App/>
                </body>
            </html>
        </SSRMountStyleProvider>
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let session = use_session();

    view! {
        <nav class="navbar">
            <A href="/">"Book"</A>
            <Show when=move || session.is_admin()>
                <A href="/admin">"Occupancy"</A>
            </Show>
            <div class="navbar-user">
                {move || match session.user.get() {
                    Some(user) => view! {
                        <span class="navbar-user-name">{user.display_name().to_string()}</span>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| session.logout()
                        >
                            "Log out"
                        </Button>
                    }.into_any(),
                    None => view! { <A href="/login">"Log in"</A> }.into_any(),
                }}
            </div>
        </nav>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // the server injects its runtime config; the browser bundle uses the build-time one
    if use_context::<ClientConfig>().is_none() {
        provide_context(ClientConfig::from_build_env());
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/booking-web.css"/>
        <Title text="Barber booking"/>

        <ConfigProvider>
            <SessionProvider>
                <Router>
                    <NavBar/>
                    <main>
                        <Routes fallback=|| view! { <NotFoundPage/> }>
                            <Route path=StaticSegment("") view=BookingPage/>
                            <Route path=StaticSegment("login") view=LoginPage/>
                            <Route path=StaticSegment("admin") view=AdminCalendarPage/>
                        </Routes>
                    </main>
                </Router>
            </SessionProvider>
        </ConfigProvider>
    }
}
