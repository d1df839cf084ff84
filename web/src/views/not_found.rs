use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found-container">
            <div class="not-found-card">
                <h1 class="not-found-code">"404"</h1>
                <h2>"Page Not Found"</h2>
                <p>"The page you are looking for does not exist."</p>
                <A href="/">"Back to booking"</A>
            </div>
        </div>
    }
}
