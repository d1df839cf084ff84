use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use super::loading::LoadingView;
use super::session_provider::use_session;
use crate::models::Role;

#[component]
fn Redirecting(to: &'static str) -> impl IntoView {
    let navigate = use_navigate();

    Effect::new(move |_| {
        navigate(to, Default::default());
    });

    view! {
        <div class="auth-guard-container">
            <div class="auth-guard-content">
                <div class="auth-guard-denied-title">"🚫 Access Denied"</div>
                <div class="auth-guard-denied-subtitle">"Redirecting..."</div>
            </div>
        </div>
    }
}

/// Renders `children` only for a logged in user, and only with `role`
/// when one is required. Anonymous visitors go to the login page, users
/// with the wrong role go home.
#[component]
pub fn RoleGuard(#[prop(optional)] role: Option<Role>, children: ChildrenFn) -> impl IntoView {
    let session = use_session();

    let has_user = move || session.user.with(Option::is_some);
    let has_role = move || match role {
        Some(required) => session.role() == Some(required),
        None => true,
    };

    view! {
        <Show
            when=move || !session.loading.get()
            fallback=|| view! { <LoadingView message=Some("🔐 Verifying access...".to_string())/> }
        >
            <Show
                when=has_user
                fallback=|| view! { <Redirecting to="/login"/> }
                clone:children
            >
                <Show
                    when=has_role
                    fallback=|| view! { <Redirecting to="/"/> }
                    clone:children
                >
                    {children()}
                </Show>
            </Show>
        </Show>
    }
}
