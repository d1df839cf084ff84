use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use thaw::*;

use crate::components::error::SessionNoticeBar;
use crate::components::use_session;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let password_visible = RwSignal::new(false);
    let submitted = RwSignal::new(false);

    // leave once the session reports a user
    Effect::new(move |_| {
        if let Some(user) = session.user.get() {
            let target = if user.role.is_admin() { "/admin" } else { "/" };
            navigate(target, Default::default());
        }
    });

    // a finished load or a new notice ends the attempt
    Effect::new(move |_| {
        let settled = !session.loading.get();
        let has_notice = session.notice.with(Option::is_some);
        if settled || has_notice {
            submitted.set(false);
        }
    });

    let is_button_disabled =
        Memo::new(move |_| email.get().trim().is_empty() || password.get().is_empty());
    let loading = Signal::from(submitted);

    let submit_login = move || {
        submitted.set(true);
        session.login(email.get_untracked().trim().to_string(), password.get_untracked());
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <div class="auth-header">
                    <h1>"Welcome Back"</h1>
                    <p>"Sign in to book your appointment"</p>
                </div>

                {move || session.notice.get().map(|notice| view! { <SessionNoticeBar notice=notice/> })}

                <form on:submit=move |ev| {
                    ev.prevent_default();
                    submit_login();
                }>
                    <div class="auth-form-group">
                        <Input
                            class="auth-input"
                            placeholder="Email"
                            input_type=InputType::Email
                            value=email
                        />
                    </div>

                    <div class="auth-form-group">
                        <div class="auth-input-wrapper">
                            <Input
                                class="auth-input"
                                placeholder="Password"
                                input_type=Signal::derive(move || if password_visible.get() { InputType::Text } else { InputType::Password })
                                value=password
                            />
                            <button
                                type="button"
                                class="auth-password-toggle"
                                on:click=move |_| password_visible.set(!password_visible.get())
                            >
                                {move || if password_visible.get() { "Hide" } else { "Show" }}
                            </button>
                        </div>
                    </div>

                    <Button
                        class="auth-submit-btn"
                        button_type=ButtonType::Submit
                        loading=loading
                        disabled=Signal::from(is_button_disabled)
                    >
                        "Sign In"
                    </Button>
                </form>
            </div>
        </div>
    }
}
