use leptos::prelude::*;
use thaw::{MessageBar, MessageBarIntent};

use crate::session::SessionNotice;

#[component]
pub fn ErrorView(message: Option<String>) -> impl IntoView {
    view! {
        <MessageBar intent=MessageBarIntent::Error>
            {message.unwrap_or_else(|| "Something went wrong. Please try again.".to_string())}
        </MessageBar>
    }
}

/// Human text for a session notice.
pub fn notice_message(notice: &SessionNotice) -> String {
    match notice {
        SessionNotice::Suspended => {
            "Your account has been suspended. Contact the shop for details.".to_string()
        }
        SessionNotice::Expired => "Your session has expired. Please log in again.".to_string(),
        SessionNotice::EmailNotVerified => {
            "Please verify your email address before logging in.".to_string()
        }
        SessionNotice::LoginFailed(reason) => format!("Login failed: {}", reason),
    }
}

#[component]
pub fn SessionNoticeBar(notice: SessionNotice) -> impl IntoView {
    let intent = match notice {
        SessionNotice::Expired => MessageBarIntent::Warning,
        _ => MessageBarIntent::Error,
    };
    view! {
        <MessageBar intent=intent>{notice_message(&notice)}</MessageBar>
    }
}
