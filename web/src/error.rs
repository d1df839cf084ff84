use thiserror::Error;

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("email address is not verified")]
    EmailNotVerified,
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse(detail.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Local refusals raised by the booking wizard before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("cannot show a month before the current one")]
    MonthBeforeCurrent,
    #[error("that day does not exist in this month")]
    DayOutOfRange,
    #[error("that day has already passed")]
    DayInPast,
    #[error("there are no free slots that day")]
    NoFreeSlots,
    #[error("choose a day first")]
    NoDaySelected,
    #[error("free slots for this day are still loading")]
    SlotsNotLoaded,
    #[error("that time is not available")]
    SlotNotOffered,
    #[error("that time has already passed")]
    SlotInPast,
    #[error("choose a day and a time first")]
    IncompleteSelection,
    #[error("select the client for this appointment")]
    MissingClient,
    #[error("the booking is not waiting for confirmation")]
    NotConfirming,
    #[error("the booking is already being submitted")]
    SubmissionInFlight,
}

/// Message shown when the backend refuses to create the appointment.
pub const SUBMIT_FAILED_MESSAGE: &str = "Could not create the appointment. Please try again.";
