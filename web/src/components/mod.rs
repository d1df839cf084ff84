pub mod availability_calendar;
pub mod booking_confirmation;
pub mod booking_controller;
pub mod error;
pub mod loading;
pub mod route_guard;
pub mod service_picker;
pub mod session_provider;

// Re-export commonly used types
pub use availability_calendar::AvailabilityCalendar;
pub use booking_confirmation::BookingConfirmation;
pub use booking_controller::BookingController;
pub use route_guard::RoleGuard;
pub use service_picker::ServicePicker;
pub use session_provider::{use_client_config, use_session, SessionContext, SessionProvider};
