pub mod admin_calendar;
pub mod booking;
pub mod login;
pub mod not_found;

pub use admin_calendar::AdminCalendarPage;
pub use booking::BookingPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
