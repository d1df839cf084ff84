//! Month calendar, day slots and the booking wizard.

pub mod availability;
pub mod calendar;
pub mod flow;
pub mod generation;
pub mod occupancy;
pub mod slots;
pub mod wizard;

pub use availability::{AvailabilityLevel, MonthAvailability};
pub use calendar::MonthCursor;
pub use flow::BookingFlow;
pub use wizard::{BookingWizard, DayCell, SubmitOutcome, WizardStep};
