mod app;
mod theme;
mod view_state;
mod views;

pub use app::PlannerApp;
pub use theme::{setup_fonts, setup_theme};
pub use view_state::{PreferenceForm, RequestTracker, ScheduleSession, SlotInput, ViewState};
