pub mod controller;
pub mod filter;
pub mod view_state;

pub use controller::ViewStateController;
pub use filter::filter_apps;
pub use view_state::{UiError, ViewState};
