pub mod app;
pub mod events;
pub mod settings;

pub use app::*;
pub use events::*;
pub use settings::*;
