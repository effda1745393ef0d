pub mod format;
pub mod progress;

pub use progress::create_spinner;
