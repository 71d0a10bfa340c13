//! Terminal output helpers

mod progress;

pub use progress::TaskSpinner;
