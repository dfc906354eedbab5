pub mod clock;
pub mod error;
pub mod format;
pub mod lenient;
