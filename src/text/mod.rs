pub mod cleaner;
pub mod validity;

pub use cleaner::clean;
pub use validity::{TextValidator, Verdict};
