pub mod input;
pub mod status;

pub use input::{InputAction, InputField, InputPanel};
pub use status::{StatusKind, StatusLog, StatusMessage};
