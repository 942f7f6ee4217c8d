pub mod commands;
mod controller;

pub use controller::{CompletionOutcome, SessionController};
