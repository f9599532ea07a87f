//! Session/history controller.

mod controller;

pub use controller::{DiagramSession, GenerateOutcome};

#[cfg(test)]
mod controller_test;
