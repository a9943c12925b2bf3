//! BDD step definitions for the homework bot

pub mod poll_steps;
