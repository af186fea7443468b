//! Hegemon engine library.
//!
//! A Risk rules engine: the phase state machine, reinforcement and card
//! economies, dice combat, and the template-based action validation layer
//! that checks every proposed move before it touches game state. Exposed as
//! modules for use by integration tests and the binary entry point.

pub mod actions;
pub mod board;
pub mod decision;
pub mod engine;
pub mod event;
pub mod rules;
pub mod selfplay;
