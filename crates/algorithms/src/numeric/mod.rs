//! Numerical utilities
//!
//! Quadrature used to check and summarise unit responses.

mod integration;

pub use integration::{polint, qromb, qsimp, qtrap, TrapezoidRule};
