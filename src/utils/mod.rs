//! Utility modules for ssl-checker
//!
//! This module contains error types, the clock abstraction and progress
//! indicators.

pub mod clock;
pub mod error;
pub mod progress;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CheckError, ConfigError, ConnectionError, DecodeError, Result};
