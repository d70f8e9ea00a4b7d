//! `academy` - attendance and student records for a vocational academy
//!
//! This library provides the clock-in/clock-out engine, the persistence
//! store it runs on, and the enrollment, login and reporting operations
//! built over the same store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod attendance;
pub mod auth;
pub mod cli;
pub mod clock;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod kiosk;
pub mod logging;
pub mod model;
pub mod programs;
pub mod stats;
pub mod store;

pub use attendance::{AttendanceEngine, ClockOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{AttendanceRecord, Grade, Program, Student, User};
pub use store::{Backend, Collection, Store};
