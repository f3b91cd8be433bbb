//! Foundation utilities shared by every module
//!
//! - [`math`] - nalgebra aliases and transforms
//! - [`logging`] - `log` facade and `env_logger` setup

pub mod logging;
pub mod math;
