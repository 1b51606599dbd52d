//! Plain data types shared by the Lottie evaluation engine.
//!
//! Nothing in this crate knows about time. The types here are the values
//! that keyframes carry (colors, point lists, gradient stop arrays, text
//! documents) and the configuration a composition is built from.

pub mod config;
pub mod model;
pub mod unicode;

pub use config::{CompositionConfig, ConfigError};
pub use unicode::{TextDecodeError, Unicode};
