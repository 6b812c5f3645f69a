#![forbid(unsafe_code)]

pub mod error;
pub mod exercise;
pub mod model;
pub mod quiz;
pub mod roadmap;
pub mod sorting;
pub mod time;

pub use error::Error;
pub use time::Clock;
