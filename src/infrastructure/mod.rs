//! Infrastructure layer - local session host, models and presentation

pub mod logging;
pub mod model;
pub mod presentation;
pub mod registry;
pub mod services;
pub mod session;
