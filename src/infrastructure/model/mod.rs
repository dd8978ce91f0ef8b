//! Model implementations

mod linear;

pub use linear::{LinearModel, LinearModelSpec, DEFAULT_OUTPUT_COLUMN, PREDICT_FUNCTION};
