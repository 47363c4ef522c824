//! The simulated dashboard page: document geometry, sample data and the
//! style store the choreography writes into.

pub mod data;
pub mod layout;
pub mod styles;
