//! Terminal presentation of computed results

pub mod overview;
pub mod setup;
pub mod ui;
pub mod weights;
