mod insights;
mod summary;
pub mod views;

pub use summary::{grade_distribution, vessel_views};

pub(crate) use insights::generate_insights;
