pub mod distance_profile;
pub mod error;
pub mod matrix_profile;
pub mod order;
