pub mod common;
pub mod space_time_a_star;
pub mod state;
