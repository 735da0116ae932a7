pub mod health;
pub mod records;
pub mod summary;

pub use health::{health_check, home, metrics, readiness_check};
pub use records::retrieve;
pub use summary::generate_summary;
