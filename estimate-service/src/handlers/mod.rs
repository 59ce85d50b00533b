pub mod admin_link;
pub mod estimate;
pub mod health;

pub use admin_link::{finish_link, start_link};
pub use estimate::{recent_estimates, submit_estimate};
pub use health::{health_check, metrics_endpoint, readiness_check};
