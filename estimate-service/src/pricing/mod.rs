pub mod engine;
pub mod keywords;
pub mod rate_table;

pub use engine::EstimateEngine;
pub use rate_table::{compute_rule_fee, RuleQuote};
