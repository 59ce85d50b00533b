//! estimate-service: quote-intake backend for bonded-area relabeling work.
//!
//! Accepts shipment submissions from the public quote form, prices them with
//! the rule table plus a bounded AI adjustment, stores the result in MongoDB,
//! and fans out staff notifications over email and chat memo.

pub mod config;
pub mod handlers;
pub mod models;
pub mod pricing;
pub mod services;
pub mod startup;
