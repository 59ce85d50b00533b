pub mod admin_recipient;
pub mod estimate;

pub use admin_recipient::AdminRecipient;
pub use estimate::{Contact, EstimateRecord, FeeBreakdown, ShipmentRequest, Urgency};
