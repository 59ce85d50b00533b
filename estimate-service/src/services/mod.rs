pub mod database;
pub mod metrics;
pub mod notify;
pub mod providers;

pub use database::EstimateDb;
pub use metrics::{
    get_metrics, init_metrics, record_adjustment_call, record_estimate, record_notification,
};
pub use notify::Notifier;
pub use providers::{
    Adjustment, AdjustmentContext, AdjustmentProvider, EmailMessage, EmailProvider,
    KakaoMemoProvider, MemoProvider, MockAdjustmentProvider, MockEmailProvider, MockMemoProvider,
    OpenAiAdjustmentProvider, ProviderError, ProviderResponse, SmtpProvider,
};
