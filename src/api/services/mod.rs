pub mod analytics;
pub mod types;

pub use analytics::{AnalyticsService, analytics_routes};
pub use types::{EndpointUsage, RelayFailure, RelayReceipt};
