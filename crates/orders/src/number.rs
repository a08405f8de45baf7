use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a unique order number: `SO-YYYYMMDD-XXXXXXXX`.
///
/// The suffix is taken from the random tail of a fresh UUID, so numbers are
/// unique without any process-global counter.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let hex = Uuid::now_v7().simple().to_string();
    let suffix = hex[hex.len() - 8..].to_uppercase();
    format!("SO-{}-{}", now.format("%Y%m%d"), suffix)
}
