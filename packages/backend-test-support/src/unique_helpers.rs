//! Unique fixture values so rows created by different tests never collide.

use uuid::Uuid;

/// `{prefix}-{8 hex chars}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("squad");
/// let b = unique_str("squad");
/// assert_ne!(a, b);
/// assert!(a.starts_with("squad-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &id[..8])
}

/// A unique address under the reserved `example.test` domain.
pub fn unique_email(prefix: &str) -> String {
    format!("{}@example.test", unique_str(prefix))
}
