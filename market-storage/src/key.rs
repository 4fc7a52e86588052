/// Derive the canonical storage key for an asset or currency identity.
///
/// # Arguments
/// * `primary_id` - Asset symbol or currency code (e.g., "btc")
/// * `secondary_id` - Sub-unit/token identifier, empty for the base asset
///
/// # Returns
/// `UPPER(primary_id)` or `UPPER(primary_id + "_" + secondary_id)`
pub fn derive_key(primary_id: &str, secondary_id: &str) -> String {
    if secondary_id.is_empty() {
        return primary_id.to_uppercase();
    }
    format!("{}_{}", primary_id, secondary_id).to_uppercase()
}
