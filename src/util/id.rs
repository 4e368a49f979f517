//! ID utilities.

use ulid::Ulid;

/// New party id: a lowercase ULID, safe to use in URLs and storage keys.
pub fn new_party_id() -> String {
    Ulid::new().to_string().to_lowercase()
}
