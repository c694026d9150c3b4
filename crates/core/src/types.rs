/// Identifiers are opaque strings minted by the persistence layer.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Untyped key/value payload attached to a QR code.
pub type Payload = serde_json::Map<String, serde_json::Value>;
