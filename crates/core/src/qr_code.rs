//! QR code records and creation-request validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Payload, Timestamp};

/// Path segment under the public base URL that resolves stored codes.
pub const QR_CODE_PATH: &str = "qrcode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QrCodeType {
    /// Content is fixed at issuance.
    Stable,
    /// Content points at the service so the target can change later.
    Dynamic,
}

impl QrCodeType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "STABLE" => Some(Self::Stable),
            "DYNAMIC" => Some(Self::Dynamic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QrCodeStatus {
    #[default]
    Active,
    Inactive,
}

/// Request to issue a new code against a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQrCode {
    /// `STABLE` or `DYNAMIC`; kept as text so bad values produce a
    /// validation message rather than a decode error.
    #[serde(rename = "type")]
    pub qr_type: String,
    pub template_id: EntityId,
    pub third_party_ref: String,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub deep_link_url: Option<String>,
    #[serde(default)]
    pub data: Payload,
}

/// An issued QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub qr_type: QrCodeType,
    pub template_id: EntityId,
    pub client_app_id: EntityId,
    pub third_party_ref: String,
    pub status: QrCodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_link_url: Option<String>,
    pub data: Payload,
    pub scan_count: u64,
    pub created_at: Timestamp,
}

/// Check request-level rules. Payload-vs-template checks happen later.
pub fn validate_create(
    req: &CreateQrCode,
    client_app_id: &str,
    now: Timestamp,
) -> Result<QrCodeType, CoreError> {
    let qr_type = QrCodeType::from_name(&req.qr_type).ok_or_else(|| {
        CoreError::Validation("invalid type: must be STABLE or DYNAMIC".to_string())
    })?;
    if req.template_id.trim().is_empty() {
        return Err(CoreError::Validation("templateId is required".to_string()));
    }
    if client_app_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "clientAppId is required in the header".to_string(),
        ));
    }
    if req.third_party_ref.trim().is_empty() {
        return Err(CoreError::Validation("thirdPartyRef is required".to_string()));
    }
    if matches!(req.expires_at, Some(at) if at < now) {
        return Err(CoreError::Validation(
            "expiresAt cannot be in the past".to_string(),
        ));
    }
    if req.data.keys().any(|k| k.is_empty()) {
        return Err(CoreError::Validation("data contains an empty key".to_string()));
    }
    Ok(qr_type)
}

impl QrCode {
    /// Build the record for a validated request.
    pub fn issue(
        id: EntityId,
        qr_type: QrCodeType,
        client_app_id: &str,
        req: CreateQrCode,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            qr_type,
            template_id: req.template_id,
            client_app_id: client_app_id.to_string(),
            third_party_ref: req.third_party_ref,
            status: QrCodeStatus::Active,
            expires_at: req.expires_at,
            deep_link_url: req.deep_link_url.filter(|u| !u.trim().is_empty()),
            data: req.data,
            scan_count: 0,
            created_at: now,
        }
    }

    /// Text encoded into the symbol: the deep link when set, otherwise the
    /// service's resolver URL for this code.
    pub fn content(&self, public_base_url: &str) -> String {
        match &self.deep_link_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/{QR_CODE_PATH}/{}",
                public_base_url.trim_end_matches('/'),
                self.id
            ),
        }
    }

    pub fn ensure_owned_by(&self, client_app_id: &str) -> Result<(), CoreError> {
        if client_app_id.is_empty() {
            return Err(CoreError::Validation(
                "clientAppId is required in the header".to_string(),
            ));
        }
        if self.client_app_id == client_app_id {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "You do not have permission to access this QR code".to_string(),
            ))
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}
