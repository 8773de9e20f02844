//! Request/response types for `/businesses`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bizdir_core::{BusinessCollection, BusinessFields, BusinessId, BusinessRecord};
use bizdir_storage::VersionToken;

use crate::error::ApiError;

/// Body shared by `POST`, `PUT` and `DELETE`.
///
/// Every field is optional at this layer so the admin gate can run before
/// the payload itself is judged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationBody {
    #[serde(default)]
    pub admin_auth: Option<Value>,
    #[serde(default)]
    pub business_id: Option<Value>,
    #[serde(default)]
    pub business_data: Option<Value>,
}

impl MutationBody {
    /// The admin credential. A non-string value counts as no credential.
    pub fn credential(&self) -> Option<&str> {
        self.admin_auth.as_ref().and_then(Value::as_str)
    }

    /// The target record id. Accepts a JSON number or a numeric string.
    pub fn business_id(&self) -> Result<BusinessId, ApiError> {
        let parsed = match &self.business_id {
            None | Some(Value::Null) => {
                return Err(ApiError::BadRequest("businessId is required".to_string()))
            }
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(_) => None,
        };
        parsed
            .filter(|&id| id > 0)
            .map(BusinessId)
            .ok_or_else(|| ApiError::BadRequest("businessId must be a positive integer".to_string()))
    }

    /// The submitted record fields.
    pub fn business_data(&self) -> Result<BusinessFields, ApiError> {
        match &self.business_data {
            None | Some(Value::Null) => {
                Err(ApiError::BadRequest("businessData is required".to_string()))
            }
            Some(raw) => serde_json::from_value(raw.clone())
                .map_err(|e| ApiError::BadRequest(format!("malformed businessData: {}", e))),
        }
    }
}

/// Response for `GET /businesses`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListResponse {
    pub success: bool,
    pub businesses: BusinessCollection,
    /// Version token of the document as read.
    pub token: VersionToken,
    pub last_updated: DateTime<Utc>,
}

/// Response for `POST` and `PUT`.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessSavedResponse {
    pub success: bool,
    pub message: String,
    pub business: BusinessRecord,
}

/// Response for `DELETE`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDeletedResponse {
    pub success: bool,
    pub message: String,
    pub deleted_business: BusinessRecord,
}
