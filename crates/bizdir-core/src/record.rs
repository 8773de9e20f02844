//! Directory entry types.
//!
//! A [`BusinessRecord`] is an id plus a flat set of [`BusinessFields`]. Field
//! names follow the stored document (`zipCode`, `dateAdded`, `reviews_count`,
//! `owner_ethnicity`); anything the document carries that is not modelled here,
//! including form spellings such as `imageUrl` or `minorityType`, lands in
//! [`BusinessFields::extra`] and is written back untouched.
//!
//! A record decoded from the document remembers the exact object it came
//! from. Until its id or fields change it serializes back to that object, key
//! order and spelling included, so rewriting the whole document leaves
//! untouched records byte-for-byte the same.

use std::fmt;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::id::BusinessId;

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Approved,
    Pending,
    Rejected,
}

/// Everything about a business except its id.
///
/// This is also the shape of the `businessData` payload accepted on create
/// and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, rename = "zipCode", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u32>,
    /// Ownership tag shown on the listing card (e.g. "Black-owned").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, rename = "dateAdded", skip_serializing_if = "Option::is_none")]
    pub date_added: Option<NaiveDate>,
    /// Fields not modelled above, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BusinessFields {
    /// Creates a payload with just the two required fields set.
    pub fn named(name: impl Into<String>, category: impl Into<String>) -> Self {
        BusinessFields {
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    /// Checks that the fields every listing needs are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation {
                reason: "name is required".to_string(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(CoreError::Validation {
                reason: "category is required".to_string(),
            });
        }
        Ok(())
    }

    /// Drops any `id` smuggled in through the payload; the record's id is
    /// always owned by the collection.
    pub(crate) fn without_embedded_id(mut self) -> Self {
        self.extra.shift_remove("id");
        self
    }
}

/// One directory entry.
#[derive(Clone)]
pub struct BusinessRecord {
    pub id: BusinessId,
    pub fields: BusinessFields,
    stored: Option<Box<StoredForm>>,
}

/// The object a record was decoded from, and the typed view of it at the
/// time, used to tell whether the record has been edited since.
#[derive(Clone)]
struct StoredForm {
    object: Map<String, Value>,
    id: BusinessId,
    fields: BusinessFields,
}

#[derive(Serialize)]
struct RecordView<'a> {
    id: BusinessId,
    #[serde(flatten)]
    fields: &'a BusinessFields,
}

#[derive(Deserialize)]
struct RecordParts {
    id: BusinessId,
    #[serde(flatten)]
    fields: BusinessFields,
}

impl BusinessRecord {
    pub fn new(id: BusinessId, fields: BusinessFields) -> Self {
        BusinessRecord {
            id,
            fields: fields.without_embedded_id(),
            stored: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    /// The stored object, if this record is unchanged since it was decoded.
    fn pristine_object(&self) -> Option<&Map<String, Value>> {
        self.stored
            .as_deref()
            .filter(|stored| stored.id == self.id && stored.fields == self.fields)
            .map(|stored| &stored.object)
    }
}

impl PartialEq for BusinessRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fields == other.fields
    }
}

impl fmt::Debug for BusinessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessRecord")
            .field("id", &self.id)
            .field("fields", &self.fields)
            .finish()
    }
}

impl Serialize for BusinessRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.pristine_object() {
            Some(object) => object.serialize(serializer),
            None => RecordView {
                id: self.id,
                fields: &self.fields,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BusinessRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        let parts: RecordParts =
            serde_json::from_value(Value::Object(object.clone())).map_err(D::Error::custom)?;
        Ok(BusinessRecord {
            id: parts.id,
            fields: parts.fields.clone(),
            stored: Some(Box::new(StoredForm {
                object,
                id: parts.id,
                fields: parts.fields,
            })),
        })
    }
}
