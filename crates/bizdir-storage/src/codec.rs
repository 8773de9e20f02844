//! Document encoding.
//!
//! The collection is stored as pretty-printed JSON (two-space indent) and
//! transported as standard base64. GitHub wraps base64 content at 60 columns,
//! so decoding ignores ASCII whitespace.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use bizdir_core::BusinessCollection;

use crate::error::StorageError;

/// Serializes a collection to the bytes stored in the repository.
pub fn to_document_bytes(collection: &BusinessCollection) -> Result<Vec<u8>, StorageError> {
    let mut bytes = serde_json::to_vec_pretty(collection)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parses stored document bytes.
pub fn from_document_bytes(bytes: &[u8]) -> Result<BusinessCollection, StorageError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| StorageError::decode(format!("document is not UTF-8: {}", e)))?;
    serde_json::from_str(text)
        .map_err(|e| StorageError::decode(format!("document is not a business list: {}", e)))
}

/// Encodes a collection into the base64 payload sent to the remote.
pub fn encode_document(collection: &BusinessCollection) -> Result<String, StorageError> {
    Ok(STANDARD.encode(to_document_bytes(collection)?))
}

/// Decodes base64 content into raw document bytes.
pub fn decode_content(content: &str) -> Result<Vec<u8>, StorageError> {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StorageError::decode(format!("content is not valid base64: {}", e)))
}

/// Decodes a base64 payload into a collection.
pub fn decode_document(content: &str) -> Result<BusinessCollection, StorageError> {
    from_document_bytes(&decode_content(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdir_core::{BusinessFields, BusinessId, BusinessRecord};

    #[test]
    fn decodes_line_wrapped_content() {
        let collection = BusinessCollection::new(vec![BusinessRecord::new(
            BusinessId(1),
            BusinessFields::named("Soul Food Kitchen", "Restaurant"),
        )]);
        let encoded = encode_document(&collection).unwrap();

        let wrapped = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join("\n");

        assert_eq!(decode_document(&wrapped).unwrap(), collection);
    }

    #[test]
    fn stored_json_is_pretty_printed() {
        let bytes = to_document_bytes(&BusinessCollection::default()).unwrap();
        assert_eq!(bytes, b"[]\n");

        let collection = BusinessCollection::new(vec![BusinessRecord::new(
            BusinessId(3),
            BusinessFields::named("Abuela's Market", "Grocery"),
        )]);
        let text = String::from_utf8(to_document_bytes(&collection).unwrap()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 3,"));
    }

    #[test]
    fn stored_document_is_rewritten_unchanged() {
        let stored = concat!(
            "[\n",
            "  {\n",
            "    \"id\": 1,\n",
            "    \"name\": \"Harmony Hair Salon\",\n",
            "    \"minorityType\": \"Black-owned\",\n",
            "    \"category\": \"Beauty\",\n",
            "    \"imageUrl\": \"https://example.com/salon.jpg\",\n",
            "    \"zip_code\": \"13202\"\n",
            "  }\n",
            "]\n"
        );

        let collection = from_document_bytes(stored.as_bytes()).unwrap();
        assert_eq!(to_document_bytes(&collection).unwrap(), stored.as_bytes());
    }

    #[test]
    fn rejects_bad_base64() {
        let err = decode_document("!!not base64!!").unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
    }

    #[test]
    fn rejects_wrong_schema() {
        let content = STANDARD.encode(br#"{"businesses": []}"#);
        let err = decode_document(&content).unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
    }
}
