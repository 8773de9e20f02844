//! The persisted document: an ordered list of business records.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::BusinessId;
use crate::record::BusinessRecord;

/// All directory entries, in document order.
///
/// Serializes as a bare JSON array, which is exactly what the stored document
/// contains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessCollection {
    records: Vec<BusinessRecord>,
}

impl BusinessCollection {
    pub fn new(records: Vec<BusinessRecord>) -> Self {
        BusinessCollection { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BusinessRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BusinessRecord> {
        self.records.iter()
    }

    /// Ids in document order.
    pub fn ids(&self) -> Vec<BusinessId> {
        self.records.iter().map(|r| r.id).collect()
    }

    pub fn get(&self, id: BusinessId) -> Option<&BusinessRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: BusinessId) -> bool {
        self.get(id).is_some()
    }

    /// Largest id in use, or 0 for an empty collection.
    pub fn max_id(&self) -> BusinessId {
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(BusinessId(0))
    }

    /// The id the next created record receives.
    ///
    /// Fails once the largest id in use is `u64::MAX`.
    pub fn next_id(&self) -> Result<BusinessId, CoreError> {
        let max = self.max_id();
        max.next().ok_or(CoreError::IdSpaceExhausted { max })
    }

    pub fn into_records(self) -> Vec<BusinessRecord> {
        self.records
    }

    pub(crate) fn position(&self, id: BusinessId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<BusinessRecord> {
        &mut self.records
    }
}

impl From<Vec<BusinessRecord>> for BusinessCollection {
    fn from(records: Vec<BusinessRecord>) -> Self {
        BusinessCollection::new(records)
    }
}

impl<'a> IntoIterator for &'a BusinessCollection {
    type Item = &'a BusinessRecord;
    type IntoIter = std::slice::Iter<'a, BusinessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BusinessFields;

    fn collection_with_ids(ids: &[u64]) -> BusinessCollection {
        ids.iter()
            .map(|&id| BusinessRecord::new(BusinessId(id), BusinessFields::named("b", "c")))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn next_id_on_empty_is_one() {
        assert_eq!(BusinessCollection::default().next_id(), Ok(BusinessId(1)));
    }

    #[test]
    fn next_id_follows_max_not_len() {
        let collection = collection_with_ids(&[4, 1, 9]);
        assert_eq!(collection.max_id(), BusinessId(9));
        assert_eq!(collection.next_id(), Ok(BusinessId(10)));
    }

    #[test]
    fn next_id_fails_at_top_of_id_space() {
        let collection = collection_with_ids(&[3, u64::MAX]);
        assert_eq!(
            collection.next_id(),
            Err(CoreError::IdSpaceExhausted {
                max: BusinessId(u64::MAX)
            })
        );
    }

    #[test]
    fn serializes_as_array() {
        let collection = collection_with_ids(&[1]);
        let value = serde_json::to_value(&collection).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["id"], 1);

        let back: BusinessCollection = serde_json::from_value(value).unwrap();
        assert_eq!(back, collection);
    }

    #[test]
    fn lookup_by_id() {
        let collection = collection_with_ids(&[1, 2, 3]);
        assert!(collection.contains(BusinessId(2)));
        assert!(!collection.contains(BusinessId(4)));
        assert_eq!(collection.ids(), vec![BusinessId(1), BusinessId(2), BusinessId(3)]);
    }
}
