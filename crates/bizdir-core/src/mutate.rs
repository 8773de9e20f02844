//! Pure next-state functions for the business collection.
//!
//! Every function takes the current collection by reference and returns a new
//! one together with the record that was created, replaced or removed. Nothing
//! here performs I/O; the creation date is passed in by the caller.
//!
//! Length invariants:
//! - [`create`]: `len + 1`
//! - [`update`]: `len` unchanged
//! - [`delete`]: `len - 1`

use chrono::NaiveDate;

use crate::collection::BusinessCollection;
use crate::error::CoreError;
use crate::id::BusinessId;
use crate::record::{BusinessFields, BusinessRecord, RecordStatus};

/// A requested change to the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create { fields: BusinessFields },
    Update { id: BusinessId, fields: BusinessFields },
    Delete { id: BusinessId },
}

impl Mutation {
    /// Short verb used in commit messages and logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Mutation::Create { .. } => "Add",
            Mutation::Update { .. } => "Update",
            Mutation::Delete { .. } => "Delete",
        }
    }

    /// Commit message recorded alongside the new document.
    pub fn commit_message(&self, record: &BusinessRecord) -> String {
        format!("{} business: {}", self.verb(), record.name())
    }
}

/// Result of applying a [`Mutation`].
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// The collection to persist.
    pub collection: BusinessCollection,
    /// The created or updated record, or the removed one for deletes.
    pub record: BusinessRecord,
}

/// Dispatches `mutation` to [`create`], [`update`] or [`delete`].
pub fn apply(
    collection: &BusinessCollection,
    mutation: Mutation,
    today: NaiveDate,
) -> Result<MutationOutcome, CoreError> {
    match mutation {
        Mutation::Create { fields } => create(collection, fields, today),
        Mutation::Update { id, fields } => update(collection, id, fields),
        Mutation::Delete { id } => delete(collection, id),
    }
}

/// Appends a new approved, verified record with the next free id.
pub fn create(
    collection: &BusinessCollection,
    fields: BusinessFields,
    today: NaiveDate,
) -> Result<MutationOutcome, CoreError> {
    fields.validate()?;

    let mut fields = fields;
    fields.status = Some(RecordStatus::Approved);
    fields.verified = Some(true);
    fields.date_added = Some(today);

    let id = collection.next_id()?;
    let record = BusinessRecord::new(id, fields);
    let mut next = collection.clone();
    next.records_mut().push(record.clone());

    Ok(MutationOutcome {
        collection: next,
        record,
    })
}

/// Replaces the fields of record `id` with `fields`, keeping its id and
/// position. Any id inside `fields` is ignored.
pub fn update(
    collection: &BusinessCollection,
    id: BusinessId,
    fields: BusinessFields,
) -> Result<MutationOutcome, CoreError> {
    let index = collection
        .position(id)
        .ok_or(CoreError::NotFound { id })?;
    fields.validate()?;

    let record = BusinessRecord::new(id, fields);
    let mut next = collection.clone();
    next.records_mut()[index] = record.clone();

    Ok(MutationOutcome {
        collection: next,
        record,
    })
}

/// Removes record `id`, returning it for confirmation messages.
pub fn delete(
    collection: &BusinessCollection,
    id: BusinessId,
) -> Result<MutationOutcome, CoreError> {
    let index = collection
        .position(id)
        .ok_or(CoreError::NotFound { id })?;

    let mut next = collection.clone();
    let record = next.records_mut().remove(index);

    Ok(MutationOutcome {
        collection: next,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn collection_with_ids(ids: &[u64]) -> BusinessCollection {
        ids.iter()
            .map(|&id| {
                BusinessRecord::new(
                    BusinessId(id),
                    BusinessFields::named(format!("Business {id}"), "Retail"),
                )
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn create_on_empty_assigns_id_one() {
        let fields = BusinessFields::named("Soul Food Kitchen", "Restaurant");
        let outcome = create(&BusinessCollection::default(), fields, today()).unwrap();

        assert_eq!(outcome.record.id, BusinessId(1));
        assert_eq!(outcome.collection.len(), 1);
        assert_eq!(outcome.record.fields.status, Some(RecordStatus::Approved));
        assert_eq!(outcome.record.fields.verified, Some(true));
        assert_eq!(outcome.record.fields.date_added, Some(today()));
    }

    #[test]
    fn create_overrides_submitted_moderation_fields() {
        let mut fields = BusinessFields::named("Shop", "Retail");
        fields.status = Some(RecordStatus::Pending);
        fields.verified = Some(false);

        let outcome = create(&collection_with_ids(&[2, 7]), fields, today()).unwrap();
        assert_eq!(outcome.record.id, BusinessId(8));
        assert_eq!(outcome.record.fields.status, Some(RecordStatus::Approved));
        assert_eq!(outcome.record.fields.verified, Some(true));
    }

    #[test]
    fn create_rejects_missing_name() {
        let original = collection_with_ids(&[1]);
        let err = create(&original, BusinessFields::named("", "Retail"), today()).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(original.len(), 1);
    }

    #[test]
    fn create_after_max_id_is_an_error() {
        let original = collection_with_ids(&[1, u64::MAX]);
        let err = create(&original, BusinessFields::named("Overflow", "Retail"), today())
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::IdSpaceExhausted {
                max: BusinessId(u64::MAX)
            }
        );
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn delete_middle_record() {
        let outcome = delete(&collection_with_ids(&[1, 2, 3]), BusinessId(2)).unwrap();
        assert_eq!(outcome.collection.ids(), vec![BusinessId(1), BusinessId(3)]);
        assert_eq!(outcome.record.id, BusinessId(2));
        assert_eq!(outcome.record.name(), "Business 2");
    }

    #[test]
    fn delete_absent_is_not_found() {
        let original = collection_with_ids(&[1, 2, 3]);
        let err = delete(&original, BusinessId(9)).unwrap_err();
        assert_eq!(err, CoreError::NotFound { id: BusinessId(9) });
        assert_eq!(original.len(), 3);
    }

    #[test]
    fn update_keeps_id_and_position() {
        let mut fields = BusinessFields::named("Renamed", "Services");
        fields
            .extra
            .insert("id".to_string(), serde_json::Value::from(42));

        let outcome = update(&collection_with_ids(&[1, 2, 3]), BusinessId(2), fields).unwrap();
        assert_eq!(outcome.record.id, BusinessId(2));
        assert_eq!(outcome.collection.ids(), vec![BusinessId(1), BusinessId(2), BusinessId(3)]);
        assert_eq!(outcome.collection.records()[1].name(), "Renamed");
        assert!(!outcome.record.fields.extra.contains_key("id"));
    }

    #[test]
    fn update_absent_is_not_found_even_with_bad_payload() {
        let err = update(
            &collection_with_ids(&[1]),
            BusinessId(5),
            BusinessFields::default(),
        )
        .unwrap_err();
        assert_eq!(err, CoreError::NotFound { id: BusinessId(5) });
    }

    #[test]
    fn apply_dispatches_and_builds_commit_message() {
        let mutation = Mutation::Delete { id: BusinessId(1) };
        let outcome = apply(&collection_with_ids(&[1]), mutation.clone(), today()).unwrap();
        assert!(outcome.collection.is_empty());
        assert_eq!(
            mutation.commit_message(&outcome.record),
            "Delete business: Business 1"
        );
    }
}
