//! Per-page record assembly and de-duplication.

use indexmap::IndexMap;

use crate::types::{Provenance, Record, RecordFields};

/// Collects the records of one page.
///
/// Empty field sets are refused. A field set equal to one already pushed is
/// refused too; the first occurrence keeps its position and provenance.
#[derive(Debug)]
pub struct RecordAssembler {
    source_url: String,
    records: IndexMap<RecordFields, Provenance>,
}

impl RecordAssembler {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            records: IndexMap::new(),
        }
    }

    /// Add a record. Returns false if it was empty or a duplicate.
    pub fn push(&mut self, fields: RecordFields, provenance: Provenance) -> bool {
        if fields.is_empty() || self.records.contains_key(&fields) {
            return false;
        }
        self.records.insert(fields, provenance);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The assembled records in first-seen order.
    pub fn finish(self) -> Vec<Record> {
        let source_url = self.source_url;
        self.records
            .into_iter()
            .map(|(fields, provenance)| Record::new(fields, source_url.clone(), provenance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(name: &str) -> RecordFields {
        RecordFields::new(Some(name.to_string()), Some("Lager".into()), None)
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut assembler = RecordAssembler::new("https://brewery.example/menu");
        assert!(assembler.push(fields("Helles"), Provenance::listing(0)));
        assert!(assembler.push(fields("Dunkel"), Provenance::listing(1)));
        assert!(!assembler.push(fields("Helles"), Provenance::listing(2)));
        assert_eq!(assembler.len(), 2);

        let records = assembler.finish();
        assert_eq!(records[0].name.as_deref(), Some("Helles"));
        assert_eq!(records[0].provenance, Provenance::listing(0));
        assert_eq!(records[1].name.as_deref(), Some("Dunkel"));
    }

    #[test]
    fn test_empty_fields_refused() {
        let mut assembler = RecordAssembler::new("u");
        assert!(!assembler.push(RecordFields::default(), Provenance::detail()));
        assert!(assembler.is_empty());
        assert!(assembler.finish().is_empty());
    }

    fn arb_fields() -> impl Strategy<Value = RecordFields> {
        let field = proptest::option::of("[a-c]{1,2}");
        (field.clone(), field.clone(), field)
            .prop_map(|(name, category, magnitude)| RecordFields::new(name, category, magnitude))
    }

    proptest! {
        #[test]
        fn finished_records_are_unique_and_first_seen(batch in proptest::collection::vec(arb_fields(), 0..40)) {
            let mut assembler = RecordAssembler::new("u");
            for (i, fields) in batch.iter().enumerate() {
                assembler.push(fields.clone(), Provenance::listing(i));
            }
            let records = assembler.finish();

            let mut seen = std::collections::HashSet::new();
            for record in &records {
                prop_assert!(seen.insert(record.fields()));
                prop_assert!(!record.fields().is_empty());
                let first = batch.iter().position(|f| *f == record.fields()).unwrap();
                prop_assert_eq!(record.provenance, Provenance::listing(first));
            }
            let distinct: std::collections::HashSet<_> =
                batch.iter().filter(|f| !f.is_empty()).collect();
            prop_assert_eq!(records.len(), distinct.len());
        }
    }

    #[test]
    fn test_same_name_different_fields_are_distinct() {
        let mut assembler = RecordAssembler::new("u");
        assembler.push(fields("Helles"), Provenance::listing(0));
        let other = RecordFields::new(Some("Helles".into()), Some("Lager".into()), Some("5%".into()));
        assert!(assembler.push(other, Provenance::listing(1)));
    }
}
