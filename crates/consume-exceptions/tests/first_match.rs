//! First-match-wins classification properties

use consume_exceptions::{
    Classification, EofException, ExceptionEntry, ExceptionMapper, ExceptionTable,
    TransactionException,
};
use proptest::prelude::*;

fn overlapping_table() -> ExceptionTable {
    ExceptionTable::new(
        "overlap",
        vec![
            ExceptionEntry::new(
                TransactionException::Type3TxMaxBlobGasAllowanceExceeded,
                "would exceed maximum allowance",
            ),
            ExceptionEntry::new(
                TransactionException::Type3TxBlobCountExceeded,
                "exceed maximum allowance",
            ),
            ExceptionEntry::new(
                EofException::MissingTerminator,
                "err: header_terminator_missing",
            ),
            ExceptionEntry::new(
                EofException::MissingHeadersTerminator,
                "err: section_headers_not_terminated",
            ),
            ExceptionEntry::new(TransactionException::IntrinsicGasTooLow, "intrinsic gas too low"),
        ],
    )
}

/// Expected kind for `text` found by brute force over the table
fn reference_classify(table: &ExceptionTable, text: &str) -> Classification {
    for entry in table.entries() {
        if text.contains(entry.pattern.as_ref()) {
            return Classification::Mapped(entry.kind);
        }
    }
    Classification::Unmapped
}

#[test]
fn test_each_entry_reachable_by_its_own_pattern() {
    let table = overlapping_table();
    let mapper = ExceptionMapper::new(table.clone());
    for (i, entry) in table.entries().iter().enumerate() {
        let earlier_hit = table.entries()[..i]
            .iter()
            .any(|prev| entry.pattern.contains(prev.pattern.as_ref()));
        if earlier_hit {
            continue;
        }
        assert_eq!(
            mapper.classify(&entry.pattern),
            Classification::Mapped(entry.kind),
            "pattern {:?}",
            entry.pattern
        );
    }
}

#[test]
fn test_reordering_changes_outcome() {
    let mut table = overlapping_table();
    let broad = table.entries()[1].clone();
    table.prepend(broad);
    let mapper = ExceptionMapper::new(table);
    assert_eq!(
        mapper.classify("blob gas 786432 would exceed maximum allowance 393216"),
        Classification::Mapped(TransactionException::Type3TxBlobCountExceeded.into())
    );
}

proptest! {
    #[test]
    fn prop_surrounding_text_does_not_change_kind(
        idx in 0usize..5,
        prefix in "[A-Z0-9 ]{0,24}",
        suffix in "[A-Z0-9 ]{0,24}",
    ) {
        let table = overlapping_table();
        let mapper = ExceptionMapper::new(table.clone());
        let text = format!("{}{}{}", prefix, table.entries()[idx].pattern, suffix);
        prop_assert_eq!(mapper.classify(&text), reference_classify(&table, &text));
        prop_assert!(mapper.classify(&text).is_mapped());
    }

    #[test]
    fn prop_classification_is_deterministic(text in ".{0,64}") {
        let mapper = ExceptionMapper::new(overlapping_table());
        prop_assert_eq!(mapper.classify(&text), mapper.classify(&text));
    }
}
