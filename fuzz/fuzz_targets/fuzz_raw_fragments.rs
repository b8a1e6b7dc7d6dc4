#![no_main]

use libfuzzer_sys::fuzz_target;
use preparable::{Classifier, Literal, Relation, SortDirection};

// Arbitrary text in raw fragments and string literals must never panic the
// builder, the renderer, or the classifier, and a non-empty raw fragment
// must always produce an unpreparable verdict.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.len() > 10_000 {
            return;
        }

        let classifier = Classifier::new();

        if let Ok(relation) = Relation::table("posts").filter_raw(text) {
            let verdict = classifier.classify(&relation);
            assert!(!verdict.preparable);
        }

        if let Ok(relation) = Relation::table("posts").order_by_raw(text, SortDirection::Asc) {
            assert!(!classifier.classify(&relation).preparable);
        }

        // String literals bind, so any text stays preparable.
        let relation =
            Relation::table(text.to_string()).filter_eq("title", Literal::String(text.to_string()));
        let verdict = classifier.classify(&relation);
        assert!(verdict.preparable);
    }
});
