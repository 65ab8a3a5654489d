#![no_main]

//! Fuzz target for document loading.
//!
//! Any input that parses must serialize back to exactly the same bytes, and a checkpoint taken
//! before an edit must restore them.

use libfuzzer_sys::fuzz_target;
use tomlfix_doc::Document;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut doc) = Document::load("fuzz.toml".into(), s) else {
        return;
    };
    assert_eq!(doc.serialize(), s);

    let checkpoint = doc.checkpoint();
    let root = doc.root();
    let _ = doc.sort_keys(&root);
    doc.restore(checkpoint);
    assert_eq!(doc.serialize(), s);
});
