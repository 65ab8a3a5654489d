#![no_main]

//! Fuzz target for match ledger JSON parsing.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Should never panic.
    let _ = serde_json::from_str::<tomlfix_types::MatchLedger>(s);
    let _ = serde_json::from_str::<tomlfix_types::Match>(s);
    let _ = serde_json::from_str::<tomlfix_types::TomlPath>(s);
    let _ = serde_json::from_str::<tomlfix_types::FixPayload>(s);

    // A ledger that parses must survive a serialize round trip.
    if let Ok(ledger) = serde_json::from_str::<tomlfix_types::MatchLedger>(s) {
        let json = serde_json::to_string(&ledger).expect("serialize ledger");
        let again: tomlfix_types::MatchLedger =
            serde_json::from_str(&json).expect("reparse ledger");
        assert_eq!(again.matches, ledger.matches);
    }
});
