#![no_main]

//! Fuzz target for a whole transform pass over one in-memory document.
//!
//! Builtin strategies run against arbitrary documents and locations. The pass must not panic,
//! must leave the ledger alone, and an unchanged document must serialize to its input.

use libfuzzer_sys::fuzz_target;
use tomlfix_core::adapters::InMemoryDocumentStore;
use tomlfix_core::{TransformSettings, Transformer};
use tomlfix_fixers::FixerRegistry;
use tomlfix_types::{DocumentStatus, FixPayload, Match, StringStyle, TomlPath};

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    toml_content: Vec<u8>,
    matches: Vec<FuzzMatch>,
}

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzMatch {
    rule: Rule,
    line: Option<u8>,
    column: Option<u8>,
    path: Vec<String>,
    payload: Option<Payload>,
}

#[derive(Debug, arbitrary::Arbitrary)]
enum Rule {
    StringStyle,
    Truthy,
    KeyCase,
    SortedKeys,
    DeprecatedKey,
    WorkspaceResolver,
    Edition,
    Unknown,
}

#[derive(Debug, arbitrary::Arbitrary)]
enum Payload {
    Set(String),
    Remove,
    Rename(String),
    Literal,
}

impl Rule {
    fn id(&self) -> &'static str {
        match self {
            Rule::StringStyle => "toml.string-style",
            Rule::Truthy => "toml.truthy",
            Rule::KeyCase => "toml.key-case",
            Rule::SortedKeys => "toml.sorted-keys",
            Rule::DeprecatedKey => "toml.deprecated-key",
            Rule::WorkspaceResolver => "cargo.workspace-resolver",
            Rule::Edition => "cargo.edition",
            Rule::Unknown => "fuzz.unknown",
        }
    }
}

fn to_match(m: FuzzMatch) -> Match {
    let mut out = Match::new("fuzz.toml", m.rule.id());
    if let Some(line) = m.line {
        out = out.with_line(u64::from(line));
    }
    if let Some(column) = m.column {
        out = out.with_column(u64::from(column));
    }
    if !m.path.is_empty() {
        out = out.with_path(TomlPath::from_keys(m.path));
    }
    if let Some(payload) = m.payload {
        out = out.with_fix(match payload {
            Payload::Set(v) => FixPayload::Set {
                value: serde_json::Value::String(v),
            },
            Payload::Remove => FixPayload::Remove,
            Payload::Rename(to) => FixPayload::Rename { to },
            Payload::Literal => FixPayload::Restyle {
                style: StringStyle::Literal,
            },
        });
    }
    out
}

fuzz_target!(|input: FuzzInput| {
    let Ok(toml_str) = std::str::from_utf8(&input.toml_content) else {
        return;
    };
    let matches: Vec<Match> = input.matches.into_iter().take(32).map(to_match).collect();
    let before = matches.clone();

    let store = InMemoryDocumentStore::with_documents([("fuzz.toml", toml_str)]);
    let registry = FixerRegistry::builtin();
    let settings = TransformSettings {
        jobs: 1,
        dry_run: false,
        ..TransformSettings::default()
    };
    let outcome = Transformer::new(&registry, &store, settings)
        .run(&matches)
        .expect("in-memory store is always reachable");

    assert_eq!(matches, before);
    let after = store.get(&"fuzz.toml".into()).expect("document still present");
    for result in &outcome.report.results {
        if result.status != DocumentStatus::Changed {
            assert_eq!(after, toml_str);
        } else {
            assert!(after.parse::<tomlfix_doc::toml_edit::DocumentMut>().is_ok());
        }
    }
});
