mod common;

use common::fixtures::*;
use docpack::adapters::archive::{decode, encode};
use docpack::domain::archive::ArchiveContent;
use docpack::domain::edits::{SymbolEdit, apply_edits};

#[test]
fn test_current_edit_survives_reencode() {
    let original = decode(&current_archive_bytes()).unwrap();
    let mut edited = original.clone();

    let report = apply_edits(
        &mut edited,
        &[
            SymbolEdit {
                symbol_id: "fn:load".into(),
                purpose: Some("Reads docpack.toml.".into()),
                explanation: Some(String::new()),
                ..Default::default()
            },
            SymbolEdit {
                symbol_id: "fn:gone".into(),
                purpose: Some("Nothing".into()),
                ..Default::default()
            },
        ],
    );
    assert_eq!(report.applied, 1);
    assert_eq!(report.unmatched, vec!["fn:gone".to_string()]);

    let reloaded = decode(&encode(&edited).unwrap()).unwrap();
    let (ArchiveContent::Current(before), ArchiveContent::Current(after)) =
        (&original.content, &reloaded.content)
    else {
        panic!("expected current content");
    };

    let doc = &after.documentation.symbol_summaries["fn:load"];
    assert_eq!(doc.purpose, "Reads docpack.toml.");
    assert_eq!(doc.explanation, "Reads and parses TOML.");
    assert_eq!(doc.usage_hints.as_deref(), Some("Call once at startup."));

    assert_eq!(after.graph, before.graph);
    assert_eq!(after.metadata, before.metadata);
    assert_eq!(
        after.documentation.module_overviews,
        before.documentation.module_overviews
    );
}

#[test]
fn test_legacy_edit_rewrites_symbol_and_doc() {
    let mut archive = decode(&legacy_archive_bytes()).unwrap();
    let report = apply_edits(
        &mut archive,
        &[SymbolEdit {
            symbol_id: "blog::render".into(),
            purpose: Some("Renders markdown.".into()),
            signature: Some("pub fn render(post: &Post, theme: &Theme) -> String".into()),
            notes: Some(vec![]),
            ..Default::default()
        }],
    );
    assert_eq!(report.applied, 1);
    assert!(report.unmatched.is_empty());

    let reloaded = decode(&encode(&archive).unwrap()).unwrap();
    let ArchiveContent::Legacy(legacy) = &reloaded.content else {
        panic!("expected legacy content");
    };
    assert_eq!(
        legacy.symbols[0].signature.as_deref(),
        Some("pub fn render(post: &Post, theme: &Theme) -> String")
    );
    let doc = &legacy.docs["doc_1"];
    assert_eq!(doc.summary, "Renders markdown.");
    assert_eq!(doc.description, "Applies the template to the post body.");
    assert!(doc.notes.is_empty());
    assert_eq!(doc.parameters[0].name, "post");
    assert_eq!(legacy.symbols[1].signature.as_deref(), Some("pub struct Post"));
}

#[test]
fn test_edits_parse_from_json() {
    let edits: Vec<SymbolEdit> = serde_json::from_str(
        r#"[{"symbol_id": "fn:load", "purpose": "Loads config."},
            {"symbol_id": "blog::render", "parameters": [{"name": "post", "type": "&Post"}]}]"#,
    )
    .unwrap();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[0].purpose.as_deref(), Some("Loads config."));
    assert_eq!(edits[1].parameters.as_ref().unwrap()[0].param_type, "&Post");
}
