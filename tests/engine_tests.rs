// suggest_core/tests/engine_tests.rs
// End-to-end behavior of the suggestion engine through its public API

use suggest_core::{EngineConfig, HistorySnippetBuilder, KnownCommands, SuggestionEngine};

fn engine_with(corpus: &[&str]) -> SuggestionEngine {
    let engine = SuggestionEngine::default();
    engine.refresh_corpus(corpus);
    engine
}

#[test]
fn test_completes_unseen_parameters() {
    let engine = engine_with(&["New-Thing -Group rg1 -Location eastus"]);
    assert_eq!(
        engine.query("New-Thing -Group rg1").as_deref(),
        Some("New-Thing -Group rg1 -Location eastus")
    );
}

#[test]
fn test_skips_bags_missing_a_typed_flag() {
    let engine = engine_with(&["Get-Thing -Name foo", "Get-Thing -Name foo -Verbose"]);
    assert_eq!(
        engine.query("Get-Thing -Name foo -Verb").as_deref(),
        Some("Get-Thing -Name foo -Verbose")
    );
}

#[test]
fn test_keeps_user_supplied_values() {
    let engine = engine_with(&["Set-Thing -Id 1 -Mode fast"]);
    assert_eq!(
        engine.query("Set-Thing -Id 2").as_deref(),
        Some("Set-Thing -Id 2 -Mode fast")
    );
}

#[test]
fn test_exact_corpus_entry_is_not_suggested() {
    let engine = engine_with(&["Get-Thing -Name foo"]);
    assert_eq!(engine.query("Get-Thing -Name foo"), None);
}

#[test]
fn test_unrelated_history_resets_snippet() {
    let engine = SuggestionEngine::default();
    engine.refresh_known_commands(&["get-thing"]);
    let history = ["Get-Thing -Name foo", "Get-Other -X 1"];
    assert_eq!(
        engine.build_context_snippet(&history, 2),
        "start_of_snippet\nstart_of_snippet"
    );
}

#[test]
fn test_suggestions_extend_the_input() {
    let engine = engine_with(&[
        "New-Thing -Group rg1 -Location eastus -Force",
        "New-Thing -Group rg2 -Tag a -Tag b",
        "Get-Thing -Name foo -Verbose",
        "git commit -m wip -a",
    ]);
    let cases = [
        ("New", Some("New-Thing -Group rg1 -Location eastus -Force")),
        ("New-Thing", Some("New-Thing -Group rg1 -Location eastus -Force")),
        ("New-Thing ", Some("New-Thing -Group rg1 -Location eastus -Force")),
        ("New-Thing -Group x", Some("New-Thing -Group x -Location eastus -Force")),
        ("New-Thing -Tag t -Tag u", Some("New-Thing -Tag t -Tag u -Group rg2")),
        ("Get-Thing -Name bar", Some("Get-Thing -Name bar -Verbose")),
        ("  Get-Thing", Some("  Get-Thing -Name foo -Verbose")),
        ("git commit -m x", Some("git commit -m x -a")),
        ("x | Get-Th", Some("x | Get-Thing -Name foo -Verbose")),
        ("New-Thing  -Group x", None),
        ("New-Thing\t-Group x", None),
        ("Get-Thing -N bar", None),
        ("Get-Thing -Name bar ", Some("Get-Thing -Name bar -Verbose")),
    ];

    for (input, expected) in cases {
        let suggestion = engine.query(input);
        assert_eq!(suggestion.as_deref(), expected, "input {:?}", input);
        if let Some(suggestion) = suggestion {
            assert!(
                suggestion.trim_start().starts_with(input.trim_start()),
                "{:?} does not extend {:?}",
                suggestion,
                input
            );
            assert!(suggestion.chars().count() > input.chars().count());
        }
    }
}

#[test]
fn test_every_candidate_position_is_used_once() {
    let engine = engine_with(&["cmd -Tag a -Tag b -Other x"]);
    let suggestion = engine.query("cmd -Tag 1 -Tag 2").unwrap();
    assert_eq!(suggestion, "cmd -Tag 1 -Tag 2 -Other x");
    assert_eq!(suggestion.matches("-Other").count(), 1);
    assert_eq!(engine.query("cmd -Tag 1 -Tag 2 -T"), None);
}

#[test]
fn test_degenerate_input_never_matches() {
    let engine = engine_with(&["Get-Thing -Name foo"]);
    assert_eq!(engine.query(""), None);
    assert_eq!(engine.query("   "), None);
    assert_eq!(engine.query("Get-Thing -Name foo |"), None);
}

#[test]
fn test_normalization_is_idempotent() {
    let builder = HistorySnippetBuilder::default();
    for line in [
        "New-Thing -Location eastus -Group rg1",
        "Get-Thing -Name foo -Verbose -ErrorAction Stop",
        "Set-Thing -b -A 1 -c x y z",
    ] {
        let once = builder.normalize_line(line);
        assert_eq!(builder.normalize_line(&once), once);
    }
}

#[test]
fn test_sentinel_propagates_to_earlier_slots() {
    let builder = HistorySnippetBuilder::from_config(&EngineConfig {
        history_window: 4,
        ..EngineConfig::default()
    });
    let known = KnownCommands::from_lines(["Get-Thing"]);
    let history = ["Get-Thing -A 1", "Get-Thing -B 2", "unrelated", "Get-Thing -C 3"];
    assert_eq!(
        builder.entries(&history, &known),
        vec![
            "start_of_snippet",
            "start_of_snippet",
            "start_of_snippet",
            "Get-Thing -C ***",
        ]
    );
}

#[test]
fn test_custom_sentinel_and_marker() {
    let config = EngineConfig::from_json(r#"{"sentinel": "<s>", "redaction_marker": "<v>"}"#).unwrap();
    let engine = SuggestionEngine::new(config);
    engine.refresh_known_commands(&["Get-Thing"]);
    assert_eq!(
        engine.context_snippet(&["Get-Thing -Name foo"]),
        "<s>\nGet-Thing -Name <v>"
    );
}
