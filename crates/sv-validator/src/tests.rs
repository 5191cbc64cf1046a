use super::*;
use sv_test_fixtures::load_fixture;

fn validate_fixture(name: &str) -> Result<Storyline, StorylineError> {
    let document = load_fixture(name).expect("fixture should parse");
    validate_storyline(&document, &ValidatorConfig::default())
}

fn assert_rejected(name: &str, expected: &str) -> StorylineError {
    let error = validate_fixture(name).expect_err("fixture should be rejected");
    let rendered = error.to_string();
    assert!(
        rendered.contains(expected),
        "{}: expected `{}` in `{}`",
        name,
        expected,
        rendered
    );
    error
}

#[test]
fn accepts_minimal_storyline() {
    let storyline = validate_fixture("schema/minimal.yml").expect("minimal storyline");
    assert_eq!(storyline.languages, vec!["en".to_string()]);
    assert!(storyline.quests.is_empty());
}

#[test]
fn accepts_complete_storyline() {
    let storyline = validate_fixture("schema/complete.yml").expect("complete storyline");
    assert_eq!(storyline.languages, vec!["en".to_string(), "de".to_string()]);
    assert_eq!(storyline.npcs.len(), 2);
    assert_eq!(storyline.quests.len(), 2);
    assert_eq!(storyline.dialogues.len(), 1);
    assert_eq!(storyline.all_dialogues().len(), 7);

    let cleanup = storyline.quest("cleanup").expect("cleanup quest");
    assert_eq!(
        cleanup.available.as_ref().and_then(|a| a.requirement.clone()),
        Some(Requirement::Single("mayorIdea".to_string()))
    );
    assert_eq!(
        cleanup.stages[0].counter.as_ref().and_then(|c| c.set.clone()),
        Some(FlagKey::complete("cleanup"))
    );

    let flags = settable_flags(&storyline);
    assert!(flags.contains(&FlagKey::active("mayorIdea")));
    assert!(flags.contains(&FlagKey::complete("cleanup")));
    assert!(flags.contains(&FlagKey::Gameplay("ideaCount".to_string())));
}

#[test]
fn validation_is_idempotent() {
    let document = load_fixture("schema/complete.yml").expect("fixture should parse");
    let config = ValidatorConfig::default();
    let first = validate_storyline(&document, &config).expect("first run");
    let second = validate_storyline(&document, &config).expect("second run");
    assert_eq!(first, second);

    let document = load_fixture("references/bad-quest-not-complete.yml").expect("fixture");
    let first = validate_storyline(&document, &config).expect_err("first run");
    let second = validate_storyline(&document, &config).expect_err("second run");
    assert_eq!(first, second);
}

#[test]
fn schema_fixtures_are_rejected() {
    let cases = [
        ("schema/bad-decision.yml", "must be a string or an object"),
        ("schema/bad-prompt.yml", "must be a string or an object"),
        ("schema/bad-npcs.yml", "must be object"),
        ("schema/bad-npc.yml", "must have required property 'spawn'"),
        ("schema/bad-npc-dialogue.yml", "/npcs/mayor/dialogue/0"),
        (
            "schema/bad-npc-no-dialogue.yml",
            "/npcs/mayor: must have name, spawn, and at least one of dialogue or actAs properties.",
        ),
        ("schema/bad-quest.yml", "must have required property 'npc'"),
        (
            "schema/bad-quest-available.yml",
            "/quests/mayorIdea/available/dialogue: must be array",
        ),
        (
            "schema/bad-quest-requirement.yml",
            "must be a quest ID or an array of quest IDs",
        ),
        ("schema/bad-scenery.yml", "must be object"),
        ("schema/bad-scenery-item.yml", "must have required property 'spawn'"),
    ];
    for (name, expected) in cases {
        assert_rejected(name, expected);
    }
}

#[test]
fn text_fixtures_are_rejected() {
    let cases = [
        ("texts/bad-decision-text.yml", "de"),
        ("texts/bad-prompt-text.yml", "es"),
        ("texts/bad-npc-name.yml", "es"),
        ("texts/bad-quest-prompt.yml", "de"),
        ("texts/bad-quest-progressive-prompt.yml", "en"),
        ("texts/bad-dialogue-text.yml", "en"),
        ("texts/bad-dialogue-response-text.yml", "de"),
        ("texts/bad-dialogue-response-then-text.yml", "de"),
    ];
    for (name, language) in cases {
        let error = assert_rejected(name, &format!("Missing text for language '{}'", language));
        assert_eq!(error.kind, ErrorKind::TextCompleteness);
    }
}

#[test]
fn languages_fall_back_to_config() {
    let document = load_fixture("schema/minimal.yml").expect("fixture");
    let config = ValidatorConfig::default().with_languages(vec!["en".to_string(), "fr".to_string()]);
    assert_eq!(resolve_languages(&document, &config), config.languages);
    validate_storyline(&document, &config).expect("literal names cover every language");

    let document = load_fixture("texts/bad-prompt-text.yml").expect("fixture");
    assert_eq!(
        resolve_languages(&document, &config),
        vec!["en".to_string(), "de".to_string(), "es".to_string()]
    );
}

#[test]
fn reference_fixtures_are_rejected() {
    let cases = [
        (
            "references/bad-npc-reference.yml",
            "REF_UNDEFINED_NPC",
            "references undefined npc notTheMayor",
        ),
        (
            "references/bad-quest-requirement.yml",
            "REF_UNDEFINED_QUEST",
            "references undefined quest unexistingQuest",
        ),
        (
            "references/bad-quest-not-activated.yml",
            "REF_QUEST_NEVER_ACTIVATED",
            "is never activated",
        ),
        (
            "references/bad-quest-activates-other.yml",
            "REF_MULTIPLE_ACTIVATIONS",
            "activates another quest (quest.mayorIdea.active)",
        ),
        (
            "references/bad-quest-not-complete.yml",
            "REF_QUEST_NEVER_COMPLETED",
            "Quest mayorIdea sets no flags to complete itself",
        ),
        (
            "references/bad-quest-activated-twice.yml",
            "REF_QUEST_ACTIVATED_TWICE",
            "Quest mayorIdea is activated by more than one response",
        ),
        (
            "references/bad-requirement-cycle.yml",
            "REF_REQUIREMENT_CYCLE",
            "Quest requirement cycle detected: questA -> questB -> questA",
        ),
        (
            "references/bad-undefined-quest-flag.yml",
            "REF_UNDEFINED_QUEST_FLAG",
            "Flag quest.ghostQuest.complete refers to an undefined quest",
        ),
    ];
    for (name, code, expected) in cases {
        let error = assert_rejected(name, expected);
        assert_eq!(error.kind, ErrorKind::Reference);
        assert_eq!(error.code, code);
    }
}

#[test]
fn quest_can_complete_through_counter() {
    let storyline =
        validate_fixture("references/quest-complete-via-counter.yml").expect("counter completion");
    let counter = storyline.all_counters()[0];
    assert_eq!(counter.max, Some(3));
    assert_eq!(counter.expression.flags().len(), 3);
}

#[test]
fn expression_fixtures_are_rejected() {
    let counter = assert_rejected("expressions/bad-stage-counter.yml", "Invalid term: <");
    assert_eq!(counter.kind, ErrorKind::ExpressionSyntax);
    assert_eq!(
        counter.path.as_deref(),
        Some("/quests/mayorIdea/stages/0/counter")
    );

    let cond = assert_rejected("expressions/bad-stage-condition.yml", "unexpected EOF");
    assert_eq!(cond.path.as_deref(), Some("/quests/mayorIdea/stages/0/cond"));

    let response = assert_rejected(
        "expressions/bad-response-condition.yml",
        "Unexpected token: =",
    );
    assert_eq!(response.dialogue.as_deref(), Some("npcs.mayor.dialogue"));
}

#[test]
fn expression_depth_follows_config() {
    let document = serde_json::json!({
        "npcs": {"mayor": {"name": "Mayor", "spawn": {"x": 0, "y": 0}, "actAs": "citizen"}},
        "scenery": {"tree": {"spawn": {"x": 0, "y": 0}, "cond": "((((a))))"}}
    });
    validate_storyline(&document, &ValidatorConfig::default()).expect("default depth");

    let config = ValidatorConfig {
        max_expression_depth: 3,
        ..ValidatorConfig::default()
    };
    let error = validate_storyline(&document, &config).expect_err("too deep");
    assert_eq!(error.code, "EXPR_TOO_DEEP");
    assert_eq!(error.path.as_deref(), Some("/scenery/tree/cond"));
}

fn counter_chain_storyline(terms: usize) -> JsonValue {
    serde_json::json!({
        "npcs": {"mayor": {
            "name": "Mayor",
            "spawn": {"x": 1, "y": 1},
            "dialogue": [{
                "text": "Hello!",
                "responses": {"accept": {"text": "I can help", "set": {"quest.cleanup.active": 1}}}
            }]
        }},
        "quests": {"cleanup": {
            "npc": "mayor",
            "stages": [{"counter": {
                "expression": vec!["trash"; terms].join(" + "),
                "set": "quest.cleanup.complete"
            }}]
        }}
    })
}

#[test]
fn long_counter_chains_are_rejected() {
    let config = ValidatorConfig::default();
    let storyline = validate_storyline(&counter_chain_storyline(config.max_expression_terms), &config)
        .expect("chain at the term limit");
    assert_eq!(
        storyline.all_counters()[0].expression.flags().len(),
        config.max_expression_terms
    );

    let error = validate_storyline(&counter_chain_storyline(100_000), &config)
        .expect_err("chain far past the term limit");
    assert_eq!(error.code, "EXPR_TOO_LONG");
    assert_eq!(error.kind, ErrorKind::ExpressionSyntax);
    assert_eq!(
        error.path.as_deref(),
        Some("/quests/cleanup/stages/0/counter/expression")
    );

    let tight = ValidatorConfig {
        max_expression_terms: 2,
        ..ValidatorConfig::default()
    };
    let error = validate_storyline(&counter_chain_storyline(3), &tight).expect_err("three terms");
    assert_eq!(error.code, "EXPR_TOO_LONG");
}

#[test]
fn dialogue_fixtures_report_their_location() {
    let cases = [
        ("dialogues/invalid-dialogue-root.yml", "dialogues.greeting"),
        ("dialogues/invalid-dialogue-npcs.yml", "npcs.mayor.dialogue"),
        (
            "dialogues/invalid-dialogue-quest.yml",
            "quests.basicQuest.dialogues.reminder",
        ),
        (
            "dialogues/invalid-dialogue-quest-available.yml",
            "quests.basicQuest.available.dialogue",
        ),
        (
            "dialogues/invalid-dialogue-quest-stage-1.yml",
            "quests.basicQuest.stages.0.dialogue",
        ),
        (
            "dialogues/invalid-dialogue-quest-stage-2.yml",
            "quests.basicQuest.stages.1.dialogue",
        ),
        ("dialogues/invalid-dialogue-quest-ending.yml", "ending.dialogue"),
    ];
    for (name, location) in cases {
        let error = assert_rejected(name, &format!("Error validating dialogue at {}", location));
        assert_eq!(error.dialogue.as_deref(), Some(location));
    }
}

#[test]
fn ending_dialogue_nodes_have_no_responses() {
    let error = assert_rejected(
        "dialogues/bad-ending-responses.yml",
        "Ending dialogue nodes must not have responses",
    );
    assert_eq!(error.code, "DIALOGUE_ENDING_RESPONSES");
}

#[test]
fn first_dialogue_error_follows_location_order() {
    let error = assert_rejected(
        "dialogues/multiple-invalid-dialogues.yml",
        "Error validating dialogue at dialogues.greeting",
    );
    assert_eq!(
        error.to_string(),
        "Error validating dialogue at dialogues.greeting: /dialogues/greeting/0: must have required property 'text'"
    );
}

#[test]
fn config_deserializes_with_defaults() {
    let config: ValidatorConfig =
        serde_json::from_value(serde_json::json!({"languages": ["en", "de"]})).expect("config");
    assert_eq!(config.languages, vec!["en".to_string(), "de".to_string()]);
    assert_eq!(config.max_expression_depth, DEFAULT_MAX_EXPRESSION_DEPTH);
    assert_eq!(config.max_expression_terms, DEFAULT_MAX_EXPRESSION_TERMS);
}
