use std::fs;
use std::process::Command;

use sv_test_fixtures::{fixture_path, fixtures_root};

#[test]
fn check_reports_every_fixture_file() {
    let bin = env!("CARGO_BIN_EXE_storyline-lint");
    let root = fixtures_root();

    let mut directories = fs::read_dir(&root)
        .expect("fixtures root must exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    directories.sort();
    assert!(!directories.is_empty(), "expected storyline fixtures");

    for directory in directories {
        let files = fs::read_dir(&directory)
            .expect("fixture directory")
            .filter_map(Result::ok)
            .count();

        let output = Command::new(bin)
            .arg("check")
            .arg(&directory)
            .output()
            .expect("cli should execute");
        let stdout = String::from_utf8_lossy(&output.stdout);

        assert_eq!(
            stdout.lines().filter(|line| line.starts_with("FILE:")).count(),
            files,
            "every file in {} should be reported\nstdout:\n{}",
            directory.display(),
            stdout
        );
        assert!(
            stdout.contains("RESULT:ERROR"),
            "{} holds rejected fixtures\nstdout:\n{}",
            directory.display(),
            stdout
        );
        assert_eq!(output.status.code(), Some(1));
    }
}

#[test]
fn check_succeeds_on_valid_storyline() {
    let bin = env!("CARGO_BIN_EXE_storyline-lint");
    let output = Command::new(bin)
        .arg("check")
        .arg(fixture_path("schema/complete.yml"))
        .output()
        .expect("cli should execute");

    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RESULT:OK"));
}

#[test]
fn rejected_storyline_prints_error_protocol() {
    let bin = env!("CARGO_BIN_EXE_storyline-lint");
    let output = Command::new(bin)
        .arg("check")
        .arg(fixture_path("references/bad-npc-reference.yml"))
        .output()
        .expect("cli should execute");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_KIND:ReferenceError"));
    assert!(stdout.contains("ERROR_CODE:REF_UNDEFINED_NPC"));
    assert!(stdout.contains(
        "ERROR_MSG_JSON:\"/quests/mayorIdea/npc: Quest mayorIdea references undefined npc notTheMayor\""
    ));
}

#[test]
fn expr_prints_ast_json() {
    let bin = env!("CARGO_BIN_EXE_storyline-lint");
    let output = Command::new(bin)
        .arg("expr")
        .arg("trashA + trashB >= 2")
        .output()
        .expect("cli should execute");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("EXPR:((trashA + trashB) >= 2)"));
    assert!(stdout.contains("AST_JSON:{\"kind\":\"binary\",\"op\":\"ge\""));
}
