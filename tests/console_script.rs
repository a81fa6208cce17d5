use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::json;

fn run_script(root: &Path, name: &str, steps: serde_json::Value) -> Output {
    let script = root.join(format!("{name}.json"));
    std::fs::write(&script, json!({ "steps": steps }).to_string()).expect("write script");

    let bin = env!("CARGO_BIN_EXE_placekit");
    Command::new(bin)
        .arg("--config")
        .arg(root.join("placekit.toml"))
        .arg("--library")
        .arg(root.join("library"))
        .arg("--storage")
        .arg(root.join("storage"))
        .arg("--script")
        .arg(&script)
        .stdin(Stdio::null())
        .output()
        .expect("run placekit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn library() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    let library = dir.path().join("library");
    std::fs::create_dir_all(library.join("models")).unwrap();
    std::fs::write(library.join("models/chair.glb"), b"glb").unwrap();
    std::fs::write(library.join("brick_texture.png"), b"png").unwrap();
    dir
}

#[test]
fn slots_survive_a_restart() {
    let dir = library();

    let listing = run_script(
        dir.path(),
        "list",
        json!([{ "command": "list", "expect": "chair.glb" }]),
    );
    assert!(listing.status.success(), "stderr: {}", String::from_utf8_lossy(&listing.stderr));
    let text = stdout(&listing);
    assert!(text.contains("Loaded 2 items in 5 categories"), "{text}");
    let chair = text
        .lines()
        .find(|line| line.contains("chair.glb"))
        .and_then(|line| line.split_whitespace().next())
        .expect("chair listed")
        .to_string();

    let assign = run_script(
        dir.path(),
        "assign",
        json!([
            { "command": format!("assign {chair} 3"), "expect": format!("Slot 3 <- {chair}") },
            { "command": "key 3", "expect": "Placed #1" }
        ]),
    );
    assert!(assign.status.success(), "{}", stdout(&assign));

    let stored = std::fs::read_to_string(dir.path().join("storage/hotbar-slots.json")).unwrap();
    assert_eq!(
        stored,
        format!(r#"[null,null,"{chair}",null,null,null,null,null,null]"#)
    );

    let restarted = run_script(
        dir.path(),
        "slots",
        json!([{ "command": "slots", "expect": format!("3: {chair} chair.glb") }]),
    );
    assert!(restarted.status.success(), "{}", stdout(&restarted));
}

#[test]
fn unmet_expectation_fails_the_run() {
    let dir = library();
    let output = run_script(
        dir.path(),
        "bad",
        json!([
            { "command": "tab vehicles", "expect": "Tab vehicles" },
            { "command": "list", "expect": "chair.glb" }
        ]),
    );
    let text = stdout(&output);
    assert!(text.contains("Error: "), "{text}");
    assert!(!output.status.success());
}

#[test]
fn missing_library_shows_empty_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run_script(
        dir.path(),
        "empty",
        json!([{ "command": "list", "expect": "No items" }]),
    );
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Error: Could not load the item catalog"));
}
