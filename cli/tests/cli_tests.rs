use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn promptcat() -> Command {
    Command::cargo_bin("promptcat").unwrap()
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn binary_files_are_excluded_before_size_analysis() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.py", "print(1)\n");
    // Ninety bytes of png: dominant by size, but never reaches the
    // analyzer because the extension check drops it first.
    write(tmp.path(), "img.png", &"p".repeat(90));

    promptcat()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.py"))
        .stdout(predicate::str::contains("1 | print(1)"))
        .stdout(predicate::str::contains("img.png").not())
        .stderr(predicate::str::contains("large portion").not());
}

#[test]
fn confirmed_regeneration_converges_to_the_small_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "big.txt", &"b".repeat(800));
    write(tmp.path(), "small.txt", &"s".repeat(200));

    promptcat()
        .arg(tmp.path())
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("small.txt"))
        .stdout(predicate::str::contains("big.txt").not())
        .stderr(predicate::str::contains("big.txt"))
        .stderr(predicate::str::contains("80.0%"));
}

#[test]
fn keep_large_proceeds_with_the_oversized_selection() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "big.txt", &"b".repeat(800));
    write(tmp.path(), "small.txt", &"s".repeat(200));

    promptcat()
        .arg(tmp.path())
        .arg("--keep-large")
        .assert()
        .success()
        .stdout(predicate::str::contains("big.txt"))
        .stdout(predicate::str::contains("small.txt"));
}

#[test]
fn non_interactive_runs_without_flags_keep_the_selection() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "big.txt", &"b".repeat(800));
    write(tmp.path(), "small.txt", &"s".repeat(200));

    // stdin is a pipe here, so the prompt is skipped and the oversized
    // selection is kept.
    promptcat()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("big.txt"))
        .stderr(predicate::str::contains("large portion"));
}

#[test]
fn no_matching_files_reports_and_exits_cleanly() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "img.png", "pretend pixels");

    promptcat()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No files found matching the criteria."));
}

#[test]
fn gitignored_files_are_skipped_unless_disabled() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".gitignore", "*.log\n");
    write(tmp.path(), "app.log", "secret log line");
    write(tmp.path(), "main.rs", "fn main() {}");

    promptcat()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("main.rs"))
        .stdout(predicate::str::contains("app.log").not());

    promptcat()
        .arg(tmp.path())
        .arg("--no-gitignore")
        .assert()
        .success()
        .stdout(predicate::str::contains("app.log"));
}

#[test]
fn exclude_and_include_globs_filter_the_selection() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "keep.rs", "fn keep() {}");
    write(tmp.path(), "drop.md", "# drop");

    promptcat()
        .arg(tmp.path())
        .args(["-x", "*.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("keep.rs"))
        .stdout(predicate::str::contains("drop.md").not());

    promptcat()
        .arg(tmp.path())
        .args(["-i", "*.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drop.md"))
        .stdout(predicate::str::contains("keep.rs").not());
}

#[test]
fn markdown_format_uses_fenced_blocks() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.rs", "fn main() {}");

    promptcat()
        .arg(tmp.path())
        .arg("--markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("```rs\n"))
        .stdout(predicate::str::contains("1 | fn main() {}"));
}

#[test]
fn xml_format_wraps_documents() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.rs", "fn main() {}");

    promptcat()
        .arg(tmp.path())
        .arg("--cxml")
        .assert()
        .success()
        .stdout(predicate::str::contains("<documents>"))
        .stdout(predicate::str::contains("<document index=\"1\">"))
        .stdout(predicate::str::contains("<source>main.rs</source>"));
}

#[test]
fn tree_header_lists_the_selected_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/main.rs", "fn main() {}");
    write(tmp.path(), "README.md", "# readme");

    promptcat()
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Project Structure:"))
        .stdout(predicate::str::contains("├── README.md"))
        .stdout(predicate::str::contains("└── src"));
}

#[test]
fn output_file_receives_the_document() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.rs", "fn main() {}");

    promptcat()
        .current_dir(tmp.path())
        .args([".", "-o", "out.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(tmp.path().join("out.txt")).unwrap();
    assert!(written.contains("Project Structure:"));
    assert!(written.contains("1 | fn main() {}"));
}

#[test]
fn paths_can_be_piped_via_stdin() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "main.rs", "fn main() {}");

    promptcat()
        .write_stdin(format!("{}\n", tmp.path().display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("main.rs"));
}

#[test]
fn empty_stdin_is_a_usage_error() {
    promptcat()
        .write_stdin("")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("No paths provided"));
}

#[test]
fn config_file_seeds_the_filters() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".promptcat.toml", "[filters]\nexclude = [\"*.md\"]\n");
    write(tmp.path(), "keep.rs", "fn keep() {}");
    write(tmp.path(), "drop.md", "# drop");

    promptcat()
        .current_dir(tmp.path())
        .arg(".")
        .assert()
        .success()
        .stdout(predicate::str::contains("keep.rs"))
        .stdout(predicate::str::contains("drop.md").not());

    promptcat()
        .current_dir(tmp.path())
        .args([".", "--no-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drop.md"));
}
