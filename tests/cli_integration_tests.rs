//! End-to-end CLI scenarios (spec.md §8), driven through the built binary
//! the way `assert_cmd` exercises any CLI.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use indoc::indoc;
use predicates::prelude::*;

fn css_compare() -> Command {
  Command::cargo_bin("css_compare").unwrap()
}

fn write_css(dir: &TempDir, name: &str, contents: &str) -> assert_fs::fixture::ChildPath {
  let file = dir.child(name);
  file.write_str(contents).unwrap();
  file
}

#[test]
fn color_notation_is_equivalent() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", ".a { color: red; }");
  let b = write_css(&dir, "b.css", ".a { color: #ff0000; }");

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("true\n"));
}

#[test]
fn duplicate_token_selectors_are_equivalent() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", ".a.b.a { color: red; }");
  let b = write_css(&dir, "b.css", ".a.b { color: red; }");

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("true\n"));
}

#[test]
fn important_cascade_matches_later_important_wins() {
  let dir = TempDir::new().unwrap();
  let a = write_css(
    &dir,
    "a.css",
    indoc! {"
      .a { color: red !important; }
      .a { color: blue !important; }
    "},
  );
  let b = write_css(&dir, "b.css", ".a { color: blue !important; }");

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("true\n"));
}

#[test]
fn later_non_important_wins_over_earlier() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", ".a { color: red; } .a { color: blue; }");
  let b = write_css(&dir, "b.css", ".a { color: blue; }");

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("true\n"));
}

#[test]
fn mismatched_media_condition_is_not_equivalent() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", "@media screen { .a { color: red; } }");
  let b = write_css(&dir, "b.css", "@media print { .a { color: red; } }");

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("false\n"));
}

#[test]
fn keyframes_keyword_offsets_normalize() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", "@keyframes spin { from { opacity: 0; } to { opacity: 1; } }");
  let b = write_css(&dir, "b.css", "@keyframes spin { 0% { opacity: 0; } 100% { opacity: 1; } }");

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("true\n"));
}

#[test]
fn writes_result_to_output_file_when_given() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", ".a { color: red; }");
  let b = write_css(&dir, "b.css", ".a { color: red; }");
  let out = dir.child("result.txt");

  css_compare().arg(a.path()).arg(b.path()).arg(out.path()).assert().success();
  out.assert(predicate::str::diff("true\n"));
}

#[test]
fn missing_input_file_fails_with_nonzero_exit() {
  let dir = TempDir::new().unwrap();
  let a = write_css(&dir, "a.css", ".a { color: red; }");

  css_compare().arg(a.path()).arg(dir.child("missing.css").path()).assert().failure();
}

#[test]
fn import_is_resolved_relative_to_importing_file() {
  let dir = TempDir::new().unwrap();
  write_css(&dir, "base.css", ".a { color: blue; }");
  let a = write_css(&dir, "a.css", "@import \"base.css\"; .a { color: red; }");
  let b = write_css(
    &dir,
    "b.css",
    indoc! {"
      .a { color: blue; }
      .a { color: red; }
    "},
  );

  css_compare().arg(a.path()).arg(b.path()).assert().success().stdout(predicate::str::diff("true\n"));
}
