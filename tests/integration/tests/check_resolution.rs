//! End-to-end tests for `hxcheck check` config resolution and scoping.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or(manifest_dir)
}

fn hxcheck() -> Command {
    Command::new(workspace_root().join("target/debug/hxcheck"))
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn line_length_config(max_length: u32) -> String {
    format!(
        r#"{{
  "defaultSeverity": "WARNING",
  "checks": [
    {{ "type": "LineLength", "props": {{ "maxLength": {max_length} }} }}
  ]
}}
"#
    )
}

mod project_config {
    use super::*;

    #[test]
    fn test_violation_is_reported_with_nonzero_exit() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(20));
        write_file(
            project.path(),
            "src/Main.hx",
            "class Main { static function main() { trace(\"hi\"); } }\n",
        );

        hxcheck()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("LineLength"))
            .stdout(predicate::str::contains("found 1 issues"));
    }

    #[test]
    fn test_clean_file_passes() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(160));
        write_file(project.path(), "src/Main.hx", "class Main {}\n");

        hxcheck()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn test_nearest_config_wins_over_root_config() {
        let project = TempDir::new().unwrap();
        // Root config would flag the file; the config next to it would not.
        write_file(project.path(), "checkstyle.json", &line_length_config(10));
        write_file(
            project.path(),
            "src/checkstyle.json",
            &line_length_config(500),
        );
        write_file(
            project.path(),
            "src/Main.hx",
            "class Main { static function main() { trace(\"hi\"); } }\n",
        );

        hxcheck()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn test_sibling_excludes_suppress_configured_folder() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(20));
        write_file(
            project.path(),
            "checkstyle-excludes.json",
            r#"{ "all": ["src/legacy"] }"#,
        );
        write_file(
            project.path(),
            "src/legacy/Old.hx",
            "class Old { static function main() { trace(\"legacy\"); } }\n",
        );
        write_file(project.path(), "src/New.hx", "class New {}\n");

        hxcheck()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }
}

mod settings_config {
    use super::*;

    #[test]
    fn test_config_flag_resolves_relative_to_root() {
        let project = TempDir::new().unwrap();
        write_file(
            project.path(),
            "tools/style.json",
            &line_length_config(20),
        );
        write_file(
            project.path(),
            "src/Main.hx",
            "class Main { static function main() { trace(\"hi\"); } }\n",
        );

        hxcheck()
            .arg("check")
            .arg("--config")
            .arg("tools/style.json")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("LineLength"));
    }

    #[test]
    fn test_project_config_takes_precedence_over_config_flag() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(500));
        write_file(
            project.path(),
            "tools/style.json",
            &line_length_config(10),
        );
        write_file(
            project.path(),
            "src/Main.hx",
            "class Main { static function main() { trace(\"hi\"); } }\n",
        );

        hxcheck()
            .arg("check")
            .arg("--config")
            .arg("tools/style.json")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn test_missing_config_flag_falls_back_to_bundled_default() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "src/Main.hx", "class Main {}\n");

        hxcheck()
            .arg("check")
            .arg("--config")
            .arg("no/such/file.json")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 files"));
    }
}

mod source_scope {
    use super::*;

    #[test]
    fn test_files_outside_source_folders_are_skipped() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(20));
        write_file(
            project.path(),
            "tests/TestMain.hx",
            "class TestMain { static function main() { trace(\"hi\"); } }\n",
        );

        hxcheck()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("tests"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 0 files (1 skipped)"));
    }

    #[test]
    fn test_source_folder_flag_extends_scope() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(20));
        write_file(
            project.path(),
            "tests/TestMain.hx",
            "class TestMain { static function main() { trace(\"hi\"); } }\n",
        );

        hxcheck()
            .arg("check")
            .arg("--source-folder")
            .arg("tests")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("tests"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("LineLength"));
    }

    #[test]
    fn test_capitalized_source_folder_is_in_scope_by_default() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(160));
        write_file(project.path(), "Source/Main.hx", "class Main {}\n");

        hxcheck()
            .arg("check")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("Source"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 files"));
    }
}

mod output_format {
    use super::*;

    #[test]
    fn test_json_output_contains_diagnostics() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", &line_length_config(20));
        write_file(
            project.path(),
            "src/Main.hx",
            "class Main { static function main() { trace(\"hi\"); } }\n",
        );

        let output = hxcheck()
            .arg("check")
            .arg("--format")
            .arg("json")
            .arg("--root")
            .arg(project.path())
            .arg(project.path().join("src"))
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0]["diagnostics"][0]["check"],
            serde_json::json!("LineLength")
        );
        assert_eq!(
            entries[0]["diagnostics"][0]["severity"],
            serde_json::json!("WARNING")
        );
    }
}

mod init_command {
    use super::*;

    #[test]
    fn test_init_creates_config_file() {
        let project = TempDir::new().unwrap();

        hxcheck()
            .arg("init")
            .current_dir(project.path())
            .assert()
            .success();

        let config = fs::read_to_string(project.path().join("checkstyle.json")).unwrap();
        assert!(config.contains("LineLength"));
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let project = TempDir::new().unwrap();
        write_file(project.path(), "checkstyle.json", "{}");

        hxcheck()
            .arg("init")
            .current_dir(project.path())
            .assert()
            .failure()
            .code(2);

        hxcheck()
            .arg("init")
            .arg("--force")
            .current_dir(project.path())
            .assert()
            .success();
    }
}
