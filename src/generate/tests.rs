//! Tests for write and check modes.

use super::*;
use crate::config::Config;
use crate::test_support::{README_RENDERED, create_template_repo};
use std::fs;
use tempfile::TempDir;

fn default_generator(root: &Path) -> Generator {
    let config = Config::default();
    Generator::new(root, &config.env_file, config.artifacts)
}

fn builtin_options() -> CheckOptions {
    CheckOptions {
        diff_tool: DiffTool::Builtin,
        ..CheckOptions::default()
    }
}

#[test]
fn test_render_all_default_layout() {
    let repo = create_template_repo();
    let rendered = default_generator(repo.path()).render_all().unwrap();

    assert_eq!(rendered.len(), 2);

    let workflow = &rendered[0];
    assert_eq!(workflow.name, "workflow");
    assert_eq!(
        workflow.output,
        repo.path().join(".github/workflows/build-nginx-ech.yml")
    );
    let expected = format!(
        "{}{}",
        crate::test_support::ENV_YML,
        crate::test_support::WORKFLOW_YML
    );
    assert_eq!(workflow.text, expected);
    assert!(workflow.text.contains("${{ env.NGINX_VERSION }}"));

    let readme = &rendered[1];
    assert_eq!(readme.output, repo.path().join("README.md"));
    assert_eq!(readme.text, README_RENDERED);
}

#[test]
fn test_write_creates_outputs_and_parents() {
    let repo = create_template_repo();
    let written = default_generator(repo.path()).write().unwrap();

    assert_eq!(
        written,
        vec![
            repo.path().join(".github/workflows/build-nginx-ech.yml"),
            repo.path().join("README.md"),
        ]
    );
    assert_eq!(
        fs::read_to_string(repo.path().join("README.md")).unwrap(),
        README_RENDERED
    );
}

#[test]
fn test_write_is_idempotent() {
    let repo = create_template_repo();
    let generator = default_generator(repo.path());

    let paths = generator.write().unwrap();
    let first: Vec<Vec<u8>> = paths.iter().map(|p| fs::read(p).unwrap()).collect();
    generator.write().unwrap();
    let second: Vec<Vec<u8>> = paths.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_check_after_write_is_clean() {
    let repo = create_template_repo();
    let generator = default_generator(repo.path());
    generator.write().unwrap();

    let report = generator.check(&builtin_options()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.checked, 2);
}

#[test]
fn test_check_reports_missing_output() {
    let repo = create_template_repo();
    let report = default_generator(repo.path())
        .check(&builtin_options())
        .unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].name, "workflow");
    assert_eq!(report.mismatches[0].kind, MismatchKind::Missing);
}

#[test]
fn test_check_detects_template_change_without_touching_outputs() {
    let repo = create_template_repo();
    let generator = default_generator(repo.path());
    generator.write().unwrap();

    fs::write(
        repo.path().join("template/README.md"),
        "# nginx {{NGINX_VERSION}} (edited)\n",
    )
    .unwrap();
    let tracked_before = fs::read(repo.path().join("README.md")).unwrap();

    let report = generator.check(&builtin_options()).unwrap();

    assert!(!report.is_clean());
    let mismatch = &report.mismatches[0];
    assert_eq!(mismatch.name, "readme");
    assert_eq!(mismatch.kind, MismatchKind::Differs);
    assert_eq!(mismatch.output, repo.path().join("README.md"));
    assert!(mismatch.diff.contains("first difference at line 1"));
    assert!(mismatch.diff.contains("(edited)"));

    let tracked_after = fs::read(repo.path().join("README.md")).unwrap();
    assert_eq!(tracked_before, tracked_after);
}

#[test]
fn test_check_detects_env_change_in_both_artifacts() {
    let repo = create_template_repo();
    let generator = default_generator(repo.path());
    generator.write().unwrap();

    fs::write(
        repo.path().join("template/env.yml"),
        "env:\n  NGINX_VERSION: \"1.28.0\"\n  OPENSSL_BRANCH: \"feature/ech\"\n",
    )
    .unwrap();

    let stop_early = generator.check(&builtin_options()).unwrap();
    assert_eq!(stop_early.mismatches.len(), 1);
    assert_eq!(stop_early.mismatches[0].name, "workflow");

    let options = CheckOptions {
        keep_going: true,
        ..builtin_options()
    };
    let all = generator.check(&options).unwrap();
    let names: Vec<&str> = all.mismatches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["workflow", "readme"]);
    assert_eq!(all.checked, 2);
}

#[test]
fn test_check_detects_trailing_newline_difference() {
    let repo = create_template_repo();
    let generator = default_generator(repo.path());
    generator.write().unwrap();

    let readme = repo.path().join("README.md");
    let trimmed = README_RENDERED.trim_end_matches('\n');
    fs::write(&readme, trimmed).unwrap();

    let options = CheckOptions {
        keep_going: true,
        ..builtin_options()
    };
    let report = generator.check(&options).unwrap();
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].kind, MismatchKind::Differs);
}

#[test]
fn test_render_error_aborts_before_any_write() {
    let repo = create_template_repo();
    fs::write(
        repo.path().join("template/README.md"),
        "{{NGINX_VERSION}} {{UNDEFINED}}\n",
    )
    .unwrap();

    let err = default_generator(repo.path()).write().unwrap_err();
    match err {
        TplError::MissingVariable { name, template } => {
            assert_eq!(name, "UNDEFINED");
            assert_eq!(template, Path::new("template/README.md"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert!(!repo.path().join(".github").exists());
    assert!(!repo.path().join("README.md").exists());
}

#[test]
fn test_env_syntax_error_propagates() {
    let repo = create_template_repo();
    fs::write(
        repo.path().join("template/env.yml"),
        "env:\n  GOOD: \"1\"\n  BAD LINE\n",
    )
    .unwrap();

    let err = default_generator(repo.path())
        .check(&builtin_options())
        .unwrap_err();
    assert!(matches!(err, TplError::Syntax { line: 3, .. }));
}

#[test]
fn test_missing_source_is_io_error() {
    let repo = create_template_repo();
    fs::remove_file(repo.path().join("template/build-nginx-ech.yml")).unwrap();

    let err = default_generator(repo.path()).render_all().unwrap_err();
    assert!(matches!(err, TplError::Io { .. }));
}

#[test]
fn test_verbatim_sources_keep_placeholders() {
    let repo = create_template_repo();
    fs::write(repo.path().join("template/raw.txt"), "{{NOT_DEFINED}}\n").unwrap();

    let generator = Generator::new(
        repo.path(),
        "template/env.yml",
        vec![Artifact::new("raw", ["template/raw.txt"], "out/raw.txt", false)],
    );
    let rendered = generator.render_all().unwrap();
    assert_eq!(rendered[0].text, "{{NOT_DEFINED}}\n");
}

#[test]
fn test_multiple_substituted_sources_are_concatenated() {
    let repo = create_template_repo();
    fs::write(repo.path().join("template/a.md"), "A={{NGINX_VERSION}};").unwrap();
    fs::write(repo.path().join("template/b.md"), "B={{OPENSSL_BRANCH}}").unwrap();

    let generator = Generator::new(
        repo.path(),
        "template/env.yml",
        vec![Artifact::new(
            "joined",
            ["template/a.md", "template/b.md"],
            "joined.md",
            true,
        )],
    );
    let rendered = generator.render_all().unwrap();
    assert_eq!(rendered[0].text, "A=1.27.4;B=feature/ech");
}

#[test]
fn test_same_file_name_outputs_do_not_collide_in_check() {
    let repo = create_template_repo();
    fs::write(repo.path().join("template/one.md"), "one\n").unwrap();
    fs::write(repo.path().join("template/two.md"), "two\n").unwrap();

    let generator = Generator::new(
        repo.path(),
        "template/env.yml",
        vec![
            Artifact::new("one", ["template/one.md"], "a/README.md", true),
            Artifact::new("two", ["template/two.md"], "b/README.md", true),
        ],
    );
    generator.write().unwrap();

    let report = generator.check(&builtin_options()).unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_check_scratch_dir_removed_on_success_and_mismatch() {
    let repo = create_template_repo();
    let scratch = TempDir::new().unwrap();
    let options = CheckOptions {
        diff_tool: DiffTool::Builtin,
        keep_going: true,
        scratch_parent: Some(scratch.path().to_path_buf()),
    };
    let generator = default_generator(repo.path());

    let report = generator.check(&options).unwrap();
    assert!(!report.is_clean());
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);

    generator.write().unwrap();
    let report = generator.check(&options).unwrap();
    assert!(report.is_clean());
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_check_scratch_dir_removed_on_error() {
    let repo = create_template_repo();
    // A directory where a tracked file should be makes the comparison read fail.
    fs::create_dir_all(repo.path().join(".github/workflows/build-nginx-ech.yml")).unwrap();

    let scratch = TempDir::new().unwrap();
    let options = CheckOptions {
        diff_tool: DiffTool::Builtin,
        keep_going: false,
        scratch_parent: Some(scratch.path().to_path_buf()),
    };

    let err = default_generator(repo.path()).check(&options).unwrap_err();
    assert!(matches!(err, TplError::Io { .. }));
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_write_into_blocked_path_is_io_error() {
    let repo = create_template_repo();
    fs::write(repo.path().join(".github"), "file, not a directory").unwrap();

    let err = default_generator(repo.path()).write().unwrap_err();
    assert!(matches!(err, TplError::Io { .. }));
}
