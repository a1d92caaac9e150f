// tests/release_workflow_test.rs
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use cut_release::boundary::ReleaseWarning;
use cut_release::cli::orchestration::{release_with, run_release_workflow, ReleaseArgs, WorkflowResult};
use cut_release::config::{CommandConfig, ReleaseConfig};
use cut_release::git::Git2Repository;
use cut_release::pipeline::ReleaseStep;
use cut_release::version::ReleaseVersions;
use cut_release::ReleaseError;
use git2::{IndexAddOption, Repository};
use tempfile::TempDir;

struct Fixture {
    _root: TempDir,
    work: std::path::PathBuf,
    remote: std::path::PathBuf,
}

/// A working copy with one commit and a bare `origin` next to it.
fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let work = root.path().join("work");
    let remote = root.path().join("remote.git");

    Repository::init_bare(&remote).unwrap();
    let repo = Repository::init(&work).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Release Bot").unwrap();
        config.set_str("user.email", "release@example.com").unwrap();
    }

    fs::create_dir_all(work.join("Sources")).unwrap();
    fs::create_dir_all(work.join("scripts")).unwrap();
    fs::write(work.join("lib.podspec"), "s.version = '1.0.0'\n").unwrap();
    fs::write(
        work.join("Sources/Info.plist"),
        "<key>CFBundleShortVersionString</key>\n<string>1.0.0</string>\n",
    )
    .unwrap();
    fs::write(work.join("scripts/generate_docs.sh"), "jazzy --module-version 1.0.0\n").unwrap();
    fs::write(work.join("README.md"), "library\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = repo.signature().unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
        .unwrap();

    repo.remote("origin", remote.to_str().unwrap()).unwrap();

    Fixture {
        _root: root,
        work,
        remote,
    }
}

fn release_config() -> ReleaseConfig {
    let mut config = ReleaseConfig::default();
    config.version_files = vec![
        "lib.podspec".to_string(),
        "Sources/Info.plist".to_string(),
        "./scripts/generate_docs.sh".to_string(),
    ];
    config.docs.command = CommandConfig::new(
        "sh",
        &["-c", "mkdir -p docs && echo \"$RELEASE_NEW_VERSION\" > docs/index.html"],
    );
    config.publish = CommandConfig::new("sh", &["-c", "echo \"$RELEASE_TAG\" > published.txt"]);
    config.secondary_build = CommandConfig::new("sh", &["-c", "exit 1"]);
    config
}

fn forced() -> ReleaseArgs {
    ReleaseArgs {
        force: true,
        ..ReleaseArgs::default()
    }
}

fn head_message(repo: &Repository) -> String {
    repo.head()
        .unwrap()
        .peel_to_commit()
        .unwrap()
        .message()
        .unwrap()
        .to_string()
}

#[test]
fn test_full_release_pushes_commits_and_tag() {
    let fx = fixture();
    let repo = Git2Repository::open(&fx.work).unwrap();
    let config = release_config();

    let result = release_with(&repo, &config, ReleaseVersions::new("1.0.0", "1.0.1"), &forced())
        .expect("release should run to the end");

    let report = match result {
        WorkflowResult::Released(report) => report,
        other => panic!("unexpected result: {:?}", other),
    };
    assert_eq!(report.tag, "v1.0.1");
    let steps: Vec<ReleaseStep> = report.outcomes.iter().map(|o| o.step).collect();
    assert_eq!(steps, ReleaseStep::ALL.to_vec());
    for outcome in &report.outcomes[..4] {
        assert!(outcome.is_clean(), "{} had warnings: {:?}", outcome.step, outcome.warnings);
    }
    assert_eq!(
        report.outcomes[4].warnings,
        vec![ReleaseWarning::CommandFailed {
            command: "sh -c exit 1".to_string(),
            exit_code: Some(1),
        }]
    );

    assert_eq!(
        fs::read_to_string(fx.work.join("Sources/Info.plist")).unwrap(),
        "<key>CFBundleShortVersionString</key>\n<string>1.0.1</string>\n"
    );
    assert_eq!(
        fs::read_to_string(fx.work.join("published.txt")).unwrap(),
        "v1.0.1\n"
    );

    // remote received both commits and the annotated tag
    let remote = Repository::open_bare(&fx.remote).unwrap();
    let local = Repository::open(&fx.work).unwrap();
    let branch = local.head().unwrap().shorthand().unwrap().to_string();
    let remote_head = remote
        .find_reference(&format!("refs/heads/{}", branch))
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(remote_head.message(), Some("Update docs"));
    assert_eq!(remote_head.parent(0).unwrap().message(), Some("Version 1.0.1"));

    let tag = remote
        .find_reference("refs/tags/v1.0.1")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert_eq!(tag.message().map(str::trim), Some("version 1.0.1"));
    assert_eq!(tag.target_id(), remote_head.id());
}

#[test]
fn test_commits_only_contain_their_own_paths() {
    let fx = fixture();
    let repo = Git2Repository::open(&fx.work).unwrap();
    let config = release_config();
    fs::write(fx.work.join("README.md"), "edited but not part of the release\n").unwrap();

    release_with(&repo, &config, ReleaseVersions::new("1.0.0", "1.0.1"), &forced()).unwrap();

    let local = Repository::open(&fx.work).unwrap();
    let docs_commit = local.head().unwrap().peel_to_commit().unwrap();
    let bump_commit = docs_commit.parent(0).unwrap();
    let initial = bump_commit.parent(0).unwrap();

    let changed = |from: &git2::Commit, to: &git2::Commit| -> Vec<String> {
        let diff = local
            .diff_tree_to_tree(Some(&from.tree().unwrap()), Some(&to.tree().unwrap()), None)
            .unwrap();
        let mut paths: Vec<String> = diff
            .deltas()
            .map(|d| d.new_file().path().unwrap().to_string_lossy().into_owned())
            .collect();
        paths.sort();
        paths
    };

    assert_eq!(
        changed(&initial, &bump_commit),
        vec!["Sources/Info.plist", "lib.podspec", "scripts/generate_docs.sh"]
    );
    assert_eq!(changed(&bump_commit, &docs_commit), vec!["docs/index.html"]);

    let tree = docs_commit.tree().unwrap();
    assert!(tree.get_name("published.txt").is_none());
}

#[test]
fn test_missing_version_aborts_without_commit() {
    let fx = fixture();
    fs::write(fx.work.join("Sources/Info.plist"), "<string>0.9.0</string>\n").unwrap();
    let repo = Git2Repository::open(&fx.work).unwrap();
    let config = release_config();

    let err = release_with(&repo, &config, ReleaseVersions::new("1.0.0", "1.0.1"), &forced())
        .unwrap_err();

    match err.downcast_ref::<ReleaseError>() {
        Some(ReleaseError::VersionNotFound { path, version }) => {
            assert_eq!(path, Path::new("Sources/Info.plist"));
            assert_eq!(version, "1.0.0");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // first file rewritten, later file untouched, nothing committed
    assert_eq!(
        fs::read_to_string(fx.work.join("lib.podspec")).unwrap(),
        "s.version = '1.0.1'\n"
    );
    assert_eq!(
        fs::read_to_string(fx.work.join("scripts/generate_docs.sh")).unwrap(),
        "jazzy --module-version 1.0.0\n"
    );
    let local = Repository::open(&fx.work).unwrap();
    assert_eq!(head_message(&local), "initial");
    assert!(local.find_reference("refs/tags/v1.0.1").is_err());
}

#[test]
fn test_strict_mode_fails_on_secondary_build() {
    let fx = fixture();
    let repo = Git2Repository::open(&fx.work).unwrap();
    let config = release_config();
    let args = ReleaseArgs {
        strict: true,
        ..forced()
    };

    let err = release_with(&repo, &config, ReleaseVersions::new("1.0.0", "1.0.1"), &args)
        .unwrap_err();

    assert!(err.to_string().contains("secondary-build"));
    // everything before the failing step still happened
    let remote = Repository::open_bare(&fx.remote).unwrap();
    assert!(remote.find_reference("refs/tags/v1.0.1").is_ok());
}

#[test]
fn test_dry_run_changes_nothing() {
    let fx = fixture();
    let repo = Git2Repository::open(&fx.work).unwrap();
    let config = release_config();
    let args = ReleaseArgs {
        dry_run: true,
        ..ReleaseArgs::default()
    };

    let result = release_with(&repo, &config, ReleaseVersions::new("1.0.0", "2.0"), &args).unwrap();

    match result {
        WorkflowResult::Planned(plan) => {
            assert_eq!(plan.len(), 5);
            assert!(plan[2].1[0].contains("v2.0"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(
        fs::read_to_string(fx.work.join("lib.podspec")).unwrap(),
        "s.version = '1.0.0'\n"
    );
    assert_eq!(head_message(&Repository::open(&fx.work).unwrap()), "initial");
}

#[test]
fn test_workflow_requires_both_versions() {
    let fx = fixture();
    let args = ReleaseArgs {
        new: Some("1.0.1".to_string()),
        repo_path: fx.work.clone(),
        force: true,
        ..ReleaseArgs::default()
    };

    let err = run_release_workflow(&args).unwrap_err();
    assert_eq!(err.to_string(), "Missing argument: --old");
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_cut-release"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--old"));
    assert!(stdout.contains("--new"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_cli_reports_missing_version_with_exit_code() {
    let fx = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_cut-release"))
        .args(["--old", "1.0.0", "--yes", "-C"])
        .arg(&fx.work)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Missing argument: --new"), "stderr: {}", stderr);
}

#[test]
fn test_cli_dry_run_with_config_file() {
    let fx = fixture();
    fs::write(
        fx.work.join("cutrelease.toml"),
        "version_files = [\"lib.podspec\"]\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cut-release"))
        .args(["--old", "1.0.0", "--new", "1.1.0", "--dry-run", "-C"])
        .arg(&fx.work)
        .env_remove("CUT_RELEASE_CONFIG")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("replace 1.0.0 with 1.1.0 in lib.podspec"));
    assert!(!stdout.contains("Sources/Info.plist"));
    assert!(stdout.contains("create annotated tag v1.1.0"));
}

#[test]
fn test_cli_without_terminal_releases_instead_of_cancelling() {
    let fx = fixture();
    fs::write(
        fx.work.join("cutrelease.toml"),
        r#"version_files = ["lib.podspec"]

[docs.command]
program = "true"

[publish]
program = "true"

[secondary_build]
program = "true"
"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cut-release"))
        .args(["--old", "1.0.0", "--new", "1.0.1", "-C"])
        .arg(&fx.work)
        .env_remove("CUT_RELEASE_CONFIG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(!stdout.contains("Release cancelled"));
    assert!(stdout.contains("Congratulations, done!"));
    assert_eq!(
        fs::read_to_string(fx.work.join("lib.podspec")).unwrap(),
        "s.version = '1.0.1'\n"
    );
    let remote = Repository::open_bare(&fx.remote).unwrap();
    assert!(remote.find_reference("refs/tags/v1.0.1").is_ok());
}
