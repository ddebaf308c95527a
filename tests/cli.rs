use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

// Each test runs in a temp dir holding an empty local settings file, so the
// user's own config never leaks in.
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("polyglot-tools.toml").write_str("").unwrap();
    temp
}

#[test]
fn scaffold_then_migrate() {
    let temp = workspace();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .arg("scaffold")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next steps"));
    temp.child("js/config/api_keys.js")
        .assert(predicate::path::is_file());

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["migrate-assets", "--on-conflict", "keep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Migration process complete."));
    temp.child("public/js/config/api_keys.js")
        .assert(predicate::path::is_file());
    temp.child("index.html")
        .assert(predicate::str::contains(r#"src="js/app.js""#))
        .assert(predicate::str::contains(r#"src="/js/utils/helpers.js""#));
}

#[test]
fn backup_with_yes_skips_prompt() {
    let temp = workspace();
    temp.child("app/index.html").write_str("<html></html>").unwrap();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["backup", "--source", "app", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup completed"));
    temp.child("app_old/index.html").assert("<html></html>");
}

#[test]
fn backup_reads_piped_yes() {
    let temp = workspace();
    temp.child("app/js/app.js").write_str("start()").unwrap();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["backup", "--source", "app"])
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup completed"));
    temp.child("app_old/js/app.js").assert("start()");
}

#[test]
fn backup_piped_no_creates_nothing() {
    let temp = workspace();
    temp.child("app/index.html").write_str("<html></html>").unwrap();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["backup", "--source", "app"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup operation cancelled."));
    temp.child("app_old").assert(predicate::path::missing());
}

#[test]
fn unwritable_log_file_fails_cleanly() {
    let temp = workspace();
    temp.child("blocker").write_str("a file, not a directory").unwrap();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["--log-file", "blocker/run.log", "scaffold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("panicked").not());
    temp.child("index.html").assert(predicate::path::missing());
}

#[test]
fn seed_dry_run_writes_nothing_remote() {
    let temp = workspace();
    temp.child("groups.json")
        .write_str(r#"[{"id": "g1", "name": "Test"}, {"name": "Orphan"}]"#)
        .unwrap();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["seed-groups", "--dry-run", "--groups-file", "groups.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 written, 1 skipped, 0 failed"));
}

#[test]
fn seed_without_credentials_still_exits_zero() {
    let temp = workspace();
    temp.child("groups.json").write_str(r#"[{"id": "g1"}]"#).unwrap();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .env_remove("FIRESTORE_EMULATOR_HOST")
        .args(["seed-groups", "--groups-file", "groups.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was written"));
}

#[test]
fn init_config_refuses_to_overwrite() {
    let temp = workspace();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["init-config", "--path", "settings.toml"])
        .assert()
        .success();
    temp.child("settings.toml")
        .assert(predicate::str::contains("[relocate]"));

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["init-config", "--path", "settings.toml"])
        .assert()
        .failure();
}

#[test]
fn missing_config_file_is_an_error() {
    let temp = workspace();

    cargo_bin_cmd!("polyglot-tools")
        .current_dir(temp.path())
        .args(["--config", "nope.toml", "scaffold"])
        .assert()
        .failure();
}
