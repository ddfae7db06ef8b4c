use assert_cmd::Command;
use predicates::prelude::*;

#[allow(clippy::unwrap_used)]
fn cmd() -> Command {
    Command::cargo_bin("datalad-installer").unwrap()
}

#[test]
fn version_flag_prints_name_and_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("datalad-installer "));
}

#[test]
fn version_flag_discards_everything_after_it() {
    cmd()
        .args(["--version", "datalad", "--invalid"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("datalad-installer "));
}

#[test]
fn global_help_lists_options_and_components() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: datalad-installer"))
        .stdout(predicate::str::contains("Options:"))
        .stdout(predicate::str::contains("Components:"))
        .stdout(predicate::str::contains("miniconda"))
        .stdout(predicate::str::contains("git-annex"));
}

#[test]
fn component_help_is_scoped() {
    cmd()
        .args(["venv", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Usage: datalad-installer [<options>] venv [<options>]",
        ))
        .stdout(predicate::str::contains("--path"));
}

#[test]
fn component_help_shows_merged_installer_options() {
    cmd()
        .args(["git-annex", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git-annex[=VERSION]"))
        .stdout(predicate::str::contains("--build-dep"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("-m, --method"));
}

#[test]
fn miniconda_help_versions_topic() {
    cmd()
        .args(["miniconda", "--help-versions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo.anaconda.com/miniconda"));
}

#[test]
fn unknown_global_option_exits_2() {
    cmd()
        .arg("--invalid")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("option --invalid not recognized"))
        .stderr(predicate::str::contains("Usage: datalad-installer"));
}

#[test]
fn unknown_component_exits_2() {
    cmd()
        .arg("definitely-not-a-component")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Unknown component: 'definitely-not-a-component'",
        ));
}

#[test]
fn unversioned_component_rejects_version() {
    cmd()
        .arg("venv=1.2.3")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "venv component does not take a version",
        ))
        .stderr(predicate::str::contains(
            "Usage: datalad-installer [<options>] venv [<options>]",
        ));
}

#[test]
fn empty_component_name_is_rejected() {
    cmd()
        .arg("=0.13.0")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Component name must be nonempty"));
}

#[test]
fn method_outside_component_choices_is_rejected() {
    cmd()
        .args(["git-annex", "--method", "pip"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Invalid choice for --method option: 'pip'",
        ));
}

#[test]
fn help_inside_component_group_short_circuits() {
    cmd()
        .args(["datalad", "--help", "--invalid"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Usage: datalad-installer [<options>] datalad[=VERSION] [<options>]",
        ));
}
