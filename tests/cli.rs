use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ship(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ship").unwrap();
    cmd.env("SHIP_HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn new_project(home: &TempDir, name: &str) {
    ship(home)
        .args(["project", "new", name])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Created project 1: {name}")));
}

#[test]
fn test_task_add_parses_shorthand() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");

    ship(&home)
        .args(["task", "add", "Rocket", "Fix login bug #bug !high in:2d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 1: Fix login bug [bug high 2 days]"));

    ship(&home)
        .args(["task", "add", "Rocket", "Write", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 2: Write docs [general low -]"));

    ship(&home)
        .args(["task", "list", "Rocket"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 active • 0 completed"))
        .stdout(predicate::str::contains("Fix login bug"));
}

#[test]
fn test_empty_title_is_rejected() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");

    ship(&home)
        .args(["task", "add", "Rocket", "#bug !high"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title cannot be empty"));

    ship(&home)
        .args(["stats", "Rocket", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"task_pct\": 0"));
}

#[test]
fn test_toggle_updates_stats() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");
    for input in ["One in:1d", "Two in:1d", "Three in:2d"] {
        ship(&home).args(["task", "add", "Rocket", input]).assert().success();
    }

    ship(&home)
        .args(["task", "toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 1 is now Done"));

    ship(&home)
        .args(["stats", "Rocket", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"task_pct\": 33"))
        .stdout(predicate::str::contains("\"time_spent_days\": 1.0"))
        .stdout(predicate::str::contains("\"time_required_days\": 3.0"));
}

#[test]
fn test_milestone_by_date() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");

    ship(&home)
        .args(["milestone", "add", "Rocket", "Public beta by:2030-06-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added milestone 1: Public beta (due 2030-06-01)"));

    ship(&home)
        .args(["milestone", "list", "Rocket"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 remaining • 0 completed"));
}

#[test]
fn test_template_seeds_project() {
    let home = TempDir::new().unwrap();

    ship(&home)
        .args(["project", "new", "Launchpad", "--template", "pre-launch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 10 tasks and 3 milestones"));

    ship(&home)
        .args(["task", "list", "Launchpad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 active • 0 completed"));

    ship(&home)
        .args(["project", "new", "Other", "--template", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown template: nope"));
}

#[test]
fn test_duplicate_project_name() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");

    ship(&home)
        .args(["project", "new", "rocket"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project already exists"));
}

#[test]
fn test_parse_task_prints_json() {
    let home = TempDir::new().unwrap();

    ship(&home)
        .args(["parse", "task", "Ship beta !high #feature in:1w"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Ship beta\""))
        .stdout(predicate::str::contains("\"type\": \"feature\""))
        .stdout(predicate::str::contains("\"priority\": \"high\""))
        .stdout(predicate::str::contains("\"duration\": \"1 week\""));
}

#[test]
fn test_config_defaults_apply_to_new_tasks() {
    let home = TempDir::new().unwrap();

    ship(&home)
        .args(["config", "set-default", "--type", "feature", "--priority", "medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Defaults: #feature !medium"));

    ship(&home)
        .args(["parse", "task", "Landing page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"feature\""))
        .stdout(predicate::str::contains("\"priority\": \"medium\""));

    ship(&home)
        .args(["parse", "task", "Crash #bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"bug\""));
}

#[test]
fn test_project_delete_cascades() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");
    ship(&home).args(["task", "add", "Rocket", "Doomed task"]).assert().success();
    ship(&home).args(["note", "add", "Rocket", "Idea", "Body"]).assert().success();

    ship(&home)
        .args(["project", "delete", "Rocket"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted project 1: Rocket"));

    ship(&home)
        .args(["task", "toggle", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found: 1"));

    ship(&home)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_project_list_summary() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");
    ship(&home).args(["project", "new", "Sidecar", "--launched"]).assert().success();
    ship(&home).args(["project", "new", "Attic"]).assert().success();
    ship(&home).args(["project", "archive", "Attic"]).assert().success();

    ship(&home)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "3 projects • 2 pre-launch • 1 launched • 3 created this month",
        ))
        .stdout(predicate::str::contains("Rocket"))
        .stdout(predicate::str::contains("Attic").not());
}

#[test]
fn test_rust_log_enables_debug_output() {
    let home = TempDir::new().unwrap();

    ship(&home)
        .env("RUST_LOG", "debug")
        .args(["parse", "task", "x #bug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed task shorthand"));

    ship(&home)
        .args(["parse", "task", "x #bug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed task shorthand").not());
}

#[test]
fn test_out_of_range_deadline_is_rejected() {
    let home = TempDir::new().unwrap();
    new_project(&home, "Rocket");

    ship(&home)
        .args(["task", "add", "Rocket", "Foo", "--deadline", "in 200000000000d"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid date 'in 200000000000d'"));
}

#[test]
fn test_ui_without_projects() {
    let home = TempDir::new().unwrap();

    ship(&home)
        .arg("ui")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no projects yet"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();

    ship(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ship"));
}
