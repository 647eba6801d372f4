use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("failed to create test csv");
    file.write_all(contents.as_bytes())
        .expect("failed to write test csv");
    path
}

fn caseflow(db: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("caseflow"));
    cmd.arg("--db").arg(db);
    cmd
}

#[test]
fn import_then_list_shows_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data.db");
    let csv = write_csv(
        dir.path(),
        "contacts.csv",
        "name,email\nAda Lovelace,ada@example.org\n",
    );

    caseflow(&db)
        .arg("import")
        .arg("contacts")
        .arg(&csv)
        .arg("--org")
        .arg("org-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 rows"));

    caseflow(&db)
        .arg("list")
        .arg("contacts")
        .arg("--org")
        .arg("org-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"));
}

#[test]
fn blocked_import_lists_errors_and_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data.db");
    let csv = write_csv(
        dir.path(),
        "clients.csv",
        "Client Name,Age,Year\nJane Doe,34,2023\n,40,2023\n",
    );

    caseflow(&db)
        .arg("import")
        .arg("client-files")
        .arg(&csv)
        .arg("--org")
        .arg("org-1")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Import blocked"))
        .stdout(predicate::str::contains("Row 3: Client Name is required"));
}

#[test]
fn dry_run_does_not_create_db() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data.db");
    let csv = write_csv(
        dir.path(),
        "awards_2023.csv",
        "Donor Name,Amount\nAcme Fund,\"$1,500\"\n",
    );

    caseflow(&db)
        .arg("import")
        .arg("awards")
        .arg(&csv)
        .arg("--org")
        .arg("org-1")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!db.exists(), "dry-run should not create db");
}

#[test]
fn json_output_reports_outcome() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data.db");
    let csv = write_csv(
        dir.path(),
        "donors.csv",
        "donor_name,value\nAcme Fund,\"$12,000\"\n",
    );

    caseflow(&db)
        .arg("--json")
        .arg("import")
        .arg("donor-tracker")
        .arg(&csv)
        .arg("--org")
        .arg("org-1")
        .arg("--user")
        .arg("user-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"accepted\""))
        .stdout(predicate::str::contains("\"inserted\": 1"));
}

#[test]
fn year_override_flag_reaches_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data.db");
    // No Year column, no year in filename: only the flag can supply it
    let csv = write_csv(dir.path(), "roster.csv", "Client Name\nJane Doe\n");

    caseflow(&db)
        .arg("import")
        .arg("client-files")
        .arg(&csv)
        .arg("--org")
        .arg("org-1")
        .arg("--year")
        .arg("2023")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 rows"));

    caseflow(&db)
        .arg("list")
        .arg("client-files")
        .arg("--org")
        .arg("org-1")
        .arg("--year")
        .arg("2023")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Doe"));
}
