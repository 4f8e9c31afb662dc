use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &TempDir, input: String) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("worklog_cli").unwrap();
    cmd.env("WORKLOG_CLI_SCRIPT", "1")
        .env("WORKLOG_HOME", home.path())
        .env("NO_COLOR", "1")
        .write_stdin(input)
        .assert()
}

#[test]
fn script_mode_records_and_exports() {
    let home = TempDir::new().unwrap();
    let pdf = home.path().join("timer.pdf");
    let input = format!(
        "header Timeliste\nadd 01-03-2024 Acme 1.0\nadd 02-03-2024 \"Storgata 1\" 2.5\nadd 03-03-2024 Acme 0.5\ntotal\nexport {}\nexit\n",
        pdf.display()
    );

    script(&home, input)
        .success()
        .stdout(contains("Sum Timer: 4.00"))
        .stdout(contains("Exported 3 row(s) on 1 page(s)"));
    assert!(pdf.exists());
}

#[test]
fn invalid_input_is_reported_and_the_shell_continues() {
    let home = TempDir::new().unwrap();
    let input = "add 2024-03-01 Acme 1\nadd 01-03-2024 Acme 1\nundo\nundo\ntotal\n".to_string();

    script(&home, input)
        .success()
        .stdout(contains("Invalid date `2024-03-01`"))
        .stdout(contains("Nothing to undo."))
        .stdout(contains("Sum Timer: 0.00"));
}

#[test]
fn shift_variant_is_configured_and_persisted() {
    let home = TempDir::new().unwrap();
    let input = "config set variant shift-times\nadd 01-03-2024 Acme 08:00 16:00 --break\ntotal\n"
        .to_string();

    script(&home, input)
        .success()
        .stdout(contains("Sum Timer: 7:30"));

    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("\"shift-times\""));

    script(&home, "info\n".to_string())
        .success()
        .stdout(contains("shift-times"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    script(&home, "totl\nexit\n".to_string())
        .success()
        .stdout(contains("Unknown command `totl`"))
        .stdout(contains("Suggestion: `total`?"));
}

#[test]
fn convert_writes_page_images() {
    let home = TempDir::new().unwrap();
    let pdf = home.path().join("doc.pdf");
    let pages = home.path().join("pages");
    std::fs::create_dir(&pages).unwrap();
    let input = format!(
        "add 01-03-2024 Acme 2\nexport {}\nconvert {} {}\n",
        pdf.display(),
        pdf.display(),
        pages.display()
    );

    script(&home, input)
        .success()
        .stdout(contains("Wrote 1 page image(s)"))
        .stdout(contains("ERROR").not());
    assert!(pages.join("page_1.jpg").exists());
}

#[test]
fn overflowing_hours_are_reported_and_the_shell_continues() {
    let home = TempDir::new().unwrap();
    let max = "79228162514264337593543950335";
    let input = format!("add 01-03-2024 Acme {max}\nadd 02-03-2024 Acme {max}\nlist\n");

    script(&home, input)
        .success()
        .stdout(contains("overflow the total working time"))
        .stdout(contains("02-03-2024").not());
}

#[test]
fn out_of_range_config_file_is_rejected_at_startup() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.json"), r#"{ "raster_scale": 100000.0 }"#).unwrap();

    script(&home, "total\n".to_string())
        .failure()
        .stderr(contains("raster_scale must be a number"));
}
