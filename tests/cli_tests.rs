use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, db: &Path) -> PathBuf {
    let config = dir.join("config.toml");
    fs::write(
        &config,
        format!("[database]\npath = {:?}\n", db.display().to_string()),
    )
    .unwrap();
    config
}

fn registry() -> Command {
    let mut cmd = Command::cargo_bin("student-registry").unwrap();
    cmd.env_remove("STUDENT_DB_PATH")
        .env_remove("VALIDATE_CPF_STRICTLY");
    cmd
}

#[test]
fn test_init_then_shell_session() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data").join("alunos.db");
    let config = write_config(dir.path(), &db);

    registry().arg("init").arg(&config).assert().success();
    assert!(db.exists());

    let output = registry()
        .arg(&config)
        .write_stdin(
            ":add nome=Ana sobrenome=Souza cpf=111.444.777-35 nascimento=15/08/2000 curso=ADS\n\
             :add nome=Bia sobrenome=Reis cpf=111.444.777-00 curso=SI\n\
             :list\n\
             :quit\n",
        )
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.contains("Student created successfully."), "{}", stdout);
    assert!(
        stdout.contains("Error: CPF is invalid (check digits do not match)."),
        "{}",
        stdout
    );
    assert!(stdout.contains("15/08/2000"), "{}", stdout);
    assert!(stdout.contains("1 students found."), "{}", stdout);
}

#[test]
fn test_relaxed_cpf_from_environment() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("alunos.db");
    let config = write_config(dir.path(), &db);
    registry().arg("init").arg(&config).assert().success();

    let output = registry()
        .arg(&config)
        .env("VALIDATE_CPF_STRICTLY", "false")
        .write_stdin(":add nome=Bia sobrenome=Reis cpf=111.444.777-00 curso=SI\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("Student created successfully."), "{}", stdout);
}

#[test]
fn test_missing_database_fails_startup() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &dir.path().join("absent.db"));

    registry().arg(&config).write_stdin(":quit\n").assert().failure();
}

#[test]
fn test_missing_database_path_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[validation]\nstrict_cpf = true\n").unwrap();

    let output = registry().arg(&config).assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8(output).unwrap();
    assert!(stderr.contains("STUDENT_DB_PATH"), "{}", stderr);
}
