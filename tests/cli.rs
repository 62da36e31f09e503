use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;

/// A command isolated from the caller's config file and environment.
fn cmd(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dnsbl-check").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DNSBL_CHECK_CONFIG")
        .env_remove("DNSBL_CHECK_TIMEOUT")
        .env_remove("DNSBL_CHECK_SUPPRESSCRIT")
        .env_remove("DNSBL_CHECK_VERBOSITY")
        .env_remove("DNSBL_CHECK_PROBE_TIMEOUT")
        .env_remove("DNSBL_CHECK_OUTPUT");
    cmd
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn help_exits_ok() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("check"));
}

#[test]
fn invalid_address_is_unknown() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["check", "not-an-ip"])
        .assert()
        .code(3)
        .stdout(contains("UNKNOWN: invalid target 'not-an-ip'"));
}

#[test]
fn missing_address_is_unknown() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .arg("check")
        .assert()
        .code(3)
        .stdout(contains("UNKNOWN"));
}

#[test]
fn unknown_flag_is_unknown() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["--bogus", "check", "192.0.2.1"])
        .assert()
        .code(3)
        .stdout(contains("UNKNOWN: invalid arguments"));
}

#[test]
fn servers_lists_defaults() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .arg("servers")
        .assert()
        .success()
        .stdout(contains("zen.spamhaus.org"))
        .stdout(contains("bl.spamcop.net"));
}

#[test]
fn servers_reads_config_file() {
    let home = tempfile::tempdir().unwrap();
    let config = config_file("blacklistServers:\n  - bl.example.org\n");
    cmd(&home)
        .arg("--config")
        .arg(config.path())
        .arg("servers")
        .assert()
        .success()
        .stdout("bl.example.org\n");
}

#[test]
fn servers_reads_home_config() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(".dnsbl-check.yaml"),
        "blacklist_servers: [home.example.org]\n",
    )
    .unwrap();

    cmd(&home)
        .arg("servers")
        .assert()
        .success()
        .stdout("home.example.org\n");
}

#[test]
fn empty_server_list_is_unknown() {
    let home = tempfile::tempdir().unwrap();
    let config = config_file("blacklist_servers: []\n");
    cmd(&home)
        .arg("--config")
        .arg(config.path())
        .args(["check", "192.0.2.1"])
        .assert()
        .code(3)
        .stdout(contains("UNKNOWN: no blacklist servers configured"));
}

#[test]
fn missing_config_file_is_unknown() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["--config", "/nonexistent/dnsbl-check.yaml", "check", "192.0.2.1"])
        .assert()
        .code(3)
        .stdout(contains("UNKNOWN: failed to read config"));
}

#[test]
fn zero_timeout_is_unknown() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["-t", "0", "check", "192.0.2.1"])
        .assert()
        .code(3)
        .stdout(contains("UNKNOWN: configuration error"));
}

#[test]
fn json_output() {
    let home = tempfile::tempdir().unwrap();
    cmd(&home)
        .args(["--output", "json", "check", "999.0.0.1"])
        .assert()
        .code(3)
        .stdout(contains("\"severity\":\"indeterminate\""))
        .stdout(contains("\"resolution\":\"invalid_input\""));
}
