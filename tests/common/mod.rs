#![allow(dead_code)]

use std::process::{Command as ProcCommand, Output};

use serde_json::Value;
use tempfile::TempDir;

pub fn base_cmd(data_dir: &TempDir) -> ProcCommand {
    let mut command = ProcCommand::new(env!("CARGO_BIN_EXE_scheme-ledger"));
    command
        .env_remove("SCHEME_LEDGER_TOTALS")
        .env_remove("SCHEME_LEDGER_PRICE_TABLE")
        .env_remove("SCHEME_LEDGER_UNPRICED_PERIOD")
        .env("DOTENV_PATH", data_dir.path().join("missing.env"))
        .arg("--data-dir")
        .arg(data_dir.path());
    command
}

pub fn run_ok(command: &mut ProcCommand) -> Value {
    let output = command.output().expect("run scheme-ledger");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

pub fn run_err(command: &mut ProcCommand) -> Output {
    let output = command.output().expect("run scheme-ledger");
    assert!(!output.status.success(), "command unexpectedly succeeded");
    output
}
