//! Integration tests running real stub scripts through `ShellRunner`.
//!
//! Each test writes small `/bin/sh` scripts into a temporary directory and
//! points a `ScriptConfig` at it.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use vmprov_core::{Connection, NotReady, PollOutcome, ScriptKind, VmName};
use vmprov_executor::{ExecutorError, PollConfig, ScriptConfig, ShellRunner, VmLifecycle};

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
}

fn conn(password: &str) -> Connection {
    Connection::new("vc.nightly.local", "administrator@vsphere.local", password).expect("valid connection")
}

fn vm() -> VmName {
    VmName::new("harbor-ova").expect("valid vm name")
}

fn fast_lifecycle(dir: &TempDir, timeout: Duration) -> VmLifecycle<ShellRunner> {
    let poll = PollConfig::new(Duration::from_millis(20), timeout).expect("valid poll config");
    VmLifecycle::with_poll_config(ShellRunner::new(), ScriptConfig::new(dir.path()), poll)
}

#[tokio::test]
async fn get_vm_ip_reads_address_from_script() {
    let dir = TempDir::new().expect("tempdir");
    write_script(dir.path(), "getvmip.sh", "echo 10.112.0.7");
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(5));

    let outcome = lifecycle.get_vm_ip(&conn("pw"), &vm()).await;

    let lookup = outcome.lookup().expect("address should be ready");
    assert_eq!(lookup.ip, "10.112.0.7");
    assert_eq!(lookup.attempts, 1);
    assert_eq!(lookup.vm_name, vm());
}

#[tokio::test]
async fn script_receives_unescaped_password_and_positional_arguments() {
    let dir = TempDir::new().expect("tempdir");
    let args_file = dir.path().join("args.txt");
    write_script(
        dir.path(),
        "getvmip.sh",
        &format!("printf '%s|%s|%s|%s' \"$1\" \"$2\" \"$3\" \"$4\" > {}\necho 10.0.0.1", args_file.display()),
    );
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(5));

    let outcome = lifecycle.get_vm_ip(&conn("Harbor12345!"), &vm()).await;

    assert_eq!(outcome.status_code(), 0);
    let args = fs::read_to_string(&args_file).expect("script recorded its arguments");
    assert_eq!(args, "vc.nightly.local|administrator@vsphere.local|Harbor12345!|harbor-ova");
}

#[tokio::test]
async fn get_vm_ip_waits_through_placeholder_until_address_appears() {
    let dir = TempDir::new().expect("tempdir");
    let counter = dir.path().join("count");
    write_script(
        dir.path(),
        "getvmip.sh",
        &format!(
            "n=$(cat {c} 2>/dev/null || echo 0)\nn=$((n + 1))\necho $n > {c}\n\
             if [ $n -lt 3 ]; then echo photon-machine; else echo 172.16.4.20; fi",
            c = counter.display()
        ),
    );
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(5));

    let outcome = lifecycle.get_vm_ip(&conn("pw"), &vm()).await;

    let lookup = outcome.lookup().expect("address should appear on third run");
    assert_eq!(lookup.ip, "172.16.4.20");
    assert_eq!(lookup.attempts, 3);
}

#[tokio::test]
async fn get_vm_ip_times_out_when_script_keeps_failing() {
    let dir = TempDir::new().expect("tempdir");
    write_script(dir.path(), "getvmip.sh", "echo 'vm not found' >&2\nexit 3");
    let lifecycle = fast_lifecycle(&dir, Duration::from_millis(50));

    let outcome = lifecycle.get_vm_ip(&conn("pw"), &vm()).await;

    assert_eq!(outcome.status_code(), -1);
    match outcome {
        PollOutcome::TimedOut { attempts: 3, last_observation: Some(NotReady::ToolFailed(reason)) } => {
            assert!(reason.contains("status 3"), "reason should carry exit status: {reason}");
            assert!(reason.contains("vm not found"), "reason should carry stderr: {reason}");
        }
        other => panic!("expected TimedOut after 3 failures, got {other:?}"),
    }
}

#[tokio::test]
async fn get_vm_ip_treats_missing_script_as_transient() {
    let dir = TempDir::new().expect("tempdir");
    let lifecycle = fast_lifecycle(&dir, Duration::from_millis(40));

    let outcome = lifecycle.get_vm_ip(&conn("pw"), &vm()).await;

    assert!(
        matches!(outcome, PollOutcome::TimedOut { attempts: 2, .. }),
        "missing script must be retried until timeout, got {outcome:?}"
    );
}

#[tokio::test]
async fn cancel_kills_processes_forked_by_script() {
    let dir = TempDir::new().expect("tempdir");
    let marker = dir.path().join("marker");
    write_script(
        dir.path(),
        "getvmip.sh",
        &format!("(sleep 1; touch {})&\nwait\necho 10.0.0.1", marker.display()),
    );
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(5));
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let outcome = lifecycle.get_vm_ip_until(&conn("pw"), &vm(), &token).await;

    assert_eq!(outcome, PollOutcome::Cancelled { attempts: 1 });
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists(), "background job of a cancelled script must not survive");
}

#[tokio::test]
async fn destroy_vm_returns_exact_output() {
    let dir = TempDir::new().expect("tempdir");
    write_script(dir.path(), "destroyvm.sh", "printf 'VM destroyed'");
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(5));

    let output = lifecycle.destroy_vm(&conn("pw!"), &vm()).await.expect("destroy succeeds");

    assert_eq!(output, "VM destroyed");
}

#[tokio::test]
async fn destroy_vm_propagates_failure() {
    let dir = TempDir::new().expect("tempdir");
    let counter = dir.path().join("runs");
    write_script(
        dir.path(),
        "destroyvm.sh",
        &format!("echo run >> {}\necho 'govc: vm not found' >&2\nexit 1", counter.display()),
    );
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(5));

    let result = lifecycle.destroy_vm(&conn("pw"), &vm()).await;

    match result {
        Err(ExecutorError::ScriptFailed { script: ScriptKind::DestroyVm, status: Some(1), stderr }) => {
            assert_eq!(stderr, "govc: vm not found");
        }
        other => panic!("expected ScriptFailed, got {other:?}"),
    }
    let runs = fs::read_to_string(&counter).expect("script ran");
    assert_eq!(runs.lines().count(), 1, "destroy must run exactly once");
}

#[test]
fn health_check_passes_when_both_scripts_exist() {
    let dir = TempDir::new().expect("tempdir");
    write_script(dir.path(), "getvmip.sh", "true");
    let lifecycle = fast_lifecycle(&dir, Duration::from_secs(1));
    assert!(matches!(
        lifecycle.health_check(),
        Err(ExecutorError::ScriptNotFound { script: ScriptKind::DestroyVm, .. })
    ));

    write_script(dir.path(), "destroyvm.sh", "true");
    assert!(lifecycle.health_check().is_ok());
}
