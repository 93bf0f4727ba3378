use std::path::PathBuf;
use std::process::{Command, Output};

fn run_binary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_harvest_diner"))
        .args(args)
        .env("RUST_LOG", "warn,harvest_diner=info")
        .output()
        .expect("Failed to execute simulation")
}

fn write_script(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("harvest_diner_{}_{}.txt", name, std::process::id()));
    std::fs::write(&path, contents).expect("Failed to write script");
    path
}

/// Test that the simulation runs in headless mode without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_binary(&["--headless", "--ticks", "100", "--seed", "3"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_binary(&["--ticks", "100", "--seed", "3"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for stat in [
        "Ticks run: 100",
        "Customers spawned:",
        "Customers served:",
        "Customers expired:",
        "Crops harvested:",
        "Final money:",
    ] {
        assert!(stderr.contains(stat), "Missing '{}' statistic", stat);
    }
}

/// Test that customers arrive during a run
#[test]
fn test_customers_spawn_during_simulation() {
    let output = run_binary(&["--ticks", "100", "--delta", "0.1", "--seed", "3"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Customer 0 arrived"),
        "No customer arrived in 10 simulated seconds. stdout: {}",
        stdout
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Customers spawned: 0"));
}

/// Test that a script drives the farm
#[test]
fn test_script_plants_and_harvests() {
    let script = write_script(
        "farm",
        "till 0\nplant 0 onion\n@60 harvest 0\nplayer\n",
    );
    let output = run_binary(&[
        "--ticks",
        "80",
        "--delta",
        "0.1",
        "--seed",
        "11",
        "--script",
        script.to_str().unwrap(),
    ]);
    let _ = std::fs::remove_file(&script);
    assert!(
        output.status.success(),
        "Scripted run failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tilled slot 0"), "stdout: {}", stdout);
    assert!(stdout.contains("Planted Onion in slot 0"), "stdout: {}", stdout);
    assert!(
        stdout.contains("Harvested") || stdout.contains("failed. The crop was lost."),
        "Harvest did not run. stdout: {}",
        stdout
    );
    assert!(stdout.contains("Money: $28.00"));
}

/// Test that the final snapshot can be printed as JSON
#[test]
fn test_json_snapshot_output() {
    let output = run_binary(&["--ticks", "30", "--json", "--seed", "5"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let snapshot: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be a JSON snapshot");
    assert_eq!(snapshot["tick"], 30);
    assert_eq!(snapshot["tiles"].as_array().map(Vec::len), Some(48));
    assert_eq!(snapshot["player"]["money"], 30.0);
}

/// Test that a broken config file is reported instead of panicking
#[test]
fn test_bad_config_exits_with_error() {
    let config = write_script("config", "(farm_width: 0)");
    let output = run_binary(&["--config", config.to_str().unwrap()]);
    let _ = std::fs::remove_file(&config);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
}
