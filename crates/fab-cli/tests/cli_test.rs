//! End-to-end tests of the `fabctl` binary against snapshot files.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn snapshot() -> serde_json::Value {
    let node = |name: &str, ip: &str, edge: bool| {
        let mut labels = serde_json::Map::new();
        if edge {
            labels.insert("node-role.kubernetes.io/edge".into(), json!(""));
        }
        json!({
            "name": name,
            "labels": labels,
            "addresses": [{"type": "InternalIP", "address": ip}],
            "podCIDRs": [format!("10.244.{}.0/24", ip.rsplit('.').next().unwrap_or("0"))],
        })
    };

    json!({
        "deployments": [
            {
                "name": "fabedge-operator",
                "namespace": "fabedge",
                "containers": [{
                    "name": "operator",
                    "args": [
                        "--cluster=beijing",
                        "--cluster-role=host",
                        "--cni-type=flannel",
                        "--connector-public-addresses=1.1.1.1",
                    ],
                }],
            },
            {
                "name": "service-hub",
                "namespace": "fabedge",
                "containers": [{"name": "service-hub", "args": ["--region=north", "--zone=bj-1"]}],
            },
        ],
        "nodes": [
            node("master", "192.168.1.1", false),
            node("edge-1", "192.168.1.11", true),
            node("edge-2", "192.168.1.12", true),
        ],
        "communities": [
            {"name": "grp-a", "members": ["beijing.edge-1", "beijing.edge-2"]},
        ],
        "clusters": [
            {"name": "beijing", "endpoints": [{"name": "beijing.connector", "type": "Connector"}]},
            {"name": "shanghai", "endpoints": [{"name": "shanghai.connector", "type": "Connector"}]},
        ],
    })
}

fn write_snapshot() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&snapshot()).expect("json")).expect("write");
    (dir, path)
}

fn fabctl(snapshot: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("fabctl").expect("binary");
    cmd.env_remove("FABCTL_NAMESPACE").arg("--snapshot").arg(snapshot);
    cmd
}

#[test]
fn topology_dot_to_stdout() {
    let (_dir, path) = write_snapshot();

    fabctl(&path)
        .args(["topology", "-o", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph topology {"))
        .stdout(predicate::str::contains("layout=\"sfdp\""))
        .stdout(predicate::str::contains("beijing.edge-1"))
        .stdout(predicate::str::contains("shanghai.connector"))
        .stdout(predicate::str::contains("beijing.master").not());
}

#[test]
fn topology_dot_to_file() {
    let (dir, path) = write_snapshot();
    let out = dir.path().join("network.dot");

    fabctl(&path)
        .args(["topology", "-l", "dot", "-o", "dot"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Topology information is written to"));

    let text = std::fs::read_to_string(&out).expect("read");
    assert!(text.contains("layout=\"dot\""));
}

#[test]
fn topology_with_missing_graphviz_fails() {
    let (_dir, path) = write_snapshot();

    fabctl(&path)
        .args(["topology", "--graphviz", "/nonexistent/dot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("graph construction failed"));
}

#[test]
fn cluster_info_table() {
    let (_dir, path) = write_snapshot();

    fabctl(&path)
        .arg("cluster-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("beijing"))
        .stdout(predicate::str::contains("north"))
        .stdout(predicate::str::contains("flannel"));
}

#[test]
fn edges_json() {
    let (_dir, path) = write_snapshot();

    let output = fabctl(&path)
        .args(["edges", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let nodes = value["nodes"].as_array().expect("nodes");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["name"], "edge-1");
    assert_eq!(nodes[0]["peers"][0], "beijing.edge-2");
}

#[test]
fn unknown_node_is_reported_and_skipped() {
    let (_dir, path) = write_snapshot();

    fabctl(&path)
        .args(["nodes", "ghost", "master"])
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to fetch node ghost"))
        .stdout(predicate::str::contains("Name:             master"));
}

#[test]
fn invalid_selector_fails() {
    let (_dir, path) = write_snapshot();

    fabctl(&path)
        .args(["nodes", "-l", "=oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid label selector"));
}

#[test]
fn wrong_namespace_fails() {
    let (_dir, path) = write_snapshot();

    fabctl(&path)
        .args(["--namespace", "kube-system", "edges"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config extraction failed"));
}

#[test]
fn missing_snapshot_fails() {
    Command::cargo_bin("fabctl")
        .expect("binary")
        .env_remove("FABCTL_SNAPSHOT")
        .arg("edges")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no resource snapshot given"));
}
