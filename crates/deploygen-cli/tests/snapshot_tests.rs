//! Snapshot tests for stable command output

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run deploygen and capture output
fn deploygen_output(dir: &TempDir, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_deploygen"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("DEPLOYGEN_CERTS_DIR")
        .env_remove("DEPLOYGEN_TEMPLATE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute deploygen");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Working directory with certificates and a small template
fn create_workspace(template: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let certs = dir.path().join("certs");
    fs::create_dir(&certs).unwrap();
    fs::write(certs.join("ca.crt"), b"ca-cert").unwrap();
    fs::write(certs.join("server.pem"), b"server").unwrap();
    fs::write(certs.join("tls.key"), b"tls-key").unwrap();
    fs::write(dir.path().join("t.yaml.j2"), template).unwrap();
    dir
}

const SUMMARY_TEMPLATE: &str = "\
csp: {{ cspType }}
internal: {{ internal | string | lower }}
replicas: {{ configDbReplicas }}
image: {{ imagePath }}:{{ imageTag }}
pullSecret: {{ imagePullSecretName }}
rei: {{ enableREI | string | lower }}
certs:
{% for name, data in certs|dictsort %}
  {{ name }}: {{ data }}
{% endfor %}
";

#[test]
fn test_customer_summary() {
    let ws = create_workspace(SUMMARY_TEMPLATE);
    let (stdout, stderr, success) =
        deploygen_output(&ws, &["-c", "--template", "t.yaml.j2", "-o", "-"]);

    assert!(success, "{}", stderr);
    insta::assert_snapshot!(stdout, @r"
    csp: AWS
    internal: false
    replicas: 3
    image: nuvolosocom:v1
    pullSecret: customer-dockerhub-secret
    rei: false
    certs:
      caCrt: Y2EtY2VydA==
      serverPem: c2VydmVy
      tlsKey: dGxzLWtleQ==
    ");
}

#[test]
fn test_internal_summary() {
    let ws = create_workspace(SUMMARY_TEMPLATE);
    let (stdout, stderr, success) = deploygen_output(
        &ws,
        &["-i", "-T", "Azure", "--enable-rei", "--template", "t.yaml.j2", "-o", "-"],
    );

    assert!(success, "{}", stderr);
    insta::assert_snapshot!(stdout, @r"
    csp: Azure
    internal: true
    replicas: 1
    image: nuvoloso.azurecr.io:v1
    pullSecret: internal-repo-secret
    rei: true
    certs:
      caCrt: Y2EtY2VydA==
      serverPem: c2VydmVy
      tlsKey: dGxzLWtleQ==
    ");
}

#[test]
fn test_announced_file_name() {
    let ws = create_workspace(SUMMARY_TEMPLATE);
    let (stdout, _, success) =
        deploygen_output(&ws, &["-i", "-T", "GCP", "-t", "v3", "--template", "t.yaml.j2"]);

    assert!(success);
    insta::assert_snapshot!(stdout, @"internal-GCP-v3.yaml");
}
