//! End-to-end operations with scripted collaborators

use std::cell::RefCell;
use std::fs;

use inflator_core::{Error, Inflator, InflatorConfig, ScriptedRunner, ToolOutput};
use inflator_fs::NormalizedPath;
use inflator_git::SourceFetcher;
use inflator_test_utils::OverlayTree;
use pretty_assertions::assert_eq;

/// Writes a marker chart instead of cloning, recording each request.
#[derive(Debug, Default)]
struct FakeFetcher {
    requests: RefCell<Vec<(String, String)>>,
}

impl SourceFetcher for FakeFetcher {
    fn fetch(&self, url: &str, revision: &str, dest: &NormalizedPath) -> inflator_git::Result<()> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), revision.to_string()));
        let chart = dest.join("base");
        fs::create_dir_all(chart.to_native()).unwrap();
        fs::write(chart.join("Chart.yaml").to_native(), "name: bigbang\n").unwrap();
        Ok(())
    }
}

const RENDERED: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: common
data:
  values.yaml: |
    domain: bigbang.dev
    istio:
      enabled: true
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: environment-bb
data:
  values.yaml: |
    domain: dev.bigbang.mil
---
apiVersion: helm.toolkit.fluxcd.io/v2
kind: HelmRelease
metadata:
  name: bigbang
spec:
  valuesFrom:
    - kind: ConfigMap
      name: common
    - kind: Secret
      name: common-bb-7f9c
    - kind: ConfigMap
      name: environment-bb
"#;

const DECRYPTED: &str = r#"kind: Secret
metadata:
  name: common-bb
stringData:
  values.yaml: |
    istio:
      password: s3cret
    domain: from-secret
"#;

fn overlay_tree() -> OverlayTree {
    let tree = OverlayTree::new();
    tree.overlay("dev", &["./level1"]);
    tree.overlay(
        "dev/level1",
        &["git::https://repo1.dso.mil/big-bang/bigbang.git//base?ref=2.52.0"],
    );
    tree.file("dev/level1/secrets.enc.yaml", "ENC[...]");
    tree
}

fn inflator(runner: ScriptedRunner) -> Inflator<ScriptedRunner, FakeFetcher> {
    Inflator::new(runner, FakeFetcher::default(), InflatorConfig::default())
}

#[test]
fn test_overlay_values_merges_in_release_order() {
    let tree = overlay_tree();
    let runner = ScriptedRunner::new()
        .on_program("kustomize", ToolOutput::success(RENDERED))
        .on_program("sops", ToolOutput::success(DECRYPTED));

    let values = inflator(runner)
        .overlay_values(&NormalizedPath::new(tree.path("dev")))
        .unwrap();

    let expected: serde_yaml::Value = serde_yaml::from_str(
        "domain: dev.bigbang.mil\nistio:\n  enabled: true\n  password: s3cret\n",
    )
    .unwrap();
    assert_eq!(values, expected);
}

#[test]
fn test_overlay_values_requires_release() {
    let tree = overlay_tree();
    let runner = ScriptedRunner::new().on_program("kustomize", ToolOutput::success("kind: ConfigMap\n"));

    let err = inflator(runner)
        .overlay_values(&NormalizedPath::new(tree.path("dev")))
        .unwrap_err();

    assert!(matches!(err, Error::ReleaseNotFound { .. }));
}

#[test]
fn test_overlay_values_surfaces_build_failure() {
    let tree = overlay_tree();
    let runner = ScriptedRunner::new().on_program("kustomize", ToolOutput::failure(1, "accumulation err"));

    let err = inflator(runner)
        .overlay_values(&NormalizedPath::new(tree.path("dev")))
        .unwrap_err();

    assert!(matches!(err, Error::ExternalTool { status: 1, .. }));
}

#[test]
fn test_inflate_from_overlay_builds_subdir() {
    let tree = overlay_tree();
    let runner = ScriptedRunner::new().on_program("kustomize", ToolOutput::success("kind: Rendered\n"));
    let inflator = inflator(runner);

    let out = inflator
        .inflate_from_overlay(&NormalizedPath::new(tree.path("dev")))
        .unwrap();

    assert_eq!(out, "kind: Rendered\n");
    let call = &inflator.runner().calls()[0];
    assert_eq!(call.args[0], "build");
    assert!(call.args[1].ends_with("/base"));
}

#[test]
fn test_inflate_from_overlay_needs_revision() {
    let tree = OverlayTree::new();
    tree.overlay("dev", &["git::https://host/chart.git"]);

    let err = inflator(ScriptedRunner::new())
        .inflate_from_overlay(&NormalizedPath::new(tree.path("dev")))
        .unwrap_err();

    assert!(matches!(err, Error::MissingRevision { .. }));
}

#[test]
fn test_secret_values_none_found() {
    let tree = OverlayTree::new();
    tree.overlay("dev", &[]);

    let err = inflator(ScriptedRunner::new())
        .secret_values(&NormalizedPath::new(tree.path("dev")))
        .unwrap_err();

    assert!(matches!(err, Error::NoData));
}

#[test]
fn test_template_with_values_passes_sanitized_file() {
    let tree = overlay_tree();
    let runner = ScriptedRunner::new().on_program("helm", ToolOutput::success("kind: Deployment\n"));
    let inflator = inflator(runner);

    let out = inflator
        .template_with_values(&NormalizedPath::new(tree.path("dev")), "domain: x\u{7}\n")
        .unwrap();

    assert_eq!(out, "kind: Deployment\n");
    let call = &inflator.runner().calls()[0];
    assert_eq!(call.args[0], "template");
    assert_eq!(call.args[1], "bigbang");
    assert!(call.args[2].ends_with("/base"));
    assert_eq!(call.args[3], "-f");
}

#[test]
fn test_build_with_local_base() {
    let tree = overlay_tree();
    tree.file("dev/configmap.yaml", "kind: ConfigMap\n");
    let dest = OverlayTree::new();
    let runner = ScriptedRunner::new().on_program("kustomize", ToolOutput::success("kind: Local\n"));
    let inflator = inflator(runner);

    let out = inflator
        .build_with_local_base(
            &NormalizedPath::new(tree.path("dev")),
            &NormalizedPath::new(dest.root()),
        )
        .unwrap();

    assert_eq!(out, "kind: Local\n");
    dest.assert_file_exists("cloned-bigbang-base/base/Chart.yaml");
    dest.assert_file_exists("configmap.yaml");

    let clone = NormalizedPath::new(dest.path("cloned-bigbang-base/base"));
    let level1 = dest.read("level1/kustomization.yaml");
    assert!(level1.contains(clone.as_str()), "{level1}");
    assert!(dest.read("kustomization.yaml").contains("- level1"));
}

#[test]
fn test_build_with_local_base_replaces_stale_clone() {
    let tree = overlay_tree();
    let dest = OverlayTree::new();
    dest.file("cloned-bigbang-base/stale.txt", "old");
    let runner = ScriptedRunner::new().on_program("kustomize", ToolOutput::success(""));

    inflator(runner)
        .build_with_local_base(
            &NormalizedPath::new(tree.path("dev")),
            &NormalizedPath::new(dest.root()),
        )
        .unwrap();

    dest.assert_file_not_exists("cloned-bigbang-base/stale.txt");
}

#[test]
fn test_build_with_local_base_into_overlay_is_rejected() {
    let tree = overlay_tree();
    let original = tree.read("dev/kustomization.yaml");
    let runner = ScriptedRunner::new().on_program("kustomize", ToolOutput::success(""));

    let err = inflator(runner)
        .build_with_local_base(
            &NormalizedPath::new(tree.path("dev")),
            &NormalizedPath::new(tree.path("dev")),
        )
        .unwrap_err();

    assert!(matches!(err, Error::DestinationIsSource { .. }), "{err}");
    assert_eq!(tree.read("dev/kustomization.yaml"), original);
    tree.assert_file_not_exists("dev/cloned-bigbang-base");
}
