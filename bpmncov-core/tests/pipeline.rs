use bpmncov_core::{build_report, run, Config, CoverageError, CoverageStatus, Project};
use std::fs;
use tempfile::TempDir;

const PROCESS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"
                  xmlns:qa="http://example.com/qa" id="Definitions_1">
  <bpmn:process id="Process_Checkout" isExecutable="false">
    <bpmn:userTask id="Task_Login" name="Log in">
      <bpmn:extensionElements>
        <qa:priority>high</qa:priority>
        <qa:jiraKeys>SHOP-1|SHOP-2</qa:jiraKeys>
        <qa:tags>auth, smoke</qa:tags>
      </bpmn:extensionElements>
    </bpmn:userTask>
    <bpmn:serviceTask id="Task_Pay" name="Pay"/>
    <bpmn:userTask id="Task_Ship" name="Ship"/>
  </bpmn:process>
</bpmn:definitions>
"#;

const LOGIN_SPEC: &str = r#"import { test, expect } from '@playwright/test';

test.describe('login', () => {
  test('logs in [bpmn:Task_Login]', async ({ page }) => {
    await page.goto('/');
  });

  test('pays [bpmn:Task_Pay][bpmn:Task_Removed]', async () => {});
});
"#;

/// Project with a BPMN document and two test files, restricted to tasks
fn create_project() -> (TempDir, Project) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("bpmn")).unwrap();
    fs::write(root.join("bpmn/process.bpmn"), PROCESS).unwrap();

    fs::create_dir_all(root.join("tests/e2e")).unwrap();
    fs::write(root.join("tests/e2e/login.spec.ts"), LOGIN_SPEC).unwrap();
    fs::write(root.join("tests/helpers.ts"), "// [bpmn:Task_Ship]\n").unwrap();

    fs::write(
        root.join("bpmncov.toml"),
        r#"
[document]
node_types = ["userTask", "serviceTask"]
"#,
    )
    .unwrap();

    let project = Project::open(root).unwrap();
    (dir, project)
}

#[test]
fn test_build_report_end_to_end() {
    let (_dir, project) = create_project();
    let report = build_report(&project).unwrap();
    let result = &report.reconciliation;

    let ids: Vec<&str> = result.rows.iter().map(|r| r.node.id.as_str()).collect();
    assert_eq!(ids, vec!["Task_Login", "Task_Pay", "Task_Ship"]);

    let statuses: Vec<CoverageStatus> = result.rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            CoverageStatus::Covered,
            CoverageStatus::Covered,
            // helpers.ts does not match the test glob
            CoverageStatus::Missing,
        ]
    );

    let login_hit = &result.rows[0].hits[0];
    assert_eq!(login_hit.source_file, "tests/e2e/login.spec.ts");
    assert_eq!(login_hit.source_line, 4);
    assert_eq!(
        login_hit.associated_label.as_deref(),
        Some("logs in [bpmn:Task_Login]")
    );

    assert_eq!(result.orphans.len(), 1);
    assert_eq!(result.orphans[0].hit.referenced_id, "Task_Removed");
    assert_eq!(result.orphans[0].hit.source_line, 8);

    let meta = &result.rows[0].node.metadata;
    assert_eq!(meta.tags, vec!["auth", "smoke"]);
    assert_eq!(meta.jira_keys, vec!["SHOP-1", "SHOP-2"]);
    assert_eq!(report.document.path, "bpmn/process.bpmn");
    assert_eq!(report.document.sha256.len(), 64);
    assert_eq!(report.files_scanned, 1);
}

#[test]
fn test_run_writes_all_outputs() {
    let (dir, project) = create_project();
    let summary = run(&project).unwrap();

    assert_eq!(summary.outputs.len(), 3);
    for path in &summary.outputs {
        assert!(path.is_file(), "missing output {}", path.display());
    }
    assert_eq!(summary.summary.covered, 2);
    assert_eq!(summary.summary.missing, 1);
    assert_eq!(summary.summary.orphans, 1);

    let csv = fs::read_to_string(dir.path().join("coverage/bpmn-coverage.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains(r#""Task_Ship","Ship","userTask","","","","","","","missing""#));

    let json = fs::read_to_string(dir.path().join("coverage/bpmn-coverage.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["orphans"][0]["id"], "Task_Removed");
    assert_eq!(value["rows"][0]["jira"][1], "SHOP-2");
}

#[test]
fn test_json_output_is_idempotent() {
    let (_dir, project) = create_project();
    let render = || {
        let report = build_report(&project).unwrap();
        bpmncov_core::OutputFormat::Json
            .render(&report.view_at("2024-01-01T00:00:00Z"))
            .unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn test_missing_document_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let project = Project::new(dir.path(), Config::default());

    let err = run(&project).unwrap_err();
    assert!(matches!(err, CoverageError::InputMissing(_)));
    assert!(!dir.path().join("coverage").exists());
}

#[test]
fn test_malformed_document_writes_nothing() {
    let (dir, project) = create_project();
    fs::write(dir.path().join("bpmn/process.bpmn"), "<bpmn:definitions><oops>").unwrap();

    let err = run(&project).unwrap_err();
    assert!(matches!(err, CoverageError::Parse { .. }));
    assert!(err.is_input_error());
    assert!(!dir.path().join("coverage").exists());
}

#[test]
fn test_duplicate_ids_are_fatal() {
    let (dir, project) = create_project();
    fs::write(
        dir.path().join("bpmn/process.bpmn"),
        r#"<definitions><process id="P"><userTask id="T"/><userTask id="T"/></process></definitions>"#,
    )
    .unwrap();

    let err = run(&project).unwrap_err();
    assert!(matches!(err, CoverageError::DuplicateNodeId { .. }));
    assert!(!dir.path().join("coverage").exists());
}
