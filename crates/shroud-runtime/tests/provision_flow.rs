//! Provisioning flow against in-memory collaborators.
//!
//! The fake platform records every remote call so tests can check ordering
//! and what each call received.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use shroud_core::{
    CompileOptions, Descriptor, Generator, MaskingDefaults, MaskingPlan, PlanTarget, Replacement,
    WorkspaceTable,
};
use shroud_runtime::{
    CatalogSource, GenerationAck, MaskingPlatform, PlanSubmitter, PortStatus, Provisioner,
    SubmitStep,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Mark(PlanTarget, Vec<String>),
    Upsert(PlanTarget, usize),
    Generate(usize, Vec<String>),
}

#[derive(Clone, Default)]
struct FakePlatform {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_on: Option<SubmitStep>,
    fail_table: Option<String>,
}

impl FakePlatform {
    fn failing(step: SubmitStep) -> Self {
        Self {
            fail_on: Some(step),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, step: SubmitStep, table: Option<&str>) -> anyhow::Result<()> {
        let table_matches = match (&self.fail_table, table) {
            (Some(fail), Some(t)) => fail == t,
            (Some(_), None) => false,
            (None, _) => true,
        };
        if self.fail_on == Some(step) && table_matches {
            anyhow::bail!("HTTP status: 500 Internal Server Error");
        }
        Ok(())
    }
}

#[async_trait]
impl MaskingPlatform for FakePlatform {
    async fn mark_sensitive_columns(&self, target: &PlanTarget, columns: &[String]) -> anyhow::Result<()> {
        self.check(SubmitStep::MarkSensitive, Some(&target.table))?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::Mark(target.clone(), columns.to_vec()));
        Ok(())
    }

    async fn upsert_replacements(
        &self,
        target: &PlanTarget,
        replacements: &BTreeMap<String, Replacement>,
    ) -> anyhow::Result<()> {
        self.check(SubmitStep::UpsertReplacements, Some(&target.table))?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::Upsert(target.clone(), replacements.len()));
        Ok(())
    }

    async fn trigger_generation(
        &self,
        replacements: &BTreeMap<String, Replacement>,
        dirty_columns: &[String],
    ) -> anyhow::Result<GenerationAck> {
        let table = replacements.values().next().map(|r| r.table.clone());
        self.check(SubmitStep::TriggerGeneration, table.as_deref())?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::Generate(replacements.len(), dirty_columns.to_vec()));
        Ok(GenerationAck(serde_json::json!({ "jobId": "job-1" })))
    }
}

struct FakeCatalog {
    tables: Vec<WorkspaceTable>,
    generators: Vec<&'static str>,
    fail: bool,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            tables: vec![
                WorkspaceTable::new("sales", "orders")
                    .with_column("id")
                    .with_column("email")
                    .with_column("amount"),
                WorkspaceTable::new("sales", "refunds").with_column("id"),
            ],
            generators: vec!["PassthroughGenerator", "EmailGenerator"],
            fail: false,
        }
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_workspace_tables(&self) -> anyhow::Result<Vec<WorkspaceTable>> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.tables.clone())
    }

    async fn fetch_generators(&self) -> anyhow::Result<Vec<Generator>> {
        Ok(self.generators.iter().copied().map(Generator::new).collect())
    }
}

const DESCRIPTOR: &str = r#"
dataProduct:
  components:
    - id: orders
      kind: outputport
      specific: { schema: sales, table: orders }
      dataContract:
        schema:
          - name: id
          - name: email
            tags: [{ tagFQN: PII }]
            masking: { generatorType: Email }
          - name: amount
    - id: refunds
      kind: outputport
      specific: { schema: sales, table: refunds }
      dataContract:
        schema:
          - name: id
    - id: ghost
      kind: outputport
      specific: { schema: sales, table: ghost }
"#;

fn provisioner(catalog: FakeCatalog, platform: FakePlatform) -> Provisioner<FakeCatalog, FakePlatform> {
    Provisioner::new(catalog, platform, MaskingDefaults::default(), CompileOptions::default())
}

fn descriptor() -> Descriptor {
    Descriptor::from_yaml(DESCRIPTOR).unwrap()
}

#[tokio::test]
async fn test_submission_order_per_plan() {
    let platform = FakePlatform::default();
    let report = provisioner(FakeCatalog::default(), platform.clone())
        .provision(&descriptor(), false)
        .await
        .unwrap();

    let orders = PlanTarget::new("sales", "orders");
    let refunds = PlanTarget::new("sales", "refunds");
    assert_eq!(
        platform.calls(),
        vec![
            Call::Mark(orders.clone(), vec!["email".to_string()]),
            Call::Upsert(orders, 3),
            Call::Generate(
                3,
                vec!["id".to_string(), "email".to_string(), "amount".to_string()]
            ),
            Call::Mark(refunds.clone(), vec![]),
            Call::Upsert(refunds, 1),
            Call::Generate(1, vec!["id".to_string()]),
        ]
    );

    assert_eq!(report.ports.len(), 3);
    assert_eq!(report.applied_count(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert!(!report.has_failures());
    assert!(matches!(
        &report.ports[0].status,
        PortStatus::Applied { replacements: 3, sensitive_columns, .. } if sensitive_columns == &vec!["email".to_string()]
    ));
}

#[tokio::test]
async fn test_dry_run_makes_no_remote_writes() {
    let platform = FakePlatform::default();
    let report = provisioner(FakeCatalog::default(), platform.clone())
        .provision(&descriptor(), true)
        .await
        .unwrap();

    assert!(platform.calls().is_empty());
    assert!(report.dry_run);
    match &report.ports[0].status {
        PortStatus::Planned { plan } => {
            assert_eq!(plan.sensitive_columns, vec!["email"]);
            assert_eq!(plan.replacements().len(), 3);
        }
        other => panic!("expected planned port, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_step_stops_remaining_steps() {
    let platform = FakePlatform::failing(SubmitStep::UpsertReplacements);
    let report = provisioner(FakeCatalog::default(), platform.clone())
        .provision(&descriptor(), false)
        .await
        .unwrap();

    // Marks are not rolled back and generation is never triggered.
    assert_eq!(
        platform.calls(),
        vec![
            Call::Mark(PlanTarget::new("sales", "orders"), vec!["email".to_string()]),
            Call::Mark(PlanTarget::new("sales", "refunds"), vec![]),
        ]
    );
    assert!(report.has_failures());
    assert!(matches!(
        &report.ports[0].status,
        PortStatus::SubmitFailed { step: SubmitStep::UpsertReplacements, error } if error.contains("500")
    ));
}

#[tokio::test]
async fn test_failing_port_does_not_abort_siblings() {
    let platform = FakePlatform {
        fail_on: Some(SubmitStep::TriggerGeneration),
        fail_table: Some("orders".to_string()),
        ..Default::default()
    };
    let report = provisioner(FakeCatalog::default(), platform.clone())
        .provision(&descriptor(), false)
        .await
        .unwrap();

    assert!(matches!(
        report.ports[0].status,
        PortStatus::SubmitFailed { step: SubmitStep::TriggerGeneration, .. }
    ));
    assert!(matches!(report.ports[1].status, PortStatus::Applied { .. }));
    assert_eq!(platform.calls().len(), 5);
}

#[tokio::test]
async fn test_compile_failure_reported_and_siblings_applied() {
    let yaml = r#"
dataProduct:
  components:
    - id: broken
      kind: outputport
      specific: { schema: sales, table: orders }
      dataContract:
        schema:
          - name: id
            masking: { generatorType: RandomInteger }
    - id: refunds
      kind: outputport
      specific: { schema: sales, table: refunds }
      dataContract:
        schema:
          - name: id
"#;
    let catalog = FakeCatalog {
        generators: vec!["PassthroughGenerator", "RandomIntegerGenerator"],
        ..Default::default()
    };
    let platform = FakePlatform::default();
    let report = provisioner(catalog, platform.clone())
        .provision(&Descriptor::from_yaml(yaml).unwrap(), false)
        .await
        .unwrap();

    match &report.ports[0].status {
        PortStatus::CompileFailed { error } => {
            assert!(error.contains("RandomIntegerGenerator"));
            assert!(error.contains("minimum"));
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
    assert!(matches!(report.ports[1].status, PortStatus::Applied { .. }));
    assert_eq!(platform.calls().len(), 3);
}

#[tokio::test]
async fn test_catalog_failure_aborts_before_any_write() {
    let platform = FakePlatform::default();
    let catalog = FakeCatalog {
        fail: true,
        ..Default::default()
    };
    let result = provisioner(catalog, platform.clone())
        .provision(&descriptor(), false)
        .await;

    assert!(result.is_err());
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn test_submitter_reports_failed_step_and_target() {
    let submitter = PlanSubmitter::new(FakePlatform::failing(SubmitStep::MarkSensitive));
    let plan = MaskingPlan::new(PlanTarget::new("sales", "orders"));

    let err = submitter.submit(&plan).await.unwrap_err();
    assert_eq!(err.step, SubmitStep::MarkSensitive);
    assert_eq!(err.target, PlanTarget::new("sales", "orders"));
    assert!(err.to_string().starts_with("mark sensitive columns failed for sales.orders"));
    assert!(submitter.platform().calls().is_empty());
}

#[tokio::test]
async fn test_report_serializes_statuses() {
    let report = provisioner(FakeCatalog::default(), FakePlatform::default())
        .provision(&descriptor(), false)
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ports"][0]["status"]["status"], "applied");
    assert_eq!(json["ports"][0]["status"]["acknowledgement"]["jobId"], "job-1");
    assert_eq!(json["ports"][2]["status"]["status"], "skipped");
    assert_eq!(json["ports"][2]["status"]["reason"]["cause"], "no_match");
}
