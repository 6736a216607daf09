use crate::platform::{CatalogSource, GenerationAck, MaskingPlatform, fetch_snapshot};
use crate::submitter::{PlanSubmitter, SubmitStep};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shroud_compiler::{PlanAssembler, PortCompilation, SkipReason};
use shroud_core::{CompileOptions, Descriptor, MaskingDefaults, MaskingPlan, PlanDiagnostics, PlanTarget};

/// What happened to one component of the descriptor.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PortStatus {
    /// All three submission steps succeeded.
    Applied {
        replacements: usize,
        sensitive_columns: Vec<String>,
        acknowledgement: serde_json::Value,
    },
    /// Dry run: the plan was compiled but not submitted.
    Planned { plan: MaskingPlan },
    Skipped { reason: SkipReason },
    CompileFailed { error: String },
    /// `step` failed; earlier steps remain applied.
    SubmitFailed { step: SubmitStep, error: String },
}

#[derive(Debug, Serialize)]
pub struct PortReport {
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PlanTarget>,
    pub status: PortStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<PlanDiagnostics>,
}

impl PortReport {
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            PortStatus::CompileFailed { .. } | PortStatus::SubmitFailed { .. }
        )
    }
}

/// Aggregate result of one provisioning request.
#[derive(Debug, Serialize)]
pub struct ProvisionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub ports: Vec<PortReport>,
}

impl ProvisionReport {
    pub fn has_failures(&self) -> bool {
        self.ports.iter().any(PortReport::is_failure)
    }

    pub fn applied_count(&self) -> usize {
        self.ports
            .iter()
            .filter(|p| matches!(p.status, PortStatus::Applied { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.ports
            .iter()
            .filter(|p| matches!(p.status, PortStatus::Skipped { .. }))
            .count()
    }
}

/// Runs a provisioning request end to end: fetch the catalog, compile every
/// output port, submit each plan.
///
/// Ports are submitted one after another in descriptor order. A port that
/// fails to compile or submit is reported and the next port proceeds.
pub struct Provisioner<C: CatalogSource, P: MaskingPlatform> {
    catalog: C,
    submitter: PlanSubmitter<P>,
    defaults: MaskingDefaults,
    options: CompileOptions,
}

impl<C: CatalogSource, P: MaskingPlatform> Provisioner<C, P> {
    pub fn new(catalog: C, platform: P, defaults: MaskingDefaults, options: CompileOptions) -> Self {
        Self {
            catalog,
            submitter: PlanSubmitter::new(platform),
            defaults,
            options,
        }
    }

    /// Provision a descriptor. With `dry_run`, plans are compiled and reported
    /// but nothing is written to the platform.
    ///
    /// Only a catalog fetch failure is returned as `Err`; at that point no
    /// remote write has happened.
    pub async fn provision(&self, descriptor: &Descriptor, dry_run: bool) -> anyhow::Result<ProvisionReport> {
        let started_at = Utc::now();
        let snapshot = fetch_snapshot(&self.catalog).await?;
        let assembler = PlanAssembler::new(&snapshot, &self.defaults, self.options);

        let mut ports = Vec::new();
        for compiled in assembler.compile_descriptor(descriptor) {
            let report = match compiled.outcome {
                PortCompilation::Planned(plan) if dry_run => PortReport {
                    component: compiled.component,
                    target: Some(plan.target.clone()),
                    diagnostics: Some(plan.diagnostics.clone()),
                    status: PortStatus::Planned { plan },
                },
                PortCompilation::Planned(plan) => self.submit(compiled.component, plan).await,
                PortCompilation::Skipped(reason) => PortReport {
                    component: compiled.component,
                    target: None,
                    status: PortStatus::Skipped { reason },
                    diagnostics: None,
                },
                PortCompilation::Failed(error) => {
                    tracing::error!(
                        component = %compiled.component,
                        error = %error,
                        "Output port compilation failed"
                    );
                    PortReport {
                        component: compiled.component,
                        target: None,
                        status: PortStatus::CompileFailed {
                            error: error.to_string(),
                        },
                        diagnostics: None,
                    }
                }
            };
            ports.push(report);
        }

        Ok(ProvisionReport {
            started_at,
            finished_at: Utc::now(),
            dry_run,
            ports,
        })
    }

    async fn submit(&self, component: String, plan: MaskingPlan) -> PortReport {
        let status = match self.submitter.submit(&plan).await {
            Ok(GenerationAck(acknowledgement)) => PortStatus::Applied {
                replacements: plan.replacements().len(),
                sensitive_columns: plan.sensitive_columns.clone(),
                acknowledgement,
            },
            Err(e) => PortStatus::SubmitFailed {
                step: e.step,
                error: format!("{:#}", e.source),
            },
        };
        PortReport {
            component,
            target: Some(plan.target),
            status,
            diagnostics: Some(plan.diagnostics),
        }
    }
}
