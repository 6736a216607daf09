//! Masking plan submission.
//!
//! A plan is committed in three remote steps, strictly in this order:
//!
//! 1. mark the sensitive columns
//! 2. upsert the replacements
//! 3. trigger data generation
//!
//! A failing step stops the sequence. Earlier steps are not rolled back, so a
//! plan only counts as applied once all three have succeeded.

use crate::platform::{GenerationAck, MaskingPlatform};
use serde::Serialize;
use shroud_core::{MaskingPlan, PlanTarget};
use std::fmt;
use thiserror::Error;

/// Remote step of a plan submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStep {
    MarkSensitive,
    UpsertReplacements,
    TriggerGeneration,
}

impl fmt::Display for SubmitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmitStep::MarkSensitive => "mark sensitive columns",
            SubmitStep::UpsertReplacements => "upsert replacements",
            SubmitStep::TriggerGeneration => "trigger generation",
        };
        f.write_str(name)
    }
}

/// A remote step failed; later steps were not attempted.
#[derive(Debug, Error)]
#[error("{step} failed for {target}: {source}")]
pub struct SubmitError {
    pub step: SubmitStep,
    pub target: PlanTarget,
    #[source]
    pub source: anyhow::Error,
}

/// Sequences the remote calls that commit a plan.
pub struct PlanSubmitter<P: MaskingPlatform> {
    platform: P,
}

impl<P: MaskingPlatform> PlanSubmitter<P> {
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Commit a plan. The plan is not modified.
    pub async fn submit(&self, plan: &MaskingPlan) -> Result<GenerationAck, SubmitError> {
        let target = &plan.target;
        let fail = |step: SubmitStep| {
            move |source: anyhow::Error| {
                tracing::error!(
                    schema = %target.schema,
                    table = %target.table,
                    step = %step,
                    error = %source,
                    "Plan submission aborted"
                );
                SubmitError {
                    step,
                    target: target.clone(),
                    source,
                }
            }
        };

        self.platform
            .mark_sensitive_columns(target, &plan.sensitive_columns)
            .await
            .map_err(fail(SubmitStep::MarkSensitive))?;
        tracing::info!(
            schema = %target.schema,
            table = %target.table,
            columns = plan.sensitive_columns.len(),
            "Marked sensitive columns"
        );

        self.platform
            .upsert_replacements(target, plan.replacements())
            .await
            .map_err(fail(SubmitStep::UpsertReplacements))?;
        tracing::info!(
            schema = %target.schema,
            table = %target.table,
            replacements = plan.replacements().len(),
            "Upserted replacements"
        );

        let ack = self
            .platform
            .trigger_generation(plan.replacements(), &plan.dirty_columns)
            .await
            .map_err(fail(SubmitStep::TriggerGeneration))?;
        tracing::info!(
            schema = %target.schema,
            table = %target.table,
            dirty_columns = plan.dirty_columns.len(),
            "Triggered data generation"
        );

        Ok(ack)
    }
}
