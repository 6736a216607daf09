//! Plan assembly.
//!
//! The [`PlanAssembler`] walks an output port's contract columns in order and
//! runs classification, generator selection and metadata customization for
//! each one. The result is a [`MaskingPlan`] ready for submission.

use crate::classifier::is_sensitive;
use crate::customizer::MetadataCustomizer;
use crate::error::CompileError;
use crate::selector::{Selection, select};
use serde::Serialize;
use shroud_core::{
    CatalogSnapshot, CompileOptions, Descriptor, MaskingDefaults, MaskingPlan, ModelConfig,
    OutputPort, PlanTarget, PortRejection, Replacement, SkippedColumn, WorkspaceTable,
};

/// Why a component produced no plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum SkipReason {
    /// Component kind is not `outputport`.
    NotOutputPort { kind: String },
    /// Output port without string `schema` / `table` settings.
    MissingCoordinates,
    /// Port's table is not in the workspace.
    NoMatch { schema: String, table: String },
}

/// Compilation result for one component.
#[derive(Debug)]
pub enum PortCompilation {
    Planned(MaskingPlan),
    Skipped(SkipReason),
    Failed(CompileError),
}

/// One component's compilation result, labelled for reporting.
#[derive(Debug)]
pub struct CompiledPort {
    pub component: String,
    pub outcome: PortCompilation,
}

/// Builds masking plans against a catalog snapshot.
///
/// The snapshot is borrowed read-only, so one snapshot can back any number of
/// assemblers.
pub struct PlanAssembler<'a> {
    snapshot: &'a CatalogSnapshot,
    customizer: MetadataCustomizer,
    model: ModelConfig,
    options: CompileOptions,
}

impl<'a> PlanAssembler<'a> {
    pub fn new(snapshot: &'a CatalogSnapshot, defaults: &MaskingDefaults, options: CompileOptions) -> Self {
        Self {
            snapshot,
            customizer: MetadataCustomizer::new(defaults.timestamp.clone()),
            model: defaults.model.clone(),
            options,
        }
    }

    /// Find the workspace table for a port (exact schema and table match).
    ///
    /// `Ok(None)` means the port is skipped; strict mode reports
    /// [`CompileError::UnmatchedTable`] instead.
    pub fn match_table(&self, port: &OutputPort<'_>) -> Result<Option<&'a WorkspaceTable>, CompileError> {
        match self.snapshot.find_table(port.schema, port.table) {
            Some(table) => Ok(Some(table)),
            None if self.options.strict => Err(CompileError::UnmatchedTable {
                schema: port.schema.to_string(),
                table: port.table.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Assemble the plan for a port already matched to `table`.
    pub fn assemble(&self, port: &OutputPort<'_>, table: &WorkspaceTable) -> Result<MaskingPlan, CompileError> {
        let target = PlanTarget::new(&table.schema_of_table, &table.table_name);
        let mut plan = MaskingPlan::new(target.clone());

        for (position, column) in port.columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                tracing::warn!(
                    schema = %target.schema,
                    table = %target.table,
                    position,
                    "Contract column has a blank name, left out of the plan"
                );
                plan.diagnostics.unnamed_columns.push(position);
                continue;
            }

            if is_sensitive(&column.tags) {
                plan.sensitive_columns.push(column.name.clone());
            }

            let generator_id = match select(column, &self.snapshot.generators) {
                Selection::Resolved(id) => id,
                Selection::NotFound(generator_id) => {
                    if self.options.strict {
                        return Err(CompileError::UnknownGenerator {
                            column: column.name.clone(),
                            generator_id,
                        });
                    }
                    tracing::warn!(
                        schema = %target.schema,
                        table = %target.table,
                        column = %column.name,
                        generator_id = %generator_id,
                        "Generator not in catalog, column left out of replacements"
                    );
                    plan.diagnostics.skipped_columns.push(SkippedColumn {
                        column: column.name.clone(),
                        generator_id,
                    });
                    continue;
                }
            };

            let mut replacement = Replacement::new(&target, &column.name, &generator_id, self.model.clone());
            let link = &mut replacement.links[0];
            link.metadata = self
                .customizer
                .customize(std::mem::take(&mut link.metadata), &generator_id, column)?;

            let key = plan.insert_replacement(replacement);
            tracing::debug!(
                schema = %target.schema,
                table = %target.table,
                column = %column.name,
                generator_id = %generator_id,
                key = %key,
                "Replacement planned"
            );
            plan.dirty_columns.push(column.name.clone());
        }

        Ok(plan)
    }

    /// Match and assemble a single port.
    pub fn compile_port(&self, port: &OutputPort<'_>) -> PortCompilation {
        match self.match_table(port) {
            Ok(Some(table)) => match self.assemble(port, table) {
                Ok(plan) => PortCompilation::Planned(plan),
                Err(e) => PortCompilation::Failed(e),
            },
            Ok(None) => {
                tracing::info!(
                    schema = %port.schema,
                    table = %port.table,
                    "Output port table not found in workspace, skipping"
                );
                PortCompilation::Skipped(SkipReason::NoMatch {
                    schema: port.schema.to_string(),
                    table: port.table.to_string(),
                })
            }
            Err(e) => PortCompilation::Failed(e),
        }
    }

    /// Compile every component of a descriptor, in descriptor order.
    ///
    /// Each output port is compiled independently; a failing port does not
    /// stop its siblings.
    pub fn compile_descriptor(&self, descriptor: &Descriptor) -> Vec<CompiledPort> {
        descriptor
            .components()
            .map(|component| {
                let outcome = match component.as_output_port() {
                    Ok(port) => self.compile_port(&port),
                    Err(PortRejection::NotOutputPort) => {
                        PortCompilation::Skipped(SkipReason::NotOutputPort {
                            kind: component.kind.clone(),
                        })
                    }
                    Err(PortRejection::MissingCoordinates) => {
                        tracing::warn!(
                            component = %component.label(),
                            "Output port has no schema/table settings, skipping"
                        );
                        PortCompilation::Skipped(SkipReason::MissingCoordinates)
                    }
                };
                CompiledPort {
                    component: component.label(),
                    outcome,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shroud_core::{Component, ContractColumn, DataContract, Generator, GeneratorCatalog, MaskingDirective};

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![
                WorkspaceTable::new("sales", "orders")
                    .with_column("id")
                    .with_column("email")
                    .with_column("amount"),
            ],
            ["PassthroughGenerator", "EmailGenerator", "RandomIntegerGenerator"]
                .into_iter()
                .map(Generator::new)
                .collect::<GeneratorCatalog>(),
        )
    }

    fn port_component(schema: &str, table: &str, columns: Vec<ContractColumn>) -> Component {
        Component {
            id: Some(format!("port-{table}")),
            name: None,
            kind: "outputport".to_string(),
            data_contract: Some(DataContract { schema: columns }),
            specific: serde_json::from_value(serde_json::json!({ "schema": schema, "table": table }))
                .unwrap(),
        }
    }

    fn assemble(columns: Vec<ContractColumn>, options: CompileOptions) -> Result<MaskingPlan, CompileError> {
        let snapshot = snapshot();
        let assembler = PlanAssembler::new(&snapshot, &MaskingDefaults::default(), options);
        let component = port_component("sales", "orders", columns);
        let port = component.as_output_port().unwrap();
        let table = assembler.match_table(&port)?.unwrap();
        assembler.assemble(&port, table)
    }

    #[test]
    fn test_sensitive_columns_in_contract_order() {
        let plan = assemble(
            vec![
                ContractColumn::new("a").with_tag("PII"),
                ContractColumn::new("b"),
                ContractColumn::new("c").with_tag("Other").with_tag("Sensitive"),
                ContractColumn::new("d").with_tag("Other"),
                ContractColumn::new("e").with_tag("PII"),
            ],
            CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(plan.sensitive_columns, vec!["a", "c", "e"]);
        assert_eq!(plan.replacements().len(), 5);
        assert_eq!(plan.dirty_columns, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_duplicate_columns_preserved() {
        let plan = assemble(
            vec![
                ContractColumn::new("email").with_tag("PII"),
                ContractColumn::new("email").with_tag("PII"),
            ],
            CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(plan.sensitive_columns, vec!["email", "email"]);
        assert_eq!(plan.dirty_columns, vec!["email", "email"]);
        assert_eq!(plan.replacements().len(), 2);
    }

    #[test]
    fn test_unknown_generator_skipped_but_still_sensitive() {
        let plan = assemble(
            vec![
                ContractColumn::new("id"),
                ContractColumn::new("ssn")
                    .with_tag("PII")
                    .with_masking(MaskingDirective::new("Ssn")),
            ],
            CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(plan.sensitive_columns, vec!["ssn"]);
        assert_eq!(plan.dirty_columns, vec!["id"]);
        assert_eq!(plan.replacements().len(), 1);
        assert!(plan.replacement_for("ssn").is_none());
        assert_eq!(
            plan.diagnostics.skipped_columns,
            vec![SkippedColumn {
                column: "ssn".to_string(),
                generator_id: "SsnGenerator".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_column_names_left_out() {
        let plan = assemble(
            vec![
                ContractColumn::new("").with_tag("PII"),
                ContractColumn::new("id"),
                ContractColumn::new("  ").with_masking(MaskingDirective::new("Email")),
            ],
            CompileOptions::default(),
        )
        .unwrap();

        assert!(plan.sensitive_columns.is_empty());
        assert_eq!(plan.dirty_columns, vec!["id"]);
        assert_eq!(plan.replacements().len(), 1);
        assert_eq!(plan.diagnostics.unnamed_columns, vec![0, 2]);
        assert_eq!(plan.diagnostics.skipped_count(), 2);
    }

    #[test]
    fn test_unknown_generator_fails_in_strict_mode() {
        let err = assemble(
            vec![ContractColumn::new("ssn").with_masking(MaskingDirective::new("Ssn"))],
            CompileOptions { strict: true },
        )
        .unwrap_err();

        assert_eq!(
            err,
            CompileError::UnknownGenerator {
                column: "ssn".to_string(),
                generator_id: "SsnGenerator".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_parameter_aborts_plan() {
        let err = assemble(
            vec![
                ContractColumn::new("id"),
                ContractColumn::new("qty")
                    .with_masking(MaskingDirective::new("RandomInteger").with_param("minimum", 1)),
            ],
            CompileOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            CompileError::missing_parameter("RandomIntegerGenerator", "maximum", "qty")
        );
    }

    #[test]
    fn test_replacement_targets_matched_table() {
        let plan = assemble(
            vec![
                ContractColumn::new("qty").with_masking(
                    MaskingDirective::new("RandomInteger")
                        .with_param("minimum", 1)
                        .with_param("maximum", 10),
                ),
            ],
            CompileOptions::default(),
        )
        .unwrap();

        let replacement = plan.replacement_for("qty").unwrap();
        assert_eq!(plan.target, PlanTarget::new("sales", "orders"));
        assert_eq!(replacement.schema, "sales");
        assert_eq!(replacement.table, "orders");
        assert_eq!(replacement.links[0].column, "qty");
        assert_eq!(replacement.links[0].metadata["min"], 1);
        assert_eq!(replacement.links[0].metadata["max"], 10);
        assert_eq!(replacement.nn_model_config, Some(ModelConfig::default()));
    }

    #[test]
    fn test_compile_descriptor_skips_and_isolates_failures() {
        let snapshot = snapshot();
        let assembler = PlanAssembler::new(&snapshot, &MaskingDefaults::default(), CompileOptions::default());

        let mut workload = port_component("sales", "orders", vec![]);
        workload.kind = "workload".to_string();
        let mut no_coordinates = port_component("sales", "orders", vec![]);
        no_coordinates.specific.remove("schema");

        let descriptor = Descriptor {
            data_product: shroud_core::DataProduct {
                id: None,
                name: None,
                components: vec![
                    workload,
                    port_component("sales", "missing", vec![ContractColumn::new("id")]),
                    port_component(
                        "sales",
                        "orders",
                        vec![ContractColumn::new("qty").with_masking(MaskingDirective::new("RandomInteger"))],
                    ),
                    no_coordinates,
                    port_component("sales", "orders", vec![ContractColumn::new("id")]),
                ],
            },
        };

        let compiled = assembler.compile_descriptor(&descriptor);
        assert_eq!(compiled.len(), 5);
        assert!(matches!(
            &compiled[0].outcome,
            PortCompilation::Skipped(SkipReason::NotOutputPort { kind }) if kind == "workload"
        ));
        assert!(matches!(
            &compiled[1].outcome,
            PortCompilation::Skipped(SkipReason::NoMatch { table, .. }) if table == "missing"
        ));
        assert!(matches!(
            &compiled[2].outcome,
            PortCompilation::Failed(CompileError::MissingParameter { .. })
        ));
        assert!(matches!(
            &compiled[3].outcome,
            PortCompilation::Skipped(SkipReason::MissingCoordinates)
        ));
        assert!(matches!(&compiled[4].outcome, PortCompilation::Planned(plan) if plan.replacements().len() == 1));
    }

    #[test]
    fn test_unmatched_table_fails_in_strict_mode() {
        let snapshot = snapshot();
        let assembler = PlanAssembler::new(&snapshot, &MaskingDefaults::default(), CompileOptions { strict: true });
        let component = port_component("sales", "missing", vec![]);

        let outcome = assembler.compile_port(&component.as_output_port().unwrap());
        assert!(matches!(
            outcome,
            PortCompilation::Failed(CompileError::UnmatchedTable { .. })
        ));
    }
}
