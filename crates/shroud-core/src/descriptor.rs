//! Data product descriptor types.
//!
//! A descriptor lists the components of a data product. Only components of
//! kind `outputport` carry a data contract that the compiler cares about; every
//! other component is passed over. Parsing is lenient: fields the
//! compiler does not read are accepted and ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Component kind carrying a data contract.
pub const OUTPUT_PORT_KIND: &str = "outputport";

/// Envelope received from the provisioning coordinator.
///
/// The `descriptor` field is a YAML document embedded as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
    #[serde(default)]
    pub descriptor_kind: Option<String>,
    pub descriptor: String,
}

impl ProvisioningRequest {
    /// Parse the embedded descriptor document.
    pub fn parse_descriptor(&self) -> Result<Descriptor, serde_yaml::Error> {
        Descriptor::from_yaml(&self.descriptor)
    }
}

/// Top-level descriptor document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub data_product: DataProduct,
}

impl Descriptor {
    /// Parse a descriptor from YAML (JSON is accepted as well).
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Iterate over every component of the data product.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.data_product.components.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProduct {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// One provisionable unit of a data product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub data_contract: Option<DataContract>,
    /// Kind-specific settings. Output ports carry `table` and `schema` here.
    #[serde(default)]
    pub specific: Map<String, Value>,
}

/// Why a component did not yield an output port view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRejection {
    NotOutputPort,
    MissingCoordinates,
}

impl Component {
    /// Human-readable label used in logs and reports.
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("<unnamed {}>", self.kind))
    }

    /// View this component as an output port.
    ///
    /// Requires `kind == "outputport"` and string `table` / `schema` entries in
    /// `specific`. A missing data contract is treated as an empty column list.
    pub fn as_output_port(&self) -> Result<OutputPort<'_>, PortRejection> {
        if self.kind != OUTPUT_PORT_KIND {
            return Err(PortRejection::NotOutputPort);
        }

        let coordinate = |key: &str| self.specific.get(key).and_then(Value::as_str);
        match (coordinate("schema"), coordinate("table")) {
            (Some(schema), Some(table)) => Ok(OutputPort {
                component: self,
                schema,
                table,
                columns: self
                    .data_contract
                    .as_ref()
                    .map(|c| c.schema.as_slice())
                    .unwrap_or_default(),
            }),
            _ => Err(PortRejection::MissingCoordinates),
        }
    }
}

/// Borrowed view over an output port component.
#[derive(Debug, Clone, Copy)]
pub struct OutputPort<'a> {
    pub component: &'a Component,
    pub schema: &'a str,
    pub table: &'a str,
    pub columns: &'a [ContractColumn],
}

/// Column-level data contract of an output port.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataContract {
    #[serde(default)]
    pub schema: Vec<ContractColumn>,
}

/// One column of an output port's data contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractColumn {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Sensitivity tags. `null` and absence both mean no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
    /// Masking directive. Absence means passthrough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masking: Option<MaskingDirective>,
}

impl ContractColumn {
    /// Column with no tags and no masking directive.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            tags: Vec::new(),
            masking: None,
        }
    }

    /// Add a tag by fully qualified name.
    pub fn with_tag(mut self, fqn: impl Into<String>) -> Self {
        self.tags.push(Tag {
            tag_fqn: Some(fqn.into()),
        });
        self
    }

    /// Set the masking directive.
    pub fn with_masking(mut self, directive: MaskingDirective) -> Self {
        self.masking = Some(directive);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "tagFQN", default)]
    pub tag_fqn: Option<String>,
}

/// Requested anonymization for a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskingDirective {
    /// Generator family, e.g. `Email`; resolved to `EmailGenerator`.
    pub generator_type: String,
    /// Free-form generator parameters.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub specific: Map<String, Value>,
}

impl MaskingDirective {
    pub fn new(generator_type: impl Into<String>) -> Self {
        Self {
            generator_type: generator_type.into(),
            specific: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.specific.insert(key.into(), value.into());
        self
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
