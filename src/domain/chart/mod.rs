//! Chart domain - declarative Vega-Lite chart specifications
//!
//! Encodings accept the `FIELD:T` shorthand, where `T` is one of
//! `N` (nominal), `O` (ordinal), `Q` (quantitative) or `T` (temporal).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::domain::relation::LocalTable;
use crate::domain::DomainError;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Measurement type of an encoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Nominal,
    Ordinal,
    Quantitative,
    Temporal,
}

impl FieldType {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Self::Nominal),
            "O" => Some(Self::Ordinal),
            "Q" => Some(Self::Quantitative),
            "T" => Some(Self::Temporal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendOrient {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub orient: LegendOrient,
}

/// Field encoding for one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Sort order, e.g. `-y` to sort descending by the y channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

impl FieldDef {
    pub fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
            sort: None,
            legend: None,
        }
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn legend(mut self, orient: LegendOrient) -> Self {
        self.legend = Some(Legend { orient });
        self
    }
}

impl FromStr for FieldDef {
    type Err = DomainError;

    fn from_str(shorthand: &str) -> Result<Self, Self::Err> {
        let (field, code) = shorthand.rsplit_once(':').ok_or_else(|| {
            DomainError::validation(format!(
                "Encoding shorthand '{}' must look like FIELD:TYPE",
                shorthand
            ))
        })?;

        if field.is_empty() {
            return Err(DomainError::validation(format!(
                "Encoding shorthand '{}' has no field",
                shorthand
            )));
        }

        let field_type = FieldType::from_code(code).ok_or_else(|| {
            DomainError::validation(format!(
                "Unknown encoding type '{}' in '{}' (expected N, O, Q or T)",
                code, shorthand
            ))
        })?;

        Ok(Self::new(field, field_type))
    }
}

/// Channel encodings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<FieldDef>,
    #[serde(rename = "xOffset", skip_serializing_if = "Option::is_none")]
    pub x_offset: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldDef>,
}

impl Encoding {
    /// Fields referenced by any channel, without duplicates
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();

        for def in [&self.x, &self.x_offset, &self.y, &self.color]
            .into_iter()
            .flatten()
        {
            if !fields.contains(&def.field.as_str()) {
                fields.push(&def.field);
            }
        }

        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
}

/// Interval selection bound to the scales (pan and zoom)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub select: Selection,
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "type")]
    pub selection_type: String,
    pub encodings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub values: Vec<Map<String, JsonValue>>,
}

pub const CONTAINER_WIDTH: &str = "container";

/// Vega-Lite chart specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub data: ChartData,
    pub mark: Mark,
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// `container` to fill the enclosing element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl ChartSpec {
    /// Chart over the rows of `table`
    pub fn new(table: &LocalTable, mark_type: MarkType) -> Self {
        Self {
            schema: VEGA_LITE_SCHEMA.to_string(),
            data: ChartData {
                values: table.to_records(),
            },
            mark: Mark { mark_type },
            encoding: Encoding::default(),
            params: Vec::new(),
            width: None,
        }
    }

    pub fn bar(table: &LocalTable) -> Self {
        Self::new(table, MarkType::Bar)
    }

    pub fn x(mut self, def: FieldDef) -> Self {
        self.encoding.x = Some(def);
        self
    }

    pub fn x_offset(mut self, def: FieldDef) -> Self {
        self.encoding.x_offset = Some(def);
        self
    }

    pub fn y(mut self, def: FieldDef) -> Self {
        self.encoding.y = Some(def);
        self
    }

    pub fn color(mut self, def: FieldDef) -> Self {
        self.encoding.color = Some(def);
        self
    }

    /// Enable pan and zoom over the x and y scales
    pub fn interactive(mut self) -> Self {
        let name = format!("param_{}", self.params.len() + 1);
        self.params.push(Param {
            name,
            select: Selection {
                selection_type: "interval".to_string(),
                encodings: vec!["x".to_string(), "y".to_string()],
            },
            bind: "scales".to_string(),
        });
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.select.selection_type == "interval" && p.bind == "scales")
    }

    /// Fail if an encoded field is not a column of `table`
    ///
    /// Records are keyed by the column's own spelling and Vega-Lite matches
    /// fields exactly, so a case-only match counts as missing.
    pub fn check_fields(&self, table: &LocalTable) -> Result<(), DomainError> {
        let schema = table.schema();

        for field in self.encoding.fields() {
            if !schema.columns().iter().any(|column| column == field) {
                return Err(DomainError::missing_column(field, schema.columns()));
            }
        }
        Ok(())
    }
}

/// Options applied when a chart is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    /// Vega theme name; `None` keeps the renderer's defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub use_container_width: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            theme: None,
            use_container_width: true,
        }
    }
}

impl ChartOptions {
    /// Copy of `spec` with the options' sizing applied
    pub fn apply(&self, spec: &ChartSpec) -> ChartSpec {
        let mut spec = spec.clone();

        if self.use_container_width {
            spec.width = Some(CONTAINER_WIDTH.to_string());
        }

        spec
    }
}
