// Wire and domain models shared by intake, the HTTP client and the renderer

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A file ready to be posted to the upload endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Successful `/upload` response: the column manifest and the server-side filename token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub columns: Vec<String>,
    pub filename: String,
}

/// Error payload returned by either endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// The seven logical roles a CSV column can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SemanticField {
    CustomerId,
    Quantity,
    UnitPrice,
    InvoiceDate,
    Description,
    Country,
    InvoiceNo,
}

impl SemanticField {
    /// Selector order in the mapping panel
    pub const ALL: [SemanticField; 7] = [
        SemanticField::CustomerId,
        SemanticField::Quantity,
        SemanticField::UnitPrice,
        SemanticField::InvoiceDate,
        SemanticField::Description,
        SemanticField::Country,
        SemanticField::InvoiceNo,
    ];

    /// Key used in the `column_map` payload
    pub fn key(self) -> &'static str {
        match self {
            SemanticField::CustomerId => "customer_id_col",
            SemanticField::Quantity => "quantity_col",
            SemanticField::UnitPrice => "unit_price_col",
            SemanticField::InvoiceDate => "invoice_date_col",
            SemanticField::Description => "description_col",
            SemanticField::Country => "country_col",
            SemanticField::InvoiceNo => "invoiceno_col",
        }
    }

    /// Human label shown next to the selector
    pub fn label(self) -> &'static str {
        match self {
            SemanticField::CustomerId => "Customer ID",
            SemanticField::Quantity => "Quantity",
            SemanticField::UnitPrice => "Unit Price",
            SemanticField::InvoiceDate => "Invoice Date",
            SemanticField::Description => "Product Description",
            SemanticField::Country => "Country",
            SemanticField::InvoiceNo => "InvoiceNo",
        }
    }

    /// Accepts a payload key (`customer_id_col`) or its short form (`customer_id`)
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|field| {
            let full = field.key();
            key == full || Some(key.as_str()) == full.strip_suffix("_col")
        })
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column chosen for each semantic field; an empty string means unset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldMapping {
    pub customer_id_col: String,
    pub quantity_col: String,
    pub unit_price_col: String,
    pub invoice_date_col: String,
    pub description_col: String,
    pub country_col: String,
    pub invoiceno_col: String,
}

impl FieldMapping {
    pub fn get(&self, field: SemanticField) -> &str {
        match field {
            SemanticField::CustomerId => &self.customer_id_col,
            SemanticField::Quantity => &self.quantity_col,
            SemanticField::UnitPrice => &self.unit_price_col,
            SemanticField::InvoiceDate => &self.invoice_date_col,
            SemanticField::Description => &self.description_col,
            SemanticField::Country => &self.country_col,
            SemanticField::InvoiceNo => &self.invoiceno_col,
        }
    }

    pub fn set(&mut self, field: SemanticField, column: impl Into<String>) {
        let slot = match field {
            SemanticField::CustomerId => &mut self.customer_id_col,
            SemanticField::Quantity => &mut self.quantity_col,
            SemanticField::UnitPrice => &mut self.unit_price_col,
            SemanticField::InvoiceDate => &mut self.invoice_date_col,
            SemanticField::Description => &mut self.description_col,
            SemanticField::Country => &mut self.country_col,
            SemanticField::InvoiceNo => &mut self.invoiceno_col,
        };
        *slot = column.into();
    }
}

/// Body of `POST /analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<&'a str>,
    pub column_map: &'a FieldMapping,
}

/// A scalar metric as the server sent it
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Text(String),
    Number(f64),
}

impl MetricValue {
    /// `None` for null, empty strings and non-scalar values
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(MetricValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(MetricValue::Number),
            _ => None,
        }
    }

    pub fn is_not_available(&self) -> bool {
        matches!(self, MetricValue::Text(s) if s.trim() == "N/A")
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            MetricValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Aggregated `/analyze` payload, kept as the raw JSON object so that every
/// key stays independently optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    /// Accepts only JSON objects
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Logical error carried by a 2xx payload
    pub fn error(&self) -> Option<String> {
        match self.0.get("error")? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn metric(&self, key: &str) -> Option<MetricValue> {
        self.0.get(key).and_then(MetricValue::from_json)
    }

    /// Report rows, `None` when absent, null, not a sequence or empty
    pub fn rows(&self, key: &str) -> Option<&[Value]> {
        match self.0.get(key)? {
            Value::Array(rows) if !rows.is_empty() => Some(rows.as_slice()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
