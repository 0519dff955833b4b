//! Value types for the report catalog. Pure data, no DB dependency.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// Category of underlying records a report can be built from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportSource {
    Reservation,
    Payment,
    Ledger,
    Payout,
    Support,
    Task,
    Marketing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DimensionKind {
    Date,
    Enum,
    String,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeGrain {
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Aggregation {
    Count,
    Sum,
    Avg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricType {
    Number,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeRangePreset {
    Last7Days,
    Last30Days,
    Last60Days,
    Last90Days,
    Last180Days,
    Last12Months,
}

/// A groupable attribute of a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ReportDimensionSpec {
    pub id: String,
    pub label: String,
    pub field: String,
    pub kind: DimensionKind,
    pub time_grain: Option<TimeGrain>,
    /// Bucket for records with no value in `field`.
    pub fallback: Option<String>,
}

/// An aggregatable attribute of a source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ReportMetricSpec {
    pub id: String,
    pub label: String,
    pub field: String,
    pub aggregation: Aggregation,
    pub value_type: MetricType,
    pub format: Option<String>,
}

/// A filterable predicate available for a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ReportFilterSpec {
    pub id: String,
    pub label: String,
    pub field: String,
    pub kind: DimensionKind,
    pub operators: Vec<FilterOperator>,
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct ReportTimeRange {
    pub preset: TimeRangePreset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SamplingSpec {
    pub limit: u32,
}

/// A named, pre-configured report template. `dimensions` and `metrics`
/// reference ids in the source's library by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ReportSpec {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub source: ReportSource,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub default_time_range: ReportTimeRange,
    pub chart_types: Vec<ChartKind>,
    pub default_chart: ChartKind,
    pub sampling: SamplingSpec,
    pub heavy: bool,
}
