//! Static report catalog: per-source dimension/metric/filter libraries and
//! the template list they parametrize. Loaded once at process start, never
//! mutated. All lookups are synchronous reads; unknown keys resolve to
//! `None`/empty rather than an error.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::report_types::{
    Aggregation, ChartKind, DimensionKind, FilterOperator, MetricType, ReportDimensionSpec,
    ReportFilterSpec, ReportMetricSpec, ReportSource, ReportSpec, ReportTimeRange, SamplingSpec,
    TimeGrain, TimeRangePreset,
};

/// Dimensions, metrics and filters available for one report source.
#[derive(Debug, Clone)]
pub struct SourceLibrary {
    pub dimensions: Vec<ReportDimensionSpec>,
    pub metrics: Vec<ReportMetricSpec>,
    pub filters: Vec<ReportFilterSpec>,
}

/// Query options for [`get_catalog`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_heavy: bool,
}

fn date_dim(id: &str, label: &str, field: &str, grain: TimeGrain) -> ReportDimensionSpec {
    ReportDimensionSpec {
        id: id.to_string(),
        label: label.to_string(),
        field: field.to_string(),
        kind: DimensionKind::Date,
        time_grain: Some(grain),
        fallback: None,
    }
}

fn dim(id: &str, label: &str, field: &str, kind: DimensionKind) -> ReportDimensionSpec {
    ReportDimensionSpec {
        id: id.to_string(),
        label: label.to_string(),
        field: field.to_string(),
        kind,
        time_grain: None,
        fallback: None,
    }
}

fn dim_fb(
    id: &str,
    label: &str,
    field: &str,
    kind: DimensionKind,
    fallback: &str,
) -> ReportDimensionSpec {
    ReportDimensionSpec {
        fallback: Some(fallback.to_string()),
        ..dim(id, label, field, kind)
    }
}

fn count_metric(id: &str, label: &str, field: &str) -> ReportMetricSpec {
    ReportMetricSpec {
        id: id.to_string(),
        label: label.to_string(),
        field: field.to_string(),
        aggregation: Aggregation::Count,
        value_type: MetricType::Number,
        format: None,
    }
}

fn sum_metric(id: &str, label: &str, field: &str) -> ReportMetricSpec {
    ReportMetricSpec {
        aggregation: Aggregation::Sum,
        ..count_metric(id, label, field)
    }
}

fn currency_metric(id: &str, label: &str, field: &str, aggregation: Aggregation) -> ReportMetricSpec {
    ReportMetricSpec {
        id: id.to_string(),
        label: label.to_string(),
        field: field.to_string(),
        aggregation,
        value_type: MetricType::Currency,
        format: Some("currency".to_string()),
    }
}

fn avg_metric(id: &str, label: &str, field: &str) -> ReportMetricSpec {
    ReportMetricSpec {
        aggregation: Aggregation::Avg,
        ..count_metric(id, label, field)
    }
}

fn filter(id: &str, label: &str, field: &str, kind: DimensionKind) -> ReportFilterSpec {
    ReportFilterSpec {
        id: id.to_string(),
        label: label.to_string(),
        field: field.to_string(),
        kind,
        operators: vec![FilterOperator::Eq, FilterOperator::In],
        options: None,
    }
}

fn filter_opts(
    id: &str,
    label: &str,
    field: &str,
    kind: DimensionKind,
    options: &[&str],
) -> ReportFilterSpec {
    ReportFilterSpec {
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        ..filter(id, label, field, kind)
    }
}

fn reservation_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            date_dim("booked_day", "Booked Day", "created_at", TimeGrain::Day),
            date_dim("booked_week", "Booked Week", "created_at", TimeGrain::Week),
            date_dim("booked_month", "Booked Month", "created_at", TimeGrain::Month),
            date_dim("arrival_day", "Arrival Day", "arrival_date", TimeGrain::Day),
            date_dim("arrival_month", "Arrival Month", "arrival_date", TimeGrain::Month),
            dim("status", "Status", "status", DimensionKind::Enum),
            dim_fb("source", "Source", "source", DimensionKind::Enum, "unknown"),
            dim("stay_type", "Stay Type", "stay_type", DimensionKind::Enum),
            dim_fb("rig_type", "Rig Type", "rig_type", DimensionKind::Enum, "unspecified"),
            dim_fb("promo_code", "Promo Code", "promo_code", DimensionKind::String, "none"),
            dim("lead_time_bucket", "Lead Time Bucket", "lead_time_days", DimensionKind::Number),
            dim("length_of_stay", "Length of Stay", "nights", DimensionKind::Number),
        ],
        metrics: vec![
            count_metric("bookings", "Bookings", "id"),
            currency_metric("revenue", "Gross Revenue", "total_amount", Aggregation::Sum),
            currency_metric("paid", "Paid Amount", "paid_amount", Aggregation::Sum),
            currency_metric("balance", "Outstanding Balance", "balance_amount", Aggregation::Sum),
            currency_metric("adr", "ADR", "total_amount", Aggregation::Avg),
            avg_metric("lead_time_avg", "Avg Lead Time (days)", "lead_time_days"),
        ],
        filters: vec![
            filter_opts(
                "status",
                "Status",
                "status",
                DimensionKind::Enum,
                &["pending", "confirmed", "cancelled", "checked_in", "checked_out"],
            ),
            filter("source", "Source", "source", DimensionKind::Enum),
            filter_opts(
                "stay_type",
                "Stay Type",
                "stay_type",
                DimensionKind::Enum,
                &["standard", "group", "long_term"],
            ),
        ],
    }
}

fn payment_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            date_dim("paid_day", "Paid Day", "created_at", TimeGrain::Day),
            date_dim("paid_week", "Paid Week", "created_at", TimeGrain::Week),
            date_dim("paid_month", "Paid Month", "created_at", TimeGrain::Month),
            dim("method", "Payment Method", "method", DimensionKind::Enum),
            dim("direction", "Direction", "direction", DimensionKind::Enum),
        ],
        metrics: vec![
            count_metric("payments", "Payments", "id"),
            currency_metric("amount", "Amount", "amount_cents", Aggregation::Sum),
            currency_metric("fees", "Platform Fees", "stripe_fee_cents", Aggregation::Sum),
        ],
        filters: vec![
            filter("method", "Method", "method", DimensionKind::String),
            filter_opts(
                "direction",
                "Direction",
                "direction",
                DimensionKind::Enum,
                &["charge", "refund"],
            ),
        ],
    }
}

fn ledger_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            date_dim("ledger_day", "Entry Day", "occurred_at", TimeGrain::Day),
            date_dim("ledger_month", "Entry Month", "occurred_at", TimeGrain::Month),
            dim_fb("gl_code", "GL Code", "gl_code", DimensionKind::String, "unassigned"),
            dim("direction", "Direction", "direction", DimensionKind::Enum),
        ],
        metrics: vec![
            currency_metric("ledger_amount", "Ledger Amount", "amount_cents", Aggregation::Sum),
            count_metric("ledger_entries", "Entries", "id"),
        ],
        filters: vec![
            filter("gl_code", "GL Code", "gl_code", DimensionKind::String),
            filter_opts(
                "direction",
                "Direction",
                "direction",
                DimensionKind::Enum,
                &["debit", "credit"],
            ),
        ],
    }
}

fn payout_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            date_dim("payout_day", "Payout Day", "arrival_date", TimeGrain::Day),
            date_dim("payout_month", "Payout Month", "arrival_date", TimeGrain::Month),
            dim("status", "Status", "status", DimensionKind::Enum),
            dim("currency", "Currency", "currency", DimensionKind::Enum),
        ],
        metrics: vec![
            currency_metric("payout_amount", "Payout Amount", "amount_cents", Aggregation::Sum),
            currency_metric("payout_fee", "Payout Fees", "fee_cents", Aggregation::Sum),
        ],
        filters: vec![
            filter_opts(
                "status",
                "Status",
                "status",
                DimensionKind::Enum,
                &["pending", "in_transit", "paid", "failed", "canceled"],
            ),
            filter("currency", "Currency", "currency", DimensionKind::String),
        ],
    }
}

fn support_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            date_dim("support_day", "Created Day", "created_at", TimeGrain::Day),
            date_dim("support_month", "Created Month", "created_at", TimeGrain::Month),
            dim("status", "Status", "status", DimensionKind::Enum),
            dim("path", "Path", "path", DimensionKind::String),
            dim("language", "Language", "language", DimensionKind::String),
        ],
        metrics: vec![count_metric("support_tickets", "Tickets", "id")],
        filters: vec![
            filter("status", "Status", "status", DimensionKind::Enum),
            filter("path", "Path", "path", DimensionKind::String),
        ],
    }
}

fn task_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            date_dim("task_day", "Task Day", "created_at", TimeGrain::Day),
            date_dim("task_month", "Task Month", "created_at", TimeGrain::Month),
            dim("state", "State", "state", DimensionKind::Enum),
            dim("sla_status", "SLA Status", "sla_status", DimensionKind::Enum),
            dim("type", "Task Type", "type", DimensionKind::Enum),
        ],
        metrics: vec![count_metric("tasks", "Tasks", "id")],
        filters: vec![
            filter_opts(
                "state",
                "State",
                "state",
                DimensionKind::Enum,
                &["pending", "in_progress", "done"],
            ),
            filter_opts(
                "sla_status",
                "SLA Status",
                "sla_status",
                DimensionKind::Enum,
                &["on_track", "at_risk", "breached"],
            ),
        ],
    }
}

fn marketing_library() -> SourceLibrary {
    SourceLibrary {
        dimensions: vec![
            dim_fb("campaign", "Campaign", "campaign", DimensionKind::String, "unknown"),
            dim_fb("channel", "Channel", "channel", DimensionKind::String, "direct"),
            dim_fb("medium", "Medium", "medium", DimensionKind::String, "unspecified"),
            date_dim("attributed_day", "Attributed Day", "created_at", TimeGrain::Day),
            date_dim("attributed_month", "Attributed Month", "created_at", TimeGrain::Month),
        ],
        metrics: vec![
            count_metric("touches", "Touches", "id"),
            sum_metric("conversions", "Attributed Bookings", "conversions"),
        ],
        filters: vec![
            filter("channel", "Channel", "channel", DimensionKind::String),
            filter("campaign", "Campaign", "campaign", DimensionKind::String),
        ],
    }
}

static LIBRARIES: Lazy<HashMap<ReportSource, SourceLibrary>> = Lazy::new(|| {
    HashMap::from([
        (ReportSource::Reservation, reservation_library()),
        (ReportSource::Payment, payment_library()),
        (ReportSource::Ledger, ledger_library()),
        (ReportSource::Payout, payout_library()),
        (ReportSource::Support, support_library()),
        (ReportSource::Task, task_library()),
        (ReportSource::Marketing, marketing_library()),
    ])
});

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    category: &str,
    source: ReportSource,
    dimensions: &[&str],
    metrics: &[&str],
    preset: TimeRangePreset,
    chart_types: &[ChartKind],
    default_chart: ChartKind,
    limit: u32,
) -> ReportSpec {
    ReportSpec {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        category: category.to_string(),
        source,
        dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
        metrics: metrics.iter().map(|m| m.to_string()).collect(),
        default_time_range: ReportTimeRange { preset },
        chart_types: chart_types.to_vec(),
        default_chart,
        sampling: SamplingSpec { limit },
        heavy: false,
    }
}

fn heavy(spec: ReportSpec) -> ReportSpec {
    ReportSpec { heavy: true, ..spec }
}

fn booking_templates() -> Vec<ReportSpec> {
    use ChartKind::{Bar, Line, Pie, Table};
    use ReportSource::Reservation;
    use TimeRangePreset::*;
    vec![
        template("bookings.daily_bookings", "Daily bookings", "Bookings", Reservation, &["booked_day"], &["bookings", "revenue", "paid"], Last30Days, &[Line, Bar, Table], Line, 4000),
        template("bookings.weekly_bookings", "Weekly bookings", "Bookings", Reservation, &["booked_week"], &["bookings", "revenue"], Last12Months, &[Line, Bar, Table], Line, 4000),
        template("bookings.monthly_revenue", "Monthly revenue", "Bookings", Reservation, &["booked_month"], &["revenue", "adr"], Last12Months, &[Line, Bar, Table], Bar, 4000),
        template("bookings.channel_mix", "Channel mix", "Bookings", Reservation, &["source"], &["bookings", "revenue"], Last30Days, &[Pie, Bar, Table], Pie, 4000),
        template("bookings.status_funnel", "Status funnel", "Bookings", Reservation, &["status"], &["bookings", "revenue"], Last30Days, &[Bar, Pie, Table], Bar, 4000),
        template("bookings.lead_time", "Lead time distribution", "Bookings", Reservation, &["lead_time_bucket"], &["bookings", "lead_time_avg"], Last90Days, &[Bar, Table], Bar, 5000),
        template("bookings.length_of_stay", "Length of stay", "Bookings", Reservation, &["length_of_stay"], &["bookings", "revenue"], Last90Days, &[Bar, Table], Bar, 5000),
        template("bookings.promo_performance", "Promo code performance", "Bookings", Reservation, &["promo_code"], &["bookings", "revenue"], Last90Days, &[Bar, Table, Pie], Bar, 5000),
        template("bookings.stay_type_mix", "Stay type mix", "Bookings", Reservation, &["stay_type"], &["bookings", "revenue"], Last90Days, &[Pie, Table, Bar], Pie, 4000),
        template("bookings.rig_type_mix", "Rig type mix", "Bookings", Reservation, &["rig_type"], &["bookings", "revenue"], Last180Days, &[Pie, Table, Bar], Pie, 5000),
        template("bookings.arrival_month", "Arrivals by month", "Bookings", Reservation, &["arrival_month"], &["bookings", "revenue"], Last12Months, &[Line, Bar, Table], Line, 5000),
        template("bookings.arrival_day", "Arrivals by day", "Bookings", Reservation, &["arrival_day"], &["bookings", "revenue"], Last30Days, &[Line, Table], Line, 5000),
        template("bookings.cancellation_rate", "Cancellation share", "Bookings", Reservation, &["status"], &["bookings"], Last90Days, &[Pie, Table], Pie, 5000),
        template("bookings.adr_by_source", "ADR by source", "Bookings", Reservation, &["source"], &["adr", "revenue"], Last90Days, &[Bar, Table], Bar, 5000),
        template("bookings.balance_by_status", "Balance by status", "Bookings", Reservation, &["status"], &["balance", "paid"], Last60Days, &[Bar, Table], Bar, 5000),
    ]
}

fn inventory_templates() -> Vec<ReportSpec> {
    use ChartKind::{Bar, Line, Pie, Table};
    use ReportSource::Reservation;
    use TimeRangePreset::*;
    vec![
        template("inventory.arrival_load_day", "Arrival load by day", "Inventory", Reservation, &["arrival_day"], &["bookings"], Last30Days, &[Line, Table], Line, 4000),
        template("inventory.arrival_load_month", "Arrival load by month", "Inventory", Reservation, &["arrival_month"], &["bookings"], Last12Months, &[Bar, Line, Table], Bar, 5000),
        template("inventory.status_mix", "Reservation status mix", "Inventory", Reservation, &["status"], &["bookings"], Last30Days, &[Pie, Bar, Table], Pie, 4000),
        template("inventory.stay_type_load", "Stay type load", "Inventory", Reservation, &["stay_type"], &["bookings"], Last60Days, &[Bar, Table], Bar, 5000),
        template("inventory.rig_type_load", "Rig type load", "Inventory", Reservation, &["rig_type"], &["bookings"], Last90Days, &[Bar, Pie, Table], Bar, 5000),
        heavy(template("inventory.lead_time_forecast", "Lead time forecast", "Inventory", Reservation, &["lead_time_bucket"], &["bookings"], Last180Days, &[Bar, Table], Bar, 5000)),
        template("inventory.length_of_stay_mix", "Length-of-stay mix", "Inventory", Reservation, &["length_of_stay"], &["bookings"], Last90Days, &[Bar, Table], Bar, 5000),
        heavy(template("inventory.arrival_vs_booked", "Arrival vs booked month", "Inventory", Reservation, &["arrival_month", "booked_month"], &["bookings"], Last12Months, &[Table], Table, 5000)),
        template("inventory.promo_impact", "Promo impact on occupancy", "Inventory", Reservation, &["promo_code"], &["bookings", "adr"], Last180Days, &[Bar, Table], Bar, 5000),
        template("inventory.balance_watch", "Balance watchlist", "Inventory", Reservation, &["status"], &["balance"], Last30Days, &[Table, Bar], Table, 3000),
    ]
}

fn payment_templates() -> Vec<ReportSpec> {
    use ChartKind::{Bar, Line, Pie, Table};
    use ReportSource::{Payment, Payout};
    use TimeRangePreset::*;
    vec![
        template("payments.daily_cashflow", "Daily cashflow", "Payments", Payment, &["paid_day"], &["amount", "payments"], Last30Days, &[Line, Bar, Table], Line, 4000),
        template("payments.weekly_cashflow", "Weekly cashflow", "Payments", Payment, &["paid_week"], &["amount"], Last90Days, &[Line, Bar, Table], Line, 4000),
        template("payments.method_mix", "Method mix", "Payments", Payment, &["method"], &["amount", "payments"], Last90Days, &[Pie, Bar, Table], Pie, 4000),
        template("payments.direction_mix", "Charges vs refunds", "Payments", Payment, &["direction"], &["amount", "payments"], Last60Days, &[Bar, Pie, Table], Bar, 4000),
        template("payments.refund_rate", "Refund rate", "Payments", Payment, &["direction"], &["payments"], Last180Days, &[Pie, Table], Pie, 4000),
        template("payments.fees", "Processor fees", "Payments", Payment, &["paid_month"], &["fees", "amount"], Last12Months, &[Bar, Table], Bar, 4000),
        template("payments.avg_ticket", "Average ticket", "Payments", Payment, &["paid_month"], &["amount"], Last12Months, &[Line, Table], Line, 4000),
        template("payments.charge_volume", "Charge volume", "Payments", Payment, &["paid_month"], &["payments"], Last12Months, &[Line, Table], Line, 4000),
        template("payments.method_success", "Method success rate", "Payments", Payment, &["method"], &["payments"], Last90Days, &[Bar, Table], Bar, 4000),
        heavy(template("payments.payout_alignment", "Payout alignment", "Payments", Payout, &["payout_month", "status"], &["payout_amount", "payout_fee"], Last12Months, &[Table, Bar], Table, 4000)),
    ]
}

fn ledger_templates() -> Vec<ReportSpec> {
    use ChartKind::{Bar, Line, Pie, Table};
    use ReportSource::Ledger;
    use TimeRangePreset::*;
    vec![
        template("ledger.entries_month", "Ledger entries by month", "Payments", Ledger, &["ledger_month"], &["ledger_amount", "ledger_entries"], Last12Months, &[Bar, Table], Bar, 5000),
        template("ledger.gl_code_mix", "GL code mix", "Payments", Ledger, &["gl_code"], &["ledger_amount", "ledger_entries"], Last90Days, &[Bar, Table], Bar, 5000),
        template("ledger.debits_credits", "Debits vs credits", "Payments", Ledger, &["direction"], &["ledger_amount", "ledger_entries"], Last90Days, &[Pie, Bar, Table], Pie, 5000),
        template("ledger.daily_entries", "Daily ledger entries", "Payments", Ledger, &["ledger_day"], &["ledger_amount"], Last30Days, &[Line, Table], Line, 4000),
        heavy(template("ledger.monthly_net", "Monthly net ledger", "Payments", Ledger, &["ledger_month", "direction"], &["ledger_amount"], Last12Months, &[Table], Table, 5000)),
    ]
}

fn operations_templates() -> Vec<ReportSpec> {
    use ChartKind::{Bar, Line, Pie, Table};
    use ReportSource::{Support, Task};
    use TimeRangePreset::*;
    vec![
        template("ops.tasks_by_state", "Tasks by state", "Operations", Task, &["state"], &["tasks"], Last30Days, &[Bar, Table], Bar, 4000),
        template("ops.tasks_by_day", "Tasks by day", "Operations", Task, &["task_day"], &["tasks"], Last30Days, &[Line, Table], Line, 4000),
        template("ops.tasks_by_sla", "Tasks by SLA status", "Operations", Task, &["sla_status"], &["tasks"], Last60Days, &[Bar, Pie, Table], Bar, 4000),
        template("ops.tasks_by_type", "Tasks by type", "Operations", Task, &["type"], &["tasks"], Last60Days, &[Pie, Table], Pie, 4000),
        template("ops.support_volume_day", "Support volume by day", "Operations", Support, &["support_day"], &["support_tickets"], Last30Days, &[Line, Table], Line, 4000),
        template("ops.support_status", "Support by status", "Operations", Support, &["status"], &["support_tickets"], Last30Days, &[Pie, Bar, Table], Pie, 4000),
        template("ops.support_paths", "Support by path", "Operations", Support, &["path"], &["support_tickets"], Last60Days, &[Bar, Table], Bar, 5000),
        template("ops.support_language", "Support by language", "Operations", Support, &["language"], &["support_tickets"], Last90Days, &[Bar, Table], Bar, 5000),
        template("ops.tasks_month", "Tasks by month", "Operations", Task, &["task_month"], &["tasks"], Last12Months, &[Line, Table], Line, 5000),
        heavy(template("ops.tasks_state_month", "Task state by month", "Operations", Task, &["task_month", "state"], &["tasks"], Last12Months, &[Table], Table, 5000)),
    ]
}

fn marketing_templates() -> Vec<ReportSpec> {
    use ChartKind::{Bar, Line, Pie, Table};
    use ReportSource::Marketing;
    use TimeRangePreset::*;
    vec![
        template("marketing.channel_mix", "Channel mix", "Marketing", Marketing, &["channel"], &["touches"], Last90Days, &[Pie, Bar, Table], Pie, 5000),
        template("marketing.campaign_performance", "Campaign performance", "Marketing", Marketing, &["campaign"], &["touches", "conversions"], Last180Days, &[Bar, Table], Bar, 5000),
        template("marketing.medium_mix", "Medium mix", "Marketing", Marketing, &["medium"], &["touches"], Last180Days, &[Pie, Bar, Table], Pie, 5000),
        template("marketing.channel_trend", "Channel trend", "Marketing", Marketing, &["attributed_month"], &["touches"], Last12Months, &[Line, Table], Line, 5000),
        heavy(template("marketing.campaign_trend", "Campaign trend", "Marketing", Marketing, &["attributed_month", "campaign"], &["touches"], Last12Months, &[Table], Table, 5000)),
        template("marketing.conversion_by_channel", "Conversions by channel", "Marketing", Marketing, &["channel"], &["conversions"], Last180Days, &[Bar, Table], Bar, 5000),
        template("marketing.conversion_by_campaign", "Conversions by campaign", "Marketing", Marketing, &["campaign"], &["conversions"], Last180Days, &[Bar, Table], Bar, 5000),
        heavy(template("marketing.channel_medium", "Channel by medium", "Marketing", Marketing, &["channel", "medium"], &["touches"], Last180Days, &[Table], Table, 5000)),
    ]
}

static DEFINITIONS: Lazy<Vec<ReportSpec>> = Lazy::new(|| {
    let mut defs = booking_templates();
    defs.extend(inventory_templates());
    defs.extend(payment_templates());
    defs.extend(ledger_templates());
    defs.extend(operations_templates());
    defs.extend(marketing_templates());
    defs
});

/// Filtered view of the template catalog. Category is an exact match,
/// search is a case-insensitive substring over name + id + description,
/// and heavy templates are hidden unless asked for.
pub fn get_catalog(query: &CatalogQuery) -> Vec<&'static ReportSpec> {
    let search = query.search.as_ref().map(|s| s.to_lowercase());
    DEFINITIONS
        .iter()
        .filter(|def| {
            if let Some(category) = &query.category {
                if def.category != *category {
                    return false;
                }
            }
            if def.heavy && !query.include_heavy {
                return false;
            }
            if let Some(search) = &search {
                let haystack = format!(
                    "{} {} {}",
                    def.name,
                    def.id,
                    def.description.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                if !haystack.contains(search.as_str()) {
                    return false;
                }
            }
            true
        })
        .collect()
}

pub fn get_report_spec(id: &str) -> Option<&'static ReportSpec> {
    DEFINITIONS.iter().find(|d| d.id == id)
}

pub fn resolve_dimension(source: ReportSource, id: &str) -> Option<&'static ReportDimensionSpec> {
    LIBRARIES
        .get(&source)
        .and_then(|lib| lib.dimensions.iter().find(|d| d.id == id))
}

pub fn resolve_metric(source: ReportSource, id: &str) -> Option<&'static ReportMetricSpec> {
    LIBRARIES
        .get(&source)
        .and_then(|lib| lib.metrics.iter().find(|m| m.id == id))
}

pub fn resolve_filters(source: ReportSource) -> &'static [ReportFilterSpec] {
    LIBRARIES
        .get(&source)
        .map(|lib| lib.filters.as_slice())
        .unwrap_or_default()
}

pub fn registry_size() -> usize {
    DEFINITIONS.len()
}

/// Startup self-check: every dimension/metric id referenced by a template
/// must exist in its source's library. A failure here is a programmer
/// error in the tables above, so the server refuses to start on it.
pub fn validate() -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    for def in DEFINITIONS.iter() {
        for dim_id in &def.dimensions {
            if resolve_dimension(def.source, dim_id).is_none() {
                errors.push(format!(
                    "template {} references unknown dimension {} for source {}",
                    def.id, dim_id, def.source
                ));
            }
        }
        for metric_id in &def.metrics {
            if resolve_metric(def.source, metric_id).is_none() {
                errors.push(format!(
                    "template {} references unknown metric {} for source {}",
                    def.id, metric_id, def.source
                ));
            }
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_filters_by_category_exactly() {
        let all = get_catalog(&CatalogQuery {
            include_heavy: true,
            ..Default::default()
        });
        let bookings = get_catalog(&CatalogQuery {
            category: Some("Bookings".to_string()),
            include_heavy: true,
            ..Default::default()
        });
        assert!(!bookings.is_empty());
        assert!(bookings.iter().all(|t| t.category == "Bookings"));
        let other = all.iter().filter(|t| t.category == "Bookings").count();
        assert_eq!(bookings.len(), other);
    }

    #[test]
    fn heavy_templates_hidden_by_default() {
        let visible = get_catalog(&CatalogQuery::default());
        assert!(visible.iter().all(|t| !t.heavy));

        let all = get_catalog(&CatalogQuery {
            include_heavy: true,
            ..Default::default()
        });
        assert!(all.iter().any(|t| t.heavy));
        assert!(all.len() > visible.len());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_id() {
        let hits = get_catalog(&CatalogQuery {
            search: Some("DAILY".to_string()),
            ..Default::default()
        });
        let ids: Vec<&str> = hits.iter().map(|t| t.id.as_str()).collect();
        assert!(ids.contains(&"bookings.daily_bookings"));
        assert!(ids.contains(&"payments.daily_cashflow"));
    }

    #[test]
    fn search_matches_template_id_text() {
        let hits = get_catalog(&CatalogQuery {
            search: Some("ledger.gl_code".to_string()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ledger.gl_code_mix");
    }

    #[test]
    fn empty_query_returns_all_non_heavy_templates() {
        let visible = get_catalog(&CatalogQuery::default());
        assert_eq!(
            visible.len(),
            registry_size() - DEFINITIONS.iter().filter(|t| t.heavy).count()
        );
    }

    #[test]
    fn get_report_spec_finds_by_exact_id() {
        let spec = get_report_spec("bookings.monthly_revenue").expect("known template");
        assert_eq!(spec.source, ReportSource::Reservation);
        assert_eq!(spec.metrics, vec!["revenue", "adr"]);
        assert!(get_report_spec("bookings.nonexistent").is_none());
    }

    #[test]
    fn resolver_lookups_are_total() {
        let status = resolve_dimension(ReportSource::Reservation, "status").expect("known");
        assert_eq!(status.kind, DimensionKind::Enum);

        assert!(resolve_dimension(ReportSource::Reservation, "nonexistent").is_none());
        assert!(resolve_metric(ReportSource::Payment, "nonexistent").is_none());

        let revenue = resolve_metric(ReportSource::Reservation, "revenue").expect("known");
        assert_eq!(revenue.aggregation, Aggregation::Sum);
        assert_eq!(revenue.value_type, MetricType::Currency);
    }

    #[test]
    fn filters_resolve_per_source() {
        let filters = resolve_filters(ReportSource::Payment);
        assert_eq!(filters.len(), 2);
        let direction = filters.iter().find(|f| f.id == "direction").expect("known");
        assert_eq!(
            direction.options.as_deref(),
            Some(["charge".to_string(), "refund".to_string()].as_slice())
        );
    }

    #[test]
    fn registry_size_counts_every_template_group() {
        // 15 bookings + 10 inventory + 10 payments + 5 ledger + 10 ops + 8 marketing
        assert_eq!(registry_size(), 58);
    }

    #[test]
    fn every_template_reference_resolves() {
        assert_eq!(validate(), Ok(()));
    }
}
