mod aggregate;
mod compare;
mod trend;

pub(crate) use aggregate::{
    aggregate_by_category, aggregate_by_month, recent_months, summarize, CategoryAggregate,
    CategoryScope, MonthlyAggregate,
};
pub(crate) use compare::{compare, percentage_change, ComparisonResult, MetricDelta};
pub(crate) use trend::{build_trend, TrendPoint};
