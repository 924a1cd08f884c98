use rust_decimal::Decimal;
use serde::Serialize;

use super::MonthlyAggregate;

/// How one metric moved from period A to period B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricDelta {
    pub(crate) value_a: Decimal,
    pub(crate) value_b: Decimal,
    pub(crate) difference: Decimal,
    pub(crate) percentage_change: Decimal,
    /// False when `value_a` is zero and the percentage is meaningless.
    pub(crate) has_baseline: bool,
}

impl MetricDelta {
    pub(crate) fn between(value_a: Decimal, value_b: Decimal) -> Self {
        Self {
            value_a,
            value_b,
            difference: value_b.saturating_sub(value_a),
            percentage_change: percentage_change(value_a, value_b),
            has_baseline: !value_a.is_zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ComparisonResult {
    pub(crate) money_in: MetricDelta,
    pub(crate) money_out: MetricDelta,
    pub(crate) remaining: MetricDelta,
}

/// `(current - base) / base * 100`, or 0 when `base` is 0 or the result
/// does not fit a `Decimal`.
pub(crate) fn percentage_change(base: Decimal, current: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    current
        .checked_sub(base)
        .and_then(|diff| diff.checked_div(base))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub(crate) fn compare(a: &MonthlyAggregate, b: &MonthlyAggregate) -> ComparisonResult {
    ComparisonResult {
        money_in: MetricDelta::between(a.total_money_in, b.total_money_in),
        money_out: MetricDelta::between(a.total_money_out, b.total_money_out),
        remaining: MetricDelta::between(a.remaining(), b.remaining()),
    }
}
