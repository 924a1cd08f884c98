use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::{percentage_change, MonthlyAggregate};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrendPoint {
    pub(crate) month: String,
    pub(crate) total_money_in: Decimal,
    pub(crate) total_money_out: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) average_money_in: Decimal,
    pub(crate) average_money_out: Decimal,
    /// Positive money in entries plus positive money out entries.
    pub(crate) transaction_count: usize,
    pub(crate) money_in_growth: Decimal,
    pub(crate) money_out_growth: Decimal,
    pub(crate) remaining_growth: Decimal,
}

impl TrendPoint {
    fn from_aggregate(agg: &MonthlyAggregate) -> Self {
        Self {
            month: agg.month.clone(),
            total_money_in: agg.total_money_in,
            total_money_out: agg.total_money_out,
            remaining: agg.remaining(),
            average_money_in: average(agg.total_money_in, agg.money_in_count),
            average_money_out: average(agg.total_money_out, agg.money_out_count),
            transaction_count: agg.money_in_count + agg.money_out_count,
            money_in_growth: Decimal::ZERO,
            money_out_growth: Decimal::ZERO,
            remaining_growth: Decimal::ZERO,
        }
    }
}

/// Period-over-period growth for aggregates already in ascending month
/// order. The first point has zero growth; order and length are kept.
pub(crate) fn build_trend(aggregates: &[MonthlyAggregate]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = aggregates.iter().map(TrendPoint::from_aggregate).collect();

    for i in 1..points.len() {
        let (prev, cur) = (&points[i - 1], &points[i]);
        let money_in = growth(prev.total_money_in, cur.total_money_in);
        let money_out = growth(prev.total_money_out, cur.total_money_out);
        let remaining = growth(prev.remaining, cur.remaining);

        let point = &mut points[i];
        point.money_in_growth = money_in;
        point.money_out_growth = money_out;
        point.remaining_growth = remaining;
    }
    points
}

fn growth(prev: Decimal, cur: Decimal) -> Decimal {
    percentage_change(prev, cur).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total
        .checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO)
}
