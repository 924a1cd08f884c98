use rust_decimal::Decimal;
use serde::Serialize;

/// Which side of the ledger an imported amount lands on when the source
/// row has no explicit money in / money out columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    MoneyOut,
    MoneyIn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Option<i64>,
    pub user_id: String,
    /// Format: "YYYY-MM"
    pub month: String,
    pub item_name: String,
    pub category: String,
    pub amount: Decimal,
    pub money_in: Decimal,
    pub money_out: Decimal,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TransactionRecord {
    pub fn new(user_id: String, month: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            user_id,
            month,
            item_name: String::new(),
            category: String::new(),
            amount: Decimal::ZERO,
            money_in: Decimal::ZERO,
            money_out: Decimal::ZERO,
            notes: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Book `amount` on one side of the ledger, leaving the other at zero.
    pub fn book(&mut self, amount: Decimal, direction: Direction) {
        self.amount = amount;
        match direction {
            Direction::MoneyOut => {
                self.money_out = amount;
                self.money_in = Decimal::ZERO;
            }
            Direction::MoneyIn => {
                self.money_in = amount;
                self.money_out = Decimal::ZERO;
            }
        }
    }

    /// Category used for grouping; blank categories collapse to "Uncategorized".
    pub fn category_label(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }
}

pub const UNCATEGORIZED: &str = "Uncategorized";
