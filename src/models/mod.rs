mod record;

pub use record::{Direction, TransactionRecord};
