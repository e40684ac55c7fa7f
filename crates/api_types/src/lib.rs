use serde::{Deserialize, Serialize};

/// Server-assigned numeric identifier shared by every entity kind.
pub type EntityId = i64;

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Success marker returned to callers after a delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Deleted {
    pub success: bool,
}

/// Serde helpers for wire dates that may carry a time component.
///
/// The server emits ISO-8601 date or date-time strings; only the
/// portion before `T` is significant. Malformed input deserializes as
/// `None` rather than failing the whole record.
pub mod date_only {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    /// Parses the date portion of an ISO date or date-time string.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let date_part = raw.split('T').next().unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

pub mod transaction {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: EntityId,
        /// Sign-free magnitude; the kind carries the direction.
        #[serde(default, with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        pub description: String,
        pub category_id: EntityId,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(default, with = "date_only")]
        pub transaction_date: Option<NaiveDate>,
    }

    /// Create payload; the server assigns the id.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        pub description: String,
        pub category_id: EntityId,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(default, with = "date_only")]
        pub transaction_date: Option<NaiveDate>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub id: EntityId,
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: Option<String>,
    }
}

pub mod budget {
    use super::*;
    use rust_decimal::Decimal;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Budget {
        pub id: EntityId,
        pub category_id: EntityId,
        #[serde(default, with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        /// 1-12.
        pub month: u32,
        pub year: i32,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category_id: EntityId,
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        pub month: u32,
        pub year: i32,
    }
}

pub mod savings {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SavingsGoal {
        pub id: EntityId,
        pub name: String,
        #[serde(default, with = "rust_decimal::serde::float")]
        pub target_amount: Decimal,
        /// May exceed `target_amount`; the goal is complete, not capped.
        #[serde(default, with = "rust_decimal::serde::float")]
        pub current_amount: Decimal,
        #[serde(default, with = "date_only")]
        pub target_date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SavingsGoalNew {
        pub name: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub target_amount: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub current_amount: Decimal,
        #[serde(default, with = "date_only")]
        pub target_date: Option<NaiveDate>,
        pub description: Option<String>,
    }
}
