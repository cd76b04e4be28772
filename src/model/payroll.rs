use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PayrollStatus {
    Paid,
    Pending,
}

/// Period-bound pay record, one per (employee, month, year).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Payroll {
    pub id: u64,
    pub employee_id: u64,
    pub month: u8,
    pub year: i32,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
    pub status: PayrollStatus,
    pub generated_at: NaiveDateTime,
}

/// Computed payroll values waiting to be upserted on their period key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollDraft {
    pub employee_id: u64,
    pub month: u8,
    pub year: i32,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
    pub status: PayrollStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_and_prints_uppercase() {
        assert_eq!(PayrollStatus::from_str("paid").unwrap(), PayrollStatus::Paid);
        assert_eq!(
            PayrollStatus::from_str("PENDING").unwrap(),
            PayrollStatus::Pending
        );
        assert!(PayrollStatus::from_str("APPROVED").is_err());
        assert_eq!(PayrollStatus::Paid.to_string(), "PAID");
        assert_eq!(
            serde_json::to_string(&PayrollStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }
}
