use async_trait::async_trait;

use crate::error::PayrollError;
use crate::model::employee::Employee;
use crate::model::payroll::{Payroll, PayrollDraft, PayrollStatus};
use crate::model::salary_structure::SalaryStructure;

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Filter for payroll listings. Either side of the tenancy scope may be set;
/// unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollFilter {
    pub company_id: Option<u64>,
    pub employee_id: Option<u64>,
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Data access used by the payroll engine. Upserts must be atomic per key:
/// concurrent writers may overwrite each other but never mix fields.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    async fn find_employee(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError>;

    /// Employees of a company in ascending id order.
    async fn list_employees(&self, company_id: u64) -> Result<Vec<Employee>, PayrollError>;

    async fn get_salary_structure(
        &self,
        employee_id: u64,
    ) -> Result<Option<SalaryStructure>, PayrollError>;

    /// Inserts or replaces the single structure row keyed by employee id.
    async fn upsert_salary_structure(
        &self,
        structure: &SalaryStructure,
    ) -> Result<SalaryStructure, PayrollError>;

    /// Inserts or overwrites the row keyed by (employee, month, year).
    async fn upsert_payroll(&self, draft: &PayrollDraft) -> Result<Payroll, PayrollError>;

    async fn find_payroll(&self, payroll_id: u64) -> Result<Option<Payroll>, PayrollError>;

    /// Newest period first, then by employee id.
    async fn list_payrolls(&self, filter: &PayrollFilter) -> Result<Vec<Payroll>, PayrollError>;

    /// Row count for `filter`, ignoring its limit and offset.
    async fn count_payrolls(&self, filter: &PayrollFilter) -> Result<i64, PayrollError>;

    async fn update_payroll_status(
        &self,
        payroll_id: u64,
        status: PayrollStatus,
    ) -> Result<Option<Payroll>, PayrollError>;
}
