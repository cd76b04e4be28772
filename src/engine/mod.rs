//! Salary structure resolution and payroll generation.

pub mod components;
pub mod generator;
pub mod resolver;

use crate::error::PayrollError;
use crate::model::employee::Employee;
use crate::store::PayrollStore;

/// Looks up an employee inside the caller's company. Employees of other
/// companies are reported exactly like missing ones.
pub(crate) async fn employee_in_company(
    store: &dyn PayrollStore,
    company_id: u64,
    employee_id: u64,
) -> Result<Employee, PayrollError> {
    store
        .find_employee(employee_id)
        .await?
        .filter(|e| e.company_id == company_id)
        .ok_or_else(|| PayrollError::not_found(format!("Employee {employee_id} not found")))
}
