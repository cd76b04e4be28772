use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::PayrollError;
use crate::model::employee::Employee;
use crate::model::payroll::{Payroll, PayrollDraft, PayrollStatus};
use crate::model::salary_structure::SalaryStructure;
use crate::store::{PayrollFilter, PayrollStore};

#[derive(Default)]
struct Tables {
    employees: BTreeMap<u64, Employee>,
    structures: BTreeMap<u64, SalaryStructure>,
    payrolls: BTreeMap<u64, Payroll>,
    next_payroll_id: u64,
}

/// In-process store with the same keying rules as the MySQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_employee(&self, id: u64, company_id: u64) -> Employee {
        let employee = Employee {
            id,
            company_id,
            employee_code: format!("EMP-{id:03}"),
            first_name: "Test".to_string(),
            last_name: format!("Employee {id}"),
            email: format!("emp{id}@company.test"),
            status: "active".to_string(),
        };
        self.tables().employees.insert(id, employee.clone());
        employee
    }

    pub fn structure_count(&self) -> usize {
        self.tables().structures.len()
    }

    pub fn payroll_count(&self) -> usize {
        self.tables().payrolls.len()
    }
}

fn matches(tables: &Tables, payroll: &Payroll, filter: &PayrollFilter) -> bool {
    if let Some(company_id) = filter.company_id {
        let same_company = tables
            .employees
            .get(&payroll.employee_id)
            .is_some_and(|e| e.company_id == company_id);
        if !same_company {
            return false;
        }
    }
    filter.employee_id.is_none_or(|id| payroll.employee_id == id)
        && filter.month.is_none_or(|m| payroll.month == m)
        && filter.year.is_none_or(|y| payroll.year == y)
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn find_employee(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError> {
        Ok(self.tables().employees.get(&employee_id).cloned())
    }

    async fn list_employees(&self, company_id: u64) -> Result<Vec<Employee>, PayrollError> {
        Ok(self
            .tables()
            .employees
            .values()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn get_salary_structure(
        &self,
        employee_id: u64,
    ) -> Result<Option<SalaryStructure>, PayrollError> {
        Ok(self.tables().structures.get(&employee_id).cloned())
    }

    async fn upsert_salary_structure(
        &self,
        structure: &SalaryStructure,
    ) -> Result<SalaryStructure, PayrollError> {
        let mut tables = self.tables();
        if !tables.employees.contains_key(&structure.employee_id) {
            return Err(PayrollError::not_found(format!(
                "Employee {} not found",
                structure.employee_id
            )));
        }
        tables
            .structures
            .insert(structure.employee_id, structure.clone());
        Ok(structure.clone())
    }

    async fn upsert_payroll(&self, draft: &PayrollDraft) -> Result<Payroll, PayrollError> {
        let mut tables = self.tables();
        if !tables.employees.contains_key(&draft.employee_id) {
            return Err(PayrollError::not_found(format!(
                "Employee {} not found",
                draft.employee_id
            )));
        }

        let existing = tables
            .payrolls
            .values()
            .find(|p| {
                p.employee_id == draft.employee_id && p.month == draft.month && p.year == draft.year
            })
            .map(|p| p.id);
        let id = match existing {
            Some(id) => id,
            None => {
                tables.next_payroll_id += 1;
                tables.next_payroll_id
            }
        };

        let payroll = Payroll {
            id,
            employee_id: draft.employee_id,
            month: draft.month,
            year: draft.year,
            basic_salary: draft.basic_salary,
            allowances: draft.allowances,
            deductions: draft.deductions,
            net_salary: draft.net_salary,
            status: draft.status,
            generated_at: Utc::now().naive_utc(),
        };
        tables.payrolls.insert(id, payroll.clone());
        Ok(payroll)
    }

    async fn find_payroll(&self, payroll_id: u64) -> Result<Option<Payroll>, PayrollError> {
        Ok(self.tables().payrolls.get(&payroll_id).cloned())
    }

    async fn list_payrolls(&self, filter: &PayrollFilter) -> Result<Vec<Payroll>, PayrollError> {
        let tables = self.tables();
        let mut rows: Vec<Payroll> = tables
            .payrolls
            .values()
            .filter(|p| matches(&tables, p, filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then(b.month.cmp(&a.month))
                .then(a.employee_id.cmp(&b.employee_id))
        });

        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_payrolls(&self, filter: &PayrollFilter) -> Result<i64, PayrollError> {
        let tables = self.tables();
        let total = tables
            .payrolls
            .values()
            .filter(|p| matches(&tables, p, filter))
            .count();
        Ok(total as i64)
    }

    async fn update_payroll_status(
        &self,
        payroll_id: u64,
        status: PayrollStatus,
    ) -> Result<Option<Payroll>, PayrollError> {
        let mut tables = self.tables();
        Ok(tables.payrolls.get_mut(&payroll_id).map(|p| {
            p.status = status;
            p.clone()
        }))
    }
}
