use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::engine::components::{COMPONENTS, PayrollTreatment};
use crate::engine::employee_in_company;
use crate::error::PayrollError;
use crate::model::payroll::{Payroll, PayrollDraft, PayrollStatus};
use crate::model::salary_structure::SalaryStructure;
use crate::store::PayrollStore;
use crate::utils::money;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// A calendar month that payroll can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    month: u8,
    year: i32,
}

impl PayPeriod {
    pub fn new(month: u8, year: i32) -> Result<Self, PayrollError> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::validation("month must be between 1 and 12"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || NaiveDate::from_ymd_opt(year, u32::from(month), 1).is_none()
        {
            return Err(PayrollError::validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}"
            )));
        }
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollAmounts {
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
}

impl PayrollAmounts {
    /// Every total fits the payroll amount columns.
    pub fn fits_columns(&self) -> bool {
        [
            self.basic_salary,
            self.allowances,
            self.deductions,
            self.net_salary,
        ]
        .into_iter()
        .all(money::fits_column)
    }
}

/// Rolls a structure snapshot up into payroll totals according to each
/// component's [`PayrollTreatment`]. Nothing is re-derived from the wage.
pub fn compute(structure: &SalaryStructure) -> PayrollAmounts {
    let mut basic_salary = Decimal::ZERO;
    let mut allowances = Decimal::ZERO;
    let mut deductions = Decimal::ZERO;

    for def in &COMPONENTS {
        let amount = structure.amount(def.key);
        match def.treatment {
            PayrollTreatment::Basic => basic_salary += amount,
            PayrollTreatment::Allowance => allowances += amount,
            PayrollTreatment::Deduction => deductions += amount,
            PayrollTreatment::EmployerContribution | PayrollTreatment::NotInPayroll => {}
        }
    }

    PayrollAmounts {
        basic_salary,
        allowances,
        deductions,
        net_salary: basic_salary + allowances - deductions,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GeneratorPolicy {
    pub initial_status: PayrollStatus,
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self {
            initial_status: PayrollStatus::Paid,
        }
    }
}

/// Outcome of a company-wide run, one entry per employee in id order.
#[derive(Debug)]
pub struct BulkRun {
    pub period: PayPeriod,
    pub results: Vec<(u64, Result<Payroll, PayrollError>)>,
}

impl BulkRun {
    pub fn generated(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.generated()
    }
}

/// Materializes payroll records from the current persisted structures.
pub struct PayrollRunGenerator<'a> {
    store: &'a dyn PayrollStore,
    policy: GeneratorPolicy,
}

impl<'a> PayrollRunGenerator<'a> {
    pub fn new(store: &'a dyn PayrollStore, policy: GeneratorPolicy) -> Self {
        Self { store, policy }
    }

    /// Upserts the payroll of one employee for `period`, overwriting any
    /// earlier run for the same period with the current structure snapshot.
    #[instrument(skip(self), fields(month = period.month, year = period.year))]
    pub async fn generate(
        &self,
        company_id: u64,
        employee_id: u64,
        period: PayPeriod,
    ) -> Result<Payroll, PayrollError> {
        employee_in_company(self.store, company_id, employee_id).await?;
        self.generate_for_employee(employee_id, period).await
    }

    async fn generate_for_employee(
        &self,
        employee_id: u64,
        period: PayPeriod,
    ) -> Result<Payroll, PayrollError> {
        let structure = self
            .store
            .get_salary_structure(employee_id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Salary structure not found for this user"))?;

        let amounts = compute(&structure);
        if !amounts.fits_columns() {
            return Err(PayrollError::validation(
                "payroll totals exceed the largest storable amount",
            ));
        }
        let draft = PayrollDraft {
            employee_id,
            month: period.month,
            year: period.year,
            basic_salary: amounts.basic_salary,
            allowances: amounts.allowances,
            deductions: amounts.deductions,
            net_salary: amounts.net_salary,
            status: self.policy.initial_status,
        };

        let payroll = self.store.upsert_payroll(&draft).await?;
        info!(
            employee_id,
            payroll_id = payroll.id,
            net_salary = %payroll.net_salary,
            "Payroll generated"
        );
        Ok(payroll)
    }

    /// Generates payroll for every employee of the company, one at a time.
    /// A failing employee is recorded and the run moves on; only failing to
    /// list the employees aborts the run.
    #[instrument(skip(self), fields(month = period.month, year = period.year))]
    pub async fn generate_for_company(
        &self,
        company_id: u64,
        period: PayPeriod,
    ) -> Result<BulkRun, PayrollError> {
        let employees = self.store.list_employees(company_id).await?;
        let mut results = Vec::with_capacity(employees.len());

        for employee in employees {
            let outcome = self.generate_for_employee(employee.id, period).await;
            if let Err(e) = &outcome {
                warn!(employee_id = employee.id, error = %e, "Payroll generation failed");
            }
            results.push((employee.id, outcome));
        }

        let run = BulkRun { period, results };
        info!(
            company_id,
            generated = run.generated(),
            failed = run.failed(),
            "Company payroll run finished"
        );
        Ok(run)
    }
}
