use std::fmt::Display;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, instrument, warn};

use crate::engine::components::{Basis, COMPONENTS, ComponentKey, Rule};
use crate::engine::employee_in_company;
use crate::error::PayrollError;
use crate::model::salary_structure::{SalaryRates, SalaryRatesPatch, SalaryStructure};
use crate::store::PayrollStore;
use crate::utils::money;

const HUNDRED: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverPolicy {
    /// Reject structures whose earnings add up to more than the wage instead
    /// of only logging them.
    pub enforce_wage_cap: bool,
}

fn percent_of(base: Decimal, rate: Decimal, key: ComponentKey) -> Result<Decimal, PayrollError> {
    let amount = base
        .checked_mul(rate)
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or_else(|| PayrollError::validation(format!("{key} is out of range")))?;
    storable(key, money::stored(amount))
}

fn storable(name: impl Display, amount: Decimal) -> Result<Decimal, PayrollError> {
    if amount > money::MAX_STORED {
        return Err(PayrollError::validation(format!(
            "{name} exceeds the largest storable amount {}",
            money::MAX_STORED
        )));
    }
    Ok(amount)
}

fn check_input(name: impl Display, value: Decimal) -> Result<(), PayrollError> {
    if value < Decimal::ZERO {
        return Err(PayrollError::validation(format!(
            "{name} must not be negative"
        )));
    }
    if value.normalize().scale() > money::STORED_SCALE {
        return Err(PayrollError::validation(format!(
            "{name} must have at most {} decimal places",
            money::STORED_SCALE
        )));
    }
    storable(name, value).map(|_| ())
}

fn validate(rates: &SalaryRates) -> Result<(), PayrollError> {
    check_input("monthly_wage", rates.monthly_wage)?;
    if !(1..=7).contains(&rates.working_days_per_week) {
        return Err(PayrollError::validation(
            "working_days_per_week must be between 1 and 7",
        ));
    }
    for def in &COMPONENTS {
        let value = match rates.rule_for(def.key) {
            Rule::Percent { rate, .. } => rate,
            Rule::Fixed { amount } => amount,
        };
        check_input(def.key, value)?;
    }
    Ok(())
}

/// Derives every amount of a salary structure from `rates`.
///
/// Pure: the same rates always produce the same structure. `yearly_wage` is
/// computed first, then the component table in order, so amounts taken as a
/// percentage of basic see the basic resolved for this call. Inputs and
/// derived amounts are held to the stored column precision, so a stored
/// structure resolves back to itself.
pub fn resolve(
    employee_id: u64,
    rates: &SalaryRates,
    policy: &ResolverPolicy,
) -> Result<SalaryStructure, PayrollError> {
    validate(rates)?;

    let wage = rates.monthly_wage;
    let yearly_wage = wage
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| PayrollError::validation("monthly_wage is out of range"))?;
    let yearly_wage = storable("yearly_wage", yearly_wage)?;

    let mut structure = SalaryStructure {
        employee_id,
        rates: rates.clone(),
        yearly_wage,
        ..SalaryStructure::empty(employee_id)
    };

    for def in &COMPONENTS {
        let amount = match rates.rule_for(def.key) {
            Rule::Percent { of: Basis::Wage, rate } => percent_of(wage, rate, def.key)?,
            Rule::Percent { of: Basis::Basic, rate } => {
                percent_of(structure.basic_salary, rate, def.key)?
            }
            Rule::Fixed { amount } => amount,
        };

        match def.key {
            ComponentKey::BasicSalary => structure.basic_salary = amount,
            ComponentKey::HouseRentAllowance => structure.house_rent_allowance = amount,
            ComponentKey::PerformanceBonus => structure.performance_bonus = amount,
            ComponentKey::LeaveTravelAllowance => structure.leave_travel_allowance = amount,
            ComponentKey::EmployeePf => structure.employee_pf = amount,
            ComponentKey::EmployerPf => structure.employer_pf = amount,
            // fixed amounts live on the rates
            ComponentKey::StandardAllowance
            | ComponentKey::FuelAllowance
            | ComponentKey::ProfessionalTax => {}
        }
    }

    if structure.exceeds_wage() {
        let earnings = structure.total_earnings();
        if policy.enforce_wage_cap {
            return Err(PayrollError::validation(format!(
                "salary components total {earnings} which exceeds the monthly wage {wage}"
            )));
        }
        warn!(
            employee_id,
            %earnings,
            %wage,
            "Salary components exceed the monthly wage"
        );
    }

    Ok(structure)
}

/// Keeps each employee's persisted structure consistent with its rates.
pub struct SalaryStructureResolver<'a> {
    store: &'a dyn PayrollStore,
    policy: ResolverPolicy,
}

impl<'a> SalaryStructureResolver<'a> {
    pub fn new(store: &'a dyn PayrollStore, policy: ResolverPolicy) -> Self {
        Self { store, policy }
    }

    /// Merges `patch` over the stored rates (zeros when none are stored yet),
    /// resolves, and upserts the single structure row of the employee.
    #[instrument(skip(self, patch))]
    pub async fn apply(
        &self,
        company_id: u64,
        employee_id: u64,
        patch: &SalaryRatesPatch,
    ) -> Result<SalaryStructure, PayrollError> {
        employee_in_company(self.store, company_id, employee_id).await?;

        let current = self
            .store
            .get_salary_structure(employee_id)
            .await?
            .map(|s| s.rates)
            .unwrap_or_default();
        let rates = patch.apply_to(&current);

        let structure = resolve(employee_id, &rates, &self.policy)?;
        let stored = self.store.upsert_salary_structure(&structure).await?;

        info!(
            employee_id,
            monthly_wage = %stored.rates.monthly_wage,
            basic_salary = %stored.basic_salary,
            "Salary structure resolved"
        );
        Ok(stored)
    }

    /// Returns the employee's structure, creating an all-zero one on first view.
    #[instrument(skip(self))]
    pub async fn load_or_init(
        &self,
        company_id: u64,
        employee_id: u64,
    ) -> Result<SalaryStructure, PayrollError> {
        employee_in_company(self.store, company_id, employee_id).await?;

        if let Some(structure) = self.store.get_salary_structure(employee_id).await? {
            return Ok(structure);
        }

        debug!(employee_id, "Creating empty salary structure");
        self.store
            .upsert_salary_structure(&SalaryStructure::empty(employee_id))
            .await
    }

    /// Read-only lookup; a missing structure is reported, not created.
    pub async fn load(
        &self,
        company_id: u64,
        employee_id: u64,
    ) -> Result<SalaryStructure, PayrollError> {
        employee_in_company(self.store, company_id, employee_id).await?;

        self.store
            .get_salary_structure(employee_id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Salary structure not found for this user"))
    }
}
