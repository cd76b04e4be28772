//! Salary component table.
//!
//! Every component of a salary structure is one row here. The resolver walks
//! the table in order to derive amounts, and the payroll generator uses each
//! row's [`PayrollTreatment`] to roll amounts into allowances and deductions.
//! Adding a component means adding a row, a rate source in
//! [`SalaryRates::rule_for`] and a stored amount in [`SalaryStructure::amount`].

use rust_decimal::Decimal;
use strum_macros::{Display, EnumIter};

use crate::model::salary_structure::{SalaryRates, SalaryStructure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKey {
    BasicSalary,
    HouseRentAllowance,
    StandardAllowance,
    PerformanceBonus,
    LeaveTravelAllowance,
    FuelAllowance,
    EmployeePf,
    EmployerPf,
    ProfessionalTax,
}

/// What a percentage is taken of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Wage,
    Basic,
}

/// Shape of a component, independent of the employee's numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    PercentOf(Basis),
    Fixed,
}

/// A component's rule filled in with one employee's rate or amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Percent { of: Basis, rate: Decimal },
    Fixed { amount: Decimal },
}

/// How a resolved amount is rolled up when a payroll is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayrollTreatment {
    Basic,
    Allowance,
    Deduction,
    /// Borne by the employer, never deducted from net pay.
    EmployerContribution,
    /// Resolved and stored on the structure but left out of the payroll
    /// allowances total (performance bonus, leave travel allowance).
    NotInPayroll,
}

#[derive(Debug, Clone, Copy)]
pub struct ComponentDef {
    pub key: ComponentKey,
    pub kind: RuleKind,
    pub treatment: PayrollTreatment,
    /// Counts towards the earnings that must stay within the monthly wage.
    pub earning: bool,
}

const fn def(
    key: ComponentKey,
    kind: RuleKind,
    treatment: PayrollTreatment,
    earning: bool,
) -> ComponentDef {
    ComponentDef {
        key,
        kind,
        treatment,
        earning,
    }
}

/// Evaluation order. `BasicSalary` comes first: every `PercentOf(Basic)`
/// row reads the basic amount resolved before it.
pub const COMPONENTS: [ComponentDef; 9] = [
    def(
        ComponentKey::BasicSalary,
        RuleKind::PercentOf(Basis::Wage),
        PayrollTreatment::Basic,
        true,
    ),
    def(
        ComponentKey::HouseRentAllowance,
        RuleKind::PercentOf(Basis::Basic),
        PayrollTreatment::Allowance,
        true,
    ),
    def(
        ComponentKey::StandardAllowance,
        RuleKind::Fixed,
        PayrollTreatment::Allowance,
        true,
    ),
    def(
        ComponentKey::PerformanceBonus,
        RuleKind::PercentOf(Basis::Wage),
        PayrollTreatment::NotInPayroll,
        true,
    ),
    def(
        ComponentKey::LeaveTravelAllowance,
        RuleKind::PercentOf(Basis::Wage),
        PayrollTreatment::NotInPayroll,
        true,
    ),
    def(
        ComponentKey::FuelAllowance,
        RuleKind::Fixed,
        PayrollTreatment::Allowance,
        true,
    ),
    def(
        ComponentKey::EmployeePf,
        RuleKind::PercentOf(Basis::Basic),
        PayrollTreatment::Deduction,
        false,
    ),
    def(
        ComponentKey::EmployerPf,
        RuleKind::PercentOf(Basis::Basic),
        PayrollTreatment::EmployerContribution,
        false,
    ),
    def(
        ComponentKey::ProfessionalTax,
        RuleKind::Fixed,
        PayrollTreatment::Deduction,
        false,
    ),
];

impl ComponentKey {
    /// Table row of this component; [`COMPONENTS`] lists keys in declaration order.
    pub fn def(self) -> &'static ComponentDef {
        match self {
            ComponentKey::BasicSalary => &COMPONENTS[0],
            ComponentKey::HouseRentAllowance => &COMPONENTS[1],
            ComponentKey::StandardAllowance => &COMPONENTS[2],
            ComponentKey::PerformanceBonus => &COMPONENTS[3],
            ComponentKey::LeaveTravelAllowance => &COMPONENTS[4],
            ComponentKey::FuelAllowance => &COMPONENTS[5],
            ComponentKey::EmployeePf => &COMPONENTS[6],
            ComponentKey::EmployerPf => &COMPONENTS[7],
            ComponentKey::ProfessionalTax => &COMPONENTS[8],
        }
    }
}

impl SalaryRates {
    /// The employee-specific rule for `key`, shaped by the table's [`RuleKind`].
    pub fn rule_for(&self, key: ComponentKey) -> Rule {
        let value = match key {
            ComponentKey::BasicSalary => self.basic_salary_percent,
            ComponentKey::HouseRentAllowance => self.hra_percent,
            ComponentKey::StandardAllowance => self.standard_allowance,
            ComponentKey::PerformanceBonus => self.performance_bonus_percent,
            ComponentKey::LeaveTravelAllowance => self.lta_percent,
            ComponentKey::FuelAllowance => self.fuel_allowance,
            ComponentKey::EmployeePf => self.employee_pf_percent,
            ComponentKey::EmployerPf => self.employer_pf_percent,
            ComponentKey::ProfessionalTax => self.professional_tax,
        };

        match key.def().kind {
            RuleKind::PercentOf(of) => Rule::Percent { of, rate: value },
            RuleKind::Fixed => Rule::Fixed { amount: value },
        }
    }
}

impl SalaryStructure {
    /// Resolved amount of `key`; fixed components read straight from the rates.
    pub fn amount(&self, key: ComponentKey) -> Decimal {
        match key {
            ComponentKey::BasicSalary => self.basic_salary,
            ComponentKey::HouseRentAllowance => self.house_rent_allowance,
            ComponentKey::StandardAllowance => self.rates.standard_allowance,
            ComponentKey::PerformanceBonus => self.performance_bonus,
            ComponentKey::LeaveTravelAllowance => self.leave_travel_allowance,
            ComponentKey::FuelAllowance => self.rates.fuel_allowance,
            ComponentKey::EmployeePf => self.employee_pf,
            ComponentKey::EmployerPf => self.employer_pf,
            ComponentKey::ProfessionalTax => self.rates.professional_tax,
        }
    }

    /// Sum of every earning component.
    pub fn total_earnings(&self) -> Decimal {
        COMPONENTS
            .iter()
            .filter(|d| d.earning)
            .map(|d| self.amount(d.key))
            .sum()
    }

    pub fn exceeds_wage(&self) -> bool {
        self.total_earnings() > self.rates.monthly_wage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn every_key_appears_exactly_once() {
        let keys: HashSet<_> = COMPONENTS.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), COMPONENTS.len());
        for key in ComponentKey::iter() {
            assert!(keys.contains(&key), "{key} missing");
        }
    }

    #[test]
    fn def_returns_the_row_of_its_own_key() {
        for key in ComponentKey::iter() {
            assert_eq!(key.def().key, key);
        }
    }

    #[test]
    fn basic_resolves_before_anything_that_depends_on_it() {
        let basic_at = COMPONENTS
            .iter()
            .position(|d| d.key == ComponentKey::BasicSalary)
            .unwrap();
        for (i, d) in COMPONENTS.iter().enumerate() {
            if d.kind == RuleKind::PercentOf(Basis::Basic) {
                assert!(i > basic_at, "{} evaluated before basic", d.key);
            }
        }
    }

    #[test]
    fn hra_and_pf_are_percentages_of_basic() {
        for key in [
            ComponentKey::HouseRentAllowance,
            ComponentKey::EmployeePf,
            ComponentKey::EmployerPf,
        ] {
            assert_eq!(key.def().kind, RuleKind::PercentOf(Basis::Basic));
        }
    }

    #[test]
    fn rates_map_onto_rules_by_kind() {
        let rates = SalaryRates {
            hra_percent: Decimal::from(50),
            fuel_allowance: Decimal::from(500),
            ..SalaryRates::default()
        };
        assert_eq!(
            rates.rule_for(ComponentKey::HouseRentAllowance),
            Rule::Percent {
                of: Basis::Basic,
                rate: Decimal::from(50)
            }
        );
        assert_eq!(
            rates.rule_for(ComponentKey::FuelAllowance),
            Rule::Fixed {
                amount: Decimal::from(500)
            }
        );
    }

    #[test]
    fn component_keys_print_snake_case() {
        assert_eq!(ComponentKey::EmployeePf.to_string(), "employee_pf");
        assert_eq!(
            ComponentKey::LeaveTravelAllowance.to_string(),
            "leave_travel_allowance"
        );
    }
}
