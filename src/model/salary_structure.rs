use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

pub const DEFAULT_WORKING_DAYS_PER_WEEK: u8 = 5;

/// Admin-entered inputs of a salary structure. Percent fields are parts per
/// hundred (`50` means 50%); the remaining money fields are fixed amounts.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SalaryRates {
    pub monthly_wage: Decimal,
    pub working_days_per_week: u8,
    pub basic_salary_percent: Decimal,
    pub hra_percent: Decimal,
    pub standard_allowance: Decimal,
    pub performance_bonus_percent: Decimal,
    pub lta_percent: Decimal,
    pub fuel_allowance: Decimal,
    pub employee_pf_percent: Decimal,
    pub employer_pf_percent: Decimal,
    pub professional_tax: Decimal,
}

impl Default for SalaryRates {
    fn default() -> Self {
        Self {
            monthly_wage: Decimal::ZERO,
            working_days_per_week: DEFAULT_WORKING_DAYS_PER_WEEK,
            basic_salary_percent: Decimal::ZERO,
            hra_percent: Decimal::ZERO,
            standard_allowance: Decimal::ZERO,
            performance_bonus_percent: Decimal::ZERO,
            lta_percent: Decimal::ZERO,
            fuel_allowance: Decimal::ZERO,
            employee_pf_percent: Decimal::ZERO,
            employer_pf_percent: Decimal::ZERO,
            professional_tax: Decimal::ZERO,
        }
    }
}

/// Partial update of [`SalaryRates`]; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SalaryRatesPatch {
    #[schema(value_type = Option<f64>, example = 50000.0)]
    pub monthly_wage: Option<Decimal>,
    #[schema(example = 5)]
    pub working_days_per_week: Option<u8>,
    #[schema(value_type = Option<f64>, example = 50.0)]
    pub basic_salary_percent: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 50.0)]
    pub hra_percent: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 167.0)]
    pub standard_allowance: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 8.33)]
    pub performance_bonus_percent: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 8.33)]
    pub lta_percent: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 500.0)]
    pub fuel_allowance: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 12.0)]
    pub employee_pf_percent: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 12.0)]
    pub employer_pf_percent: Option<Decimal>,
    #[schema(value_type = Option<f64>, example = 200.0)]
    pub professional_tax: Option<Decimal>,
}

impl SalaryRatesPatch {
    pub fn is_empty(&self) -> bool {
        self.monthly_wage.is_none()
            && self.working_days_per_week.is_none()
            && self.basic_salary_percent.is_none()
            && self.hra_percent.is_none()
            && self.standard_allowance.is_none()
            && self.performance_bonus_percent.is_none()
            && self.lta_percent.is_none()
            && self.fuel_allowance.is_none()
            && self.employee_pf_percent.is_none()
            && self.employer_pf_percent.is_none()
            && self.professional_tax.is_none()
    }

    pub fn apply_to(&self, base: &SalaryRates) -> SalaryRates {
        SalaryRates {
            monthly_wage: self.monthly_wage.unwrap_or(base.monthly_wage),
            working_days_per_week: self
                .working_days_per_week
                .unwrap_or(base.working_days_per_week),
            basic_salary_percent: self
                .basic_salary_percent
                .unwrap_or(base.basic_salary_percent),
            hra_percent: self.hra_percent.unwrap_or(base.hra_percent),
            standard_allowance: self.standard_allowance.unwrap_or(base.standard_allowance),
            performance_bonus_percent: self
                .performance_bonus_percent
                .unwrap_or(base.performance_bonus_percent),
            lta_percent: self.lta_percent.unwrap_or(base.lta_percent),
            fuel_allowance: self.fuel_allowance.unwrap_or(base.fuel_allowance),
            employee_pf_percent: self
                .employee_pf_percent
                .unwrap_or(base.employee_pf_percent),
            employer_pf_percent: self
                .employer_pf_percent
                .unwrap_or(base.employer_pf_percent),
            professional_tax: self.professional_tax.unwrap_or(base.professional_tax),
        }
    }
}

/// Resolved salary structure of one employee: the rates plus every amount
/// derived from them. Amounts are a cached projection of the rates and are
/// only ever written together with them.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SalaryStructure {
    pub employee_id: u64,
    #[sqlx(flatten)]
    pub rates: SalaryRates,
    pub yearly_wage: Decimal,
    pub basic_salary: Decimal,
    pub house_rent_allowance: Decimal,
    pub performance_bonus: Decimal,
    pub leave_travel_allowance: Decimal,
    pub employee_pf: Decimal,
    pub employer_pf: Decimal,
}

impl SalaryStructure {
    /// The structure an employee starts with before any admin edit.
    pub fn empty(employee_id: u64) -> Self {
        Self {
            employee_id,
            rates: SalaryRates::default(),
            yearly_wage: Decimal::ZERO,
            basic_salary: Decimal::ZERO,
            house_rent_allowance: Decimal::ZERO,
            performance_bonus: Decimal::ZERO,
            leave_travel_allowance: Decimal::ZERO,
            employee_pf: Decimal::ZERO,
            employer_pf: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn patch_overrides_only_given_fields() {
        let base = SalaryRates {
            monthly_wage: dec!(40000),
            basic_salary_percent: dec!(40),
            professional_tax: dec!(200),
            ..SalaryRates::default()
        };
        let patch = SalaryRatesPatch {
            monthly_wage: Some(dec!(50000)),
            hra_percent: Some(dec!(50)),
            ..SalaryRatesPatch::default()
        };

        let merged = patch.apply_to(&base);
        assert_eq!(merged.monthly_wage, dec!(50000));
        assert_eq!(merged.hra_percent, dec!(50));
        assert_eq!(merged.basic_salary_percent, dec!(40));
        assert_eq!(merged.professional_tax, dec!(200));
        assert_eq!(merged.working_days_per_week, DEFAULT_WORKING_DAYS_PER_WEEK);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(SalaryRatesPatch::default().is_empty());
        let patch = SalaryRatesPatch {
            fuel_allowance: Some(dec!(0)),
            ..SalaryRatesPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
