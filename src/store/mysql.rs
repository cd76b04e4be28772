use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::error::PayrollError;
use crate::model::employee::Employee;
use crate::model::payroll::{Payroll, PayrollDraft, PayrollStatus};
use crate::model::salary_structure::SalaryStructure;
use crate::store::{PayrollFilter, PayrollStore};

const EMPLOYEE_COLUMNS: &str =
    "id, company_id, employee_code, first_name, last_name, email, status";

const STRUCTURE_COLUMNS: &str = r#"
    employee_id, monthly_wage, working_days_per_week,
    basic_salary_percent, hra_percent, standard_allowance,
    performance_bonus_percent, lta_percent, fuel_allowance,
    employee_pf_percent, employer_pf_percent, professional_tax,
    yearly_wage, basic_salary, house_rent_allowance,
    performance_bonus, leave_travel_allowance, employee_pf, employer_pf
"#;

const PAYROLL_COLUMNS: &str = r#"
    p.id, p.employee_id, p.month, p.year,
    p.basic_salary, p.allowances, p.deductions, p.net_salary,
    p.status, p.generated_at
"#;

/// MySQL foreign-key violation: the referenced employee row is gone.
const ER_NO_REFERENCED_ROW: &str = "23000";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn missing_employee(e: sqlx::Error, employee_id: u64) -> PayrollError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(ER_NO_REFERENCED_ROW) {
            return PayrollError::not_found(format!("Employee {employee_id} not found"));
        }
    }
    PayrollError::Persistence(e)
}

fn push_payroll_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &PayrollFilter) {
    qb.push(" FROM payrolls p JOIN employees e ON e.id = p.employee_id WHERE 1 = 1");

    if let Some(company_id) = filter.company_id {
        qb.push(" AND e.company_id = ").push_bind(company_id);
    }
    if let Some(employee_id) = filter.employee_id {
        qb.push(" AND p.employee_id = ").push_bind(employee_id);
    }
    if let Some(month) = filter.month {
        qb.push(" AND p.month = ").push_bind(month);
    }
    if let Some(year) = filter.year {
        qb.push(" AND p.year = ").push_bind(year);
    }
}

#[async_trait]
impl PayrollStore for MySqlStore {
    async fn find_employee(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn list_employees(&self, company_id: u64) -> Result<Vec<Employee>, PayrollError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE company_id = ? ORDER BY id"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn get_salary_structure(
        &self,
        employee_id: u64,
    ) -> Result<Option<SalaryStructure>, PayrollError> {
        let structure = sqlx::query_as::<_, SalaryStructure>(&format!(
            "SELECT {STRUCTURE_COLUMNS} FROM salary_structures WHERE employee_id = ?"
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(structure)
    }

    async fn upsert_salary_structure(
        &self,
        structure: &SalaryStructure,
    ) -> Result<SalaryStructure, PayrollError> {
        let rates = &structure.rates;
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            r#"
            INSERT INTO salary_structures ({STRUCTURE_COLUMNS}, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, UTC_TIMESTAMP())
            ON DUPLICATE KEY UPDATE
                monthly_wage = VALUES(monthly_wage),
                working_days_per_week = VALUES(working_days_per_week),
                basic_salary_percent = VALUES(basic_salary_percent),
                hra_percent = VALUES(hra_percent),
                standard_allowance = VALUES(standard_allowance),
                performance_bonus_percent = VALUES(performance_bonus_percent),
                lta_percent = VALUES(lta_percent),
                fuel_allowance = VALUES(fuel_allowance),
                employee_pf_percent = VALUES(employee_pf_percent),
                employer_pf_percent = VALUES(employer_pf_percent),
                professional_tax = VALUES(professional_tax),
                yearly_wage = VALUES(yearly_wage),
                basic_salary = VALUES(basic_salary),
                house_rent_allowance = VALUES(house_rent_allowance),
                performance_bonus = VALUES(performance_bonus),
                leave_travel_allowance = VALUES(leave_travel_allowance),
                employee_pf = VALUES(employee_pf),
                employer_pf = VALUES(employer_pf),
                updated_at = VALUES(updated_at)
            "#
        ))
        .bind(structure.employee_id)
        .bind(rates.monthly_wage)
        .bind(rates.working_days_per_week)
        .bind(rates.basic_salary_percent)
        .bind(rates.hra_percent)
        .bind(rates.standard_allowance)
        .bind(rates.performance_bonus_percent)
        .bind(rates.lta_percent)
        .bind(rates.fuel_allowance)
        .bind(rates.employee_pf_percent)
        .bind(rates.employer_pf_percent)
        .bind(rates.professional_tax)
        .bind(structure.yearly_wage)
        .bind(structure.basic_salary)
        .bind(structure.house_rent_allowance)
        .bind(structure.performance_bonus)
        .bind(structure.leave_travel_allowance)
        .bind(structure.employee_pf)
        .bind(structure.employer_pf)
        .execute(&mut *tx)
        .await
        .map_err(|e| missing_employee(e, structure.employee_id))?;

        let stored = sqlx::query_as::<_, SalaryStructure>(&format!(
            "SELECT {STRUCTURE_COLUMNS} FROM salary_structures WHERE employee_id = ?"
        ))
        .bind(structure.employee_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn upsert_payroll(&self, draft: &PayrollDraft) -> Result<Payroll, PayrollError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO payrolls
            (employee_id, month, year, basic_salary, allowances, deductions, net_salary, status, generated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, UTC_TIMESTAMP())
            ON DUPLICATE KEY UPDATE
                basic_salary = VALUES(basic_salary),
                allowances = VALUES(allowances),
                deductions = VALUES(deductions),
                net_salary = VALUES(net_salary),
                status = VALUES(status),
                generated_at = VALUES(generated_at)
            "#,
        )
        .bind(draft.employee_id)
        .bind(draft.month)
        .bind(draft.year)
        .bind(draft.basic_salary)
        .bind(draft.allowances)
        .bind(draft.deductions)
        .bind(draft.net_salary)
        .bind(draft.status)
        .execute(&mut *tx)
        .await
        .map_err(|e| missing_employee(e, draft.employee_id))?;

        let stored = sqlx::query_as::<_, Payroll>(&format!(
            r#"
            SELECT {PAYROLL_COLUMNS}
            FROM payrolls p
            WHERE p.employee_id = ? AND p.month = ? AND p.year = ?
            "#
        ))
        .bind(draft.employee_id)
        .bind(draft.month)
        .bind(draft.year)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }

    async fn find_payroll(&self, payroll_id: u64) -> Result<Option<Payroll>, PayrollError> {
        let payroll = sqlx::query_as::<_, Payroll>(&format!(
            "SELECT {PAYROLL_COLUMNS} FROM payrolls p WHERE p.id = ?"
        ))
        .bind(payroll_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payroll)
    }

    async fn list_payrolls(&self, filter: &PayrollFilter) -> Result<Vec<Payroll>, PayrollError> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT ");
        qb.push(PAYROLL_COLUMNS);
        push_payroll_filter(&mut qb, filter);
        qb.push(" ORDER BY p.year DESC, p.month DESC, p.employee_id ASC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
            qb.push(" OFFSET ")
                .push_bind(i64::from(filter.offset.unwrap_or(0)));
        }

        let payrolls = qb
            .build_query_as::<Payroll>()
            .fetch_all(&self.pool)
            .await?;

        Ok(payrolls)
    }

    async fn count_payrolls(&self, filter: &PayrollFilter) -> Result<i64, PayrollError> {
        let mut qb = QueryBuilder::<MySql>::new("SELECT COUNT(*)");
        push_payroll_filter(&mut qb, filter);

        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn update_payroll_status(
        &self,
        payroll_id: u64,
        status: PayrollStatus,
    ) -> Result<Option<Payroll>, PayrollError> {
        sqlx::query("UPDATE payrolls SET status = ? WHERE id = ?")
            .bind(status)
            .bind(payroll_id)
            .execute(&self.pool)
            .await?;

        self.find_payroll(payroll_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolver::{ResolverPolicy, resolve};
    use crate::model::salary_structure::SalaryRates;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn add_employee(pool: &MySqlPool, id: u64, company_id: u64) {
        sqlx::query(
            "INSERT INTO employees (id, company_id, employee_code, first_name, last_name, email) \
             VALUES (?, ?, ?, 'Test', 'Employee', ?)",
        )
        .bind(id)
        .bind(company_id)
        .bind(format!("EMP-{id:03}"))
        .bind(format!("emp{id}@company.test"))
        .execute(pool)
        .await
        .unwrap();
    }

    async fn row_count(pool: &MySqlPool, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn rates(hra_percent: Decimal) -> SalaryRates {
        SalaryRates {
            monthly_wage: dec!(50000),
            basic_salary_percent: dec!(50),
            hra_percent,
            lta_percent: dec!(8.3333),
            employee_pf_percent: dec!(12),
            professional_tax: dec!(200),
            ..SalaryRates::default()
        }
    }

    fn draft(employee_id: u64, month: u8, net_salary: Decimal) -> PayrollDraft {
        PayrollDraft {
            employee_id,
            month,
            year: 2026,
            basic_salary: dec!(25000),
            allowances: dec!(12500),
            deductions: dec!(3200),
            net_salary,
            status: PayrollStatus::Paid,
        }
    }

    #[sqlx::test]
    #[ignore = "needs a MySQL server in DATABASE_URL"]
    async fn structure_upsert_keeps_one_row_and_exact_amounts(pool: MySqlPool) {
        add_employee(&pool, 1, 10).await;
        let store = MySqlStore::new(pool.clone());
        let policy = ResolverPolicy::default();

        let first = resolve(1, &rates(dec!(50)), &policy).unwrap();
        store.upsert_salary_structure(&first).await.unwrap();

        let second = resolve(1, &rates(dec!(33.3333)), &policy).unwrap();
        let stored = store.upsert_salary_structure(&second).await.unwrap();

        assert_eq!(row_count(&pool, "salary_structures").await, 1);
        assert_eq!(stored, second);
        assert_eq!(resolve(1, &stored.rates, &policy).unwrap(), stored);
    }

    #[sqlx::test]
    #[ignore = "needs a MySQL server in DATABASE_URL"]
    async fn payroll_upsert_overwrites_its_period(pool: MySqlPool) {
        add_employee(&pool, 1, 10).await;
        let store = MySqlStore::new(pool.clone());

        let first = store.upsert_payroll(&draft(1, 1, dec!(34300))).await.unwrap();
        let rerun = store.upsert_payroll(&draft(1, 1, dec!(34967))).await.unwrap();
        assert_eq!(rerun.id, first.id);
        assert_eq!(rerun.net_salary, dec!(34967));
        assert_eq!(row_count(&pool, "payrolls").await, 1);

        let next = store.upsert_payroll(&draft(1, 2, dec!(34967))).await.unwrap();
        assert_ne!(next.id, first.id);

        let filter = PayrollFilter {
            company_id: Some(10),
            ..PayrollFilter::default()
        };
        assert_eq!(store.count_payrolls(&filter).await.unwrap(), 2);
        let listed = store.list_payrolls(&filter).await.unwrap();
        assert_eq!(listed[0].month, 2);
    }

    #[sqlx::test]
    #[ignore = "needs a MySQL server in DATABASE_URL"]
    async fn upserts_for_unknown_employees_are_not_found(pool: MySqlPool) {
        let store = MySqlStore::new(pool.clone());

        let structure = resolve(42, &rates(dec!(50)), &ResolverPolicy::default()).unwrap();
        let err = store.upsert_salary_structure(&structure).await.unwrap_err();
        assert!(matches!(err, PayrollError::NotFound(_)));

        let err = store.upsert_payroll(&draft(42, 1, dec!(1))).await.unwrap_err();
        assert!(matches!(err, PayrollError::NotFound(_)));
        assert_eq!(row_count(&pool, "payrolls").await, 0);
    }
}
