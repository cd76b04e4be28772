/// Directory entry for an employee. The record is owned by the HR profile
/// service; payroll only reads it to resolve tenancy.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Employee {
    pub id: u64,
    pub company_id: u64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
}
