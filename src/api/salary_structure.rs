use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::resolver::{ResolverPolicy, SalaryStructureResolver};
use crate::error::PayrollError;
use crate::model::salary_structure::{SalaryRatesPatch, SalaryStructure};
use crate::store::PayrollStore;
use crate::utils::money;

#[derive(Debug, Serialize, ToSchema)]
pub struct SalaryStructureResponse {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(value_type = f64, example = 50000.0)]
    pub monthly_wage: Decimal,
    #[schema(value_type = f64, example = 600000.0)]
    pub yearly_wage: Decimal,
    #[schema(example = 5)]
    pub working_days_per_week: u8,

    #[schema(value_type = f64, example = 50.0)]
    pub basic_salary_percent: Decimal,
    #[schema(value_type = f64, example = 25000.0)]
    pub basic_salary: Decimal,

    #[schema(value_type = f64, example = 50.0)]
    pub hra_percent: Decimal,
    #[schema(value_type = f64, example = 12500.0)]
    pub house_rent_allowance: Decimal,

    #[schema(value_type = f64, example = 167.0)]
    pub standard_allowance: Decimal,

    #[schema(value_type = f64, example = 8.33)]
    pub performance_bonus_percent: Decimal,
    #[schema(value_type = f64, example = 4165.0)]
    pub performance_bonus: Decimal,

    #[schema(value_type = f64, example = 8.333)]
    pub lta_percent: Decimal,
    #[schema(value_type = f64, example = 4166.5)]
    pub leave_travel_allowance: Decimal,

    #[schema(value_type = f64, example = 500.0)]
    pub fuel_allowance: Decimal,

    #[schema(value_type = f64, example = 12.0)]
    pub employee_pf_percent: Decimal,
    #[schema(value_type = f64, example = 3000.0)]
    pub employee_pf: Decimal,

    #[schema(value_type = f64, example = 12.0)]
    pub employer_pf_percent: Decimal,
    #[schema(value_type = f64, example = 3000.0)]
    pub employer_pf: Decimal,

    #[schema(value_type = f64, example = 200.0)]
    pub professional_tax: Decimal,

    /// Sum of all earning components.
    #[schema(value_type = f64, example = 46498.5)]
    pub total_earnings: Decimal,
    /// Earnings add up to more than the monthly wage.
    pub exceeds_wage: bool,
}

impl From<&SalaryStructure> for SalaryStructureResponse {
    fn from(s: &SalaryStructure) -> Self {
        let r = &s.rates;
        Self {
            employee_id: s.employee_id,
            monthly_wage: money::display(r.monthly_wage),
            yearly_wage: money::display(s.yearly_wage),
            working_days_per_week: r.working_days_per_week,
            basic_salary_percent: r.basic_salary_percent,
            basic_salary: money::display(s.basic_salary),
            hra_percent: r.hra_percent,
            house_rent_allowance: money::display(s.house_rent_allowance),
            standard_allowance: money::display(r.standard_allowance),
            performance_bonus_percent: r.performance_bonus_percent,
            performance_bonus: money::display(s.performance_bonus),
            lta_percent: r.lta_percent,
            leave_travel_allowance: money::display(s.leave_travel_allowance),
            fuel_allowance: money::display(r.fuel_allowance),
            employee_pf_percent: r.employee_pf_percent,
            employee_pf: money::display(s.employee_pf),
            employer_pf_percent: r.employer_pf_percent,
            employer_pf: money::display(s.employer_pf),
            professional_tax: money::display(r.professional_tax),
            total_earnings: money::display(s.total_earnings()),
            exceeds_wage: s.exceeds_wage(),
        }
    }
}

fn resolver<'a>(store: &'a dyn PayrollStore, config: &Config) -> SalaryStructureResolver<'a> {
    SalaryStructureResolver::new(
        store,
        ResolverPolicy {
            enforce_wage_cap: config.enforce_wage_cap,
        },
    )
}

#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/salary-structure",
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, body = SalaryStructureResponse),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee or structure not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Structure"
)]
pub async fn get_salary_structure(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    if !auth.can_view_employee(employee_id) {
        return Err(PayrollError::Authorization("Not allowed to view this employee".into()).into());
    }

    let structures = resolver(store.get_ref(), &config);
    let structure = if auth.is_admin() {
        structures.load_or_init(auth.company_id, employee_id).await?
    } else {
        structures.load(auth.company_id, employee_id).await?
    };

    Ok(HttpResponse::Ok().json(SalaryStructureResponse::from(&structure)))
}

#[utoipa::path(
    patch,
    path = "/api/employees/{employee_id}/salary-structure",
    request_body = SalaryRatesPatch,
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Salary structure resolved", body = SalaryStructureResponse),
        (status = 400, description = "Invalid wage or rate"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary Structure"
)]
pub async fn update_salary_structure(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    body: web::Json<SalaryRatesPatch>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employee_id = path.into_inner();
    let patch = body.into_inner();
    if patch.is_empty() {
        return Err(PayrollError::validation("No fields provided for update").into());
    }

    let structure = resolver(store.get_ref(), &config)
        .apply(auth.company_id, employee_id, &patch)
        .await?;

    Ok(HttpResponse::Ok().json(SalaryStructureResponse::from(&structure)))
}
