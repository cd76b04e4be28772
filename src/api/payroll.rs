use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::engine::employee_in_company;
use crate::engine::generator::{BulkRun, GeneratorPolicy, PayPeriod, PayrollRunGenerator};
use crate::error::PayrollError;
use crate::model::payroll::{Payroll, PayrollStatus};
use crate::store::{PayrollFilter, PayrollStore};
use crate::utils::money;

#[derive(Deserialize, ToSchema)]
pub struct GeneratePayroll {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub month: u8,

    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateCompanyPayroll {
    #[schema(example = 1)]
    pub month: u8,

    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePayrollStatus {
    pub status: PayrollStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollResponse {
    pub id: u64,
    pub employee_id: u64,
    pub month: u8,
    pub year: i32,

    #[schema(value_type = f64, example = 25000.0)]
    pub basic_salary: Decimal,
    #[schema(value_type = f64, example = 13167.0)]
    pub allowances: Decimal,
    #[schema(value_type = f64, example = 3200.0)]
    pub deductions: Decimal,
    #[schema(value_type = f64, example = 34967.0)]
    pub net_salary: Decimal,

    pub status: PayrollStatus,

    #[schema(value_type = String, format = DateTime)]
    pub generated_at: NaiveDateTime,
}

impl From<&Payroll> for PayrollResponse {
    fn from(p: &Payroll) -> Self {
        Self {
            id: p.id,
            employee_id: p.employee_id,
            month: p.month,
            year: p.year,
            basic_salary: money::display(p.basic_salary),
            allowances: money::display(p.allowances),
            deductions: money::display(p.deductions),
            net_salary: money::display(p.net_salary),
            status: p.status,
            generated_at: p.generated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkEntry {
    Generated {
        employee_id: u64,
        payroll: PayrollResponse,
    },
    Failed {
        employee_id: u64,
        kind: String,
        message: String,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkPayrollResponse {
    pub month: u8,
    pub year: i32,
    pub generated: usize,
    pub failed: usize,
    pub results: Vec<BulkEntry>,
}

impl From<&BulkRun> for BulkPayrollResponse {
    fn from(run: &BulkRun) -> Self {
        let results = run
            .results
            .iter()
            .map(|(employee_id, outcome)| match outcome {
                Ok(payroll) => BulkEntry::Generated {
                    employee_id: *employee_id,
                    payroll: PayrollResponse::from(payroll),
                },
                Err(e) => BulkEntry::Failed {
                    employee_id: *employee_id,
                    kind: e.kind().to_string(),
                    message: e.public_message(),
                },
            })
            .collect();

        Self {
            month: run.period.month(),
            year: run.period.year(),
            generated: run.generated(),
            failed: run.failed(),
            results,
        }
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub employee_id: Option<u64>,

    #[schema(example = 1)]
    pub month: Option<u8>,

    #[schema(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

fn generator<'a>(store: &'a dyn PayrollStore, config: &Config) -> PayrollRunGenerator<'a> {
    PayrollRunGenerator::new(
        store,
        GeneratorPolicy {
            initial_status: config.payroll_initial_status,
        },
    )
}

/// Loads a payroll the caller may see; anything else reads as missing.
async fn visible_payroll(
    auth: &AuthUser,
    store: &dyn PayrollStore,
    payroll_id: u64,
) -> Result<Payroll, PayrollError> {
    let not_found = || PayrollError::not_found("Payroll not found");

    let payroll = store.find_payroll(payroll_id).await?.ok_or_else(not_found)?;
    if !auth.can_view_employee(payroll.employee_id) {
        return Err(not_found());
    }
    employee_in_company(store, auth.company_id, payroll.employee_id)
        .await
        .map_err(|e| match e {
            PayrollError::NotFound(_) => not_found(),
            other => other,
        })?;

    Ok(payroll)
}

#[utoipa::path(
    post,
    path = "/api/payroll",
    request_body = GeneratePayroll,
    responses(
        (status = 201, description = "Payroll generated", body = PayrollResponse),
        (status = 400, description = "Invalid period"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee or salary structure not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    config: web::Data<Config>,
    payload: web::Json<GeneratePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let period = PayPeriod::new(payload.month, payload.year)?;
    let payroll = generator(store.get_ref(), &config)
        .generate(auth.company_id, payload.employee_id, period)
        .await?;

    Ok(HttpResponse::Created().json(PayrollResponse::from(&payroll)))
}

#[utoipa::path(
    post,
    path = "/api/payroll/bulk",
    request_body = GenerateCompanyPayroll,
    responses(
        (status = 200, description = "Per-employee outcomes", body = BulkPayrollResponse),
        (status = 400, description = "Invalid period"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_company_payroll(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    config: web::Data<Config>,
    payload: web::Json<GenerateCompanyPayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let period = PayPeriod::new(payload.month, payload.year)?;
    let run = generator(store.get_ref(), &config)
        .generate_for_company(auth.company_id, period)
        .await?;

    Ok(HttpResponse::Ok().json(BulkPayrollResponse::from(&run)))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, body = PayrollResponse),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payroll = visible_payroll(&auth, store.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PayrollResponse::from(&payroll)))
}

#[utoipa::path(
    patch,
    path = "/api/payroll/{payroll_id}/status",
    request_body = UpdatePayrollStatus,
    params(
        ("payroll_id", description = "Payroll ID")
    ),
    responses(
        (status = 200, description = "Payroll status updated", body = PayrollResponse),
        (status = 403),
        (status = 404, description = "Payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll_status(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    path: web::Path<u64>,
    body: web::Json<UpdatePayrollStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();
    visible_payroll(&auth, store.get_ref(), payroll_id).await?;

    let updated = store
        .update_payroll_status(payroll_id, body.status)
        .await?
        .ok_or_else(|| PayrollError::not_found("Payroll not found"))?;

    tracing::info!(
        payroll_id,
        status = %updated.status,
        by = %auth.username,
        user_id = auth.user_id,
        "Payroll status updated"
    );
    Ok(HttpResponse::Ok().json(PayrollResponse::from(&updated)))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1).saturating_mul(per_page);

    let employee_id = if auth.is_admin() {
        query.employee_id
    } else {
        let own = auth
            .employee_id
            .ok_or_else(|| PayrollError::Authorization("No employee profile".into()))?;
        Some(own)
    };

    let mut filter = PayrollFilter {
        company_id: Some(auth.company_id),
        employee_id,
        month: query.month,
        year: query.year,
        ..PayrollFilter::default()
    };
    let total = store.count_payrolls(&filter).await?;

    filter.limit = Some(per_page);
    filter.offset = Some(offset);
    let data = store
        .list_payrolls(&filter)
        .await?
        .iter()
        .map(PayrollResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}
