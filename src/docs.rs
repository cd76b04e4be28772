use crate::api::payroll::{
    BulkEntry, BulkPayrollResponse, GenerateCompanyPayroll, GeneratePayroll,
    PaginatedPayrollResponse, PayrollQuery, PayrollResponse, UpdatePayrollStatus,
};
use crate::api::salary_structure::SalaryStructureResponse;
use crate::model::payroll::PayrollStatus;
use crate::model::salary_structure::SalaryRatesPatch;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Payroll API",
        version = "1.0.0",
        description = r#"
## Payroll engine of the HRM system

Maintains each employee's **salary structure** and generates **payroll**
records per calendar month.

### Salary structure
- The monthly wage and the component rates are the only inputs
- Every amount (basic, HRA, bonus, LTA, provident fund) is recomputed on each edit
- One structure per employee, created empty on the admin's first view

### Payroll
- One record per employee and month, regenerated from the current structure
- `net = basic + (HRA + standard + fuel allowance) - (employee PF + professional tax)`
- Company-wide runs report every employee's outcome individually

### Security
All endpoints require a **JWT Bearer** access token. Writes are **Admin** only
and every request is scoped to the caller's company.
"#,
    ),
    paths(
        crate::api::salary_structure::get_salary_structure,
        crate::api::salary_structure::update_salary_structure,

        crate::api::payroll::generate_payroll,
        crate::api::payroll::generate_company_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::update_payroll_status,
        crate::api::payroll::list_payrolls
    ),
    components(
        schemas(
            SalaryRatesPatch,
            SalaryStructureResponse,
            GeneratePayroll,
            GenerateCompanyPayroll,
            UpdatePayrollStatus,
            PayrollStatus,
            PayrollResponse,
            BulkEntry,
            BulkPayrollResponse,
            PaginatedPayrollResponse,
            PayrollQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Salary Structure", description = "Salary structure APIs"),
        (name = "Payroll", description = "Payroll generation APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
