use crate::{
    api::{payroll, salary_structure},
    auth::middleware::auth_middleware,
    config::Config,
    error::PayrollError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("non-zero period and burst always build a quota");
        Governor::new(&cfg)
    }

    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.app_data(json_config()).app_data(query_config());

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .configure(payroll_routes),
    );
}

/// Malformed or missing body fields are validation failures, not 500s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| PayrollError::validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| PayrollError::validation(err.to_string()).into())
}

pub fn payroll_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            // /employees/{employee_id}/salary-structure
            .service(
                web::resource("/{employee_id}/salary-structure")
                    .route(web::get().to(salary_structure::get_salary_structure))
                    .route(web::patch().to(salary_structure::update_salary_structure)),
            ),
    )
    .service(
        web::scope("/payroll")
            // /payroll
            .service(
                web::resource("")
                    .route(web::post().to(payroll::generate_payroll))
                    .route(web::get().to(payroll::list_payrolls)),
            )
            // /payroll/bulk
            .service(
                web::resource("/bulk").route(web::post().to(payroll::generate_company_payroll)),
            )
            // /payroll/{payroll_id}
            .service(web::resource("/{payroll_id}").route(web::get().to(payroll::get_payroll)))
            // /payroll/{payroll_id}/status
            .service(
                web::resource("/{payroll_id}/status")
                    .route(web::patch().to(payroll::update_payroll_status)),
            ),
    );
}
