use crate::{
    api::{attendance, employee, leave, payroll, performance, recruitment},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_conf = build_limiter(config.rate_login_per_min);
    let register_conf = build_limiter(config.rate_register_per_min);
    let refresh_conf = build_limiter(config.rate_refresh_per_min);
    let protected_conf = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_conf))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_conf))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Governor::new(&refresh_conf))
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_conf))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Recruitment: job browsing and applying are public; management handlers
    // enforce their role via the AuthUser extractor.
    cfg.service(
        web::scope(&format!("{}/recruitment", config.api_prefix))
            .wrap(Governor::new(&protected_conf))
            .service(
                web::resource("/jobs")
                    .route(web::post().to(recruitment::create_job))
                    .route(web::get().to(recruitment::list_jobs)),
            )
            .service(
                web::resource("/jobs/{id}")
                    .route(web::get().to(recruitment::get_job))
                    .route(web::put().to(recruitment::update_job)),
            )
            .service(
                web::resource("/applications").route(web::post().to(recruitment::apply)),
            )
            .service(
                web::resource("/applications/{job_id}")
                    .route(web::get().to(recruitment::list_applications)),
            )
            .service(
                web::resource("/applications/{job_id}/{application_id}")
                    .route(web::put().to(recruitment::update_application)),
            )
            .service(
                web::resource("/applications/{job_id}/{application_id}/interview")
                    .route(web::post().to(recruitment::schedule_interview)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&protected_conf)) // rate limiting
            .service(
                web::scope("/auth")
                    .service(web::resource("/me").route(web::get().to(handlers::me)))
                    .service(
                        web::resource("/change-password")
                            .route(web::put().to(handlers::change_password)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(web::resource("/report").route(web::get().to(attendance::report)))
                    .service(
                        web::resource("/employee/{id}")
                            .route(web::get().to(attendance::list_for_employee)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .service(web::resource("").route(web::post().to(leave::create_leave)))
                    .service(web::resource("/pending").route(web::get().to(leave::pending)))
                    .service(
                        web::resource("/balance/{employee_id}")
                            .route(web::get().to(leave::balance)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(leave::list_for_employee)),
                    )
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(leave::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(leave::reject_leave)),
                    )
                    .service(
                        web::resource("/{id}/cancel").route(web::put().to(leave::cancel_leave)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(leave::get_leave))),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::resource("/calculate").route(web::post().to(payroll::calculate)),
                    )
                    .service(web::resource("/generate").route(web::post().to(payroll::generate)))
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(payroll::list_for_employee)),
                    )
                    .service(
                        web::resource("/monthly/{month}/{year}")
                            .route(web::get().to(payroll::monthly)),
                    )
                    .service(
                        web::resource("/{id}").route(web::put().to(payroll::update_payroll)),
                    ),
            )
            .service(
                web::scope("/performance")
                    .service(
                        web::resource("")
                            .route(web::post().to(performance::create_evaluation)),
                    )
                    .service(
                        web::resource("/pending").route(web::get().to(performance::pending)),
                    )
                    .service(
                        web::resource("/analytics/{employee_id}")
                            .route(web::get().to(performance::analytics)),
                    )
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(performance::list_for_employee)),
                    )
                    .service(
                        web::resource("/{id}/acknowledge")
                            .route(web::put().to(performance::acknowledge)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(performance::get_evaluation))
                            .route(web::put().to(performance::update_evaluation)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
