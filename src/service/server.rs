use super::api::AppState;
use super::error::AppError;
use super::metrics::{self, Metrics};
use super::request::{ConcludeQuery, CreateExperimentRequest, RewardRequest, SelectRequest};
use super::response::{
    ConcludeResponse, CreateExperimentResponse, HealthResponse, PBestResponse, SelectResponse,
};
use crate::config::Config;
use crate::{registry, store, DEFAULT_THRESHOLD};
use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::time::Instant;

pub struct Server;

impl Server {
    pub async fn run(config: Config) -> std::io::Result<()> {
        let store = store::connect(&config.store_url).await;
        let registry = registry::connect(&config.db_url).await;
        let api = web::Data::new(AppState::new(
            store,
            registry,
            config.m_hot,
            config.m_stop,
            config.enforce_concluded_guard,
        ));
        let metrics = web::Data::new(Metrics::new());
        let bind_addr = config.bind_addr.clone();
        log::info!("starting bandit inference service on {bind_addr}");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .wrap_fn(|req, srv| {
                    let path = req.path().to_string();
                    let metrics = req.app_data::<web::Data<Metrics>>().cloned();
                    let start = Instant::now();
                    let fut = srv.call(req);
                    async move {
                        let res = fut.await?;
                        if let Some(metrics) = metrics {
                            metrics.observe(&path, res.status().as_u16(), start.elapsed().as_secs_f64());
                        }
                        Ok(res)
                    }
                })
                .app_data(api.clone())
                .app_data(metrics.clone())
                .configure(routes)
        })
        .bind(bind_addr)?
        .run()
        .await
    }
}

/// Route table, factored out of `App` construction so tests can mount it
/// against a fake `web::Data<AppState>` without going through `HttpServer`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/experiments", web::post().to(create_experiment))
        .route("/select", web::post().to(select))
        .route("/reward", web::post().to(reward))
        .route("/experiments/{id}/conclude", web::get().to(conclude))
        .route("/experiments/{id}/p_best", web::get().to(p_best))
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics::handler));
}

async fn create_experiment(
    api: web::Data<AppState>,
    body: web::Json<CreateExperimentRequest>,
) -> Result<HttpResponse, AppError> {
    api.create_experiment(&body.experiment_id, body.n_arms).await?;
    Ok(HttpResponse::Created().json(CreateExperimentResponse {
        experiment_id: body.experiment_id.clone(),
        n_arms: body.n_arms,
        status: "initialised",
    }))
}

async fn select(
    api: web::Data<AppState>,
    body: web::Json<SelectRequest>,
) -> Result<HttpResponse, AppError> {
    let (arm_id, p_best) = api.select(&body.experiment_id).await?;
    Ok(HttpResponse::Ok().json(SelectResponse {
        arm_id,
        arm_name: format!("arm_{arm_id}"),
        p_best,
    }))
}

async fn reward(
    api: web::Data<AppState>,
    body: web::Json<RewardRequest>,
) -> Result<HttpResponse, AppError> {
    api.reward(&body.experiment_id, body.arm_id, body.reward).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn conclude(
    api: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ConcludeQuery>,
) -> Result<HttpResponse, AppError> {
    let experiment_id = path.into_inner();
    let threshold = query.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let (should_conclude, winner_arm_id, checked_at) =
        api.conclude_check(&experiment_id, threshold).await?;
    Ok(HttpResponse::Ok().json(ConcludeResponse {
        should_conclude,
        winner_arm_id,
        checked_at,
    }))
}

async fn p_best(
    api: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let experiment_id = path.into_inner();
    let p_best = api.p_best(&experiment_id).await?;
    Ok(HttpResponse::Ok().json(PBestResponse {
        experiment_id,
        p_best,
    }))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}
