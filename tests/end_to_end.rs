//! End-to-end scenarios against a live State Store and Registry (§8).
//!
//! Gated behind `#[ignore]` the same way the adapters' own integration
//! tests are: run manually or in CI with `STORE_URL`/`DB_URL` pointed at a
//! real Dragonfly/Redis and Postgres instance.

use actix_web::{test, web, App};
use banditsvc::registry::Registry;
use banditsvc::service::{routes, AppState, Metrics};
use banditsvc::store::PosteriorStore;
use banditsvc::{config::Config, registry, store};
use serde_json::{json, Value};

async fn live_config() -> Config {
    Config {
        db_url: std::env::var("DB_URL").expect("DB_URL must be set for end-to-end tests"),
        store_url: std::env::var("STORE_URL").expect("STORE_URL must be set for end-to-end tests"),
        bind_addr: "127.0.0.1:0".to_string(),
        stopping_threshold: 0.95,
        m_hot: 1_000,
        m_stop: 10_000,
        sweep_interval_secs: 1_800,
        annotation_sink_url: None,
        annotation_sink_token: None,
        annotation_timeout_secs: 10,
        enforce_concluded_guard: false,
    }
}

fn fresh_id(label: &str) -> String {
    format!("test:{label}:{}", uuid::Uuid::new_v4())
}

#[actix_web::test]
#[ignore]
async fn scenario_1_fresh_experiment_has_uniform_p_best() {
    let config = live_config().await;
    let store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;
    let api = web::Data::new(AppState::new(store, registry, config.m_hot, config.m_stop, false));
    let metrics = web::Data::new(Metrics::new());
    let app = test::init_service(
        App::new().app_data(api.clone()).app_data(metrics.clone()).configure(routes),
    )
    .await;

    let experiment_id = fresh_id("exp-a");
    let req = test::TestRequest::post()
        .uri("/experiments")
        .set_json(json!({ "experiment_id": experiment_id, "n_arms": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get()
        .uri(&format!("/experiments/{experiment_id}/p_best"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let p_best = body["p_best"].as_array().unwrap();
    assert_eq!(p_best.len(), 3);
    for p in p_best {
        let p = p.as_f64().unwrap();
        assert!((p - 1.0 / 3.0).abs() < 2e-2, "p_best={p}");
    }
}

#[actix_web::test]
#[ignore]
async fn scenario_2_decisive_arm_crosses_the_stopping_threshold() {
    let config = live_config().await;
    let store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;
    let api = web::Data::new(AppState::new(store, registry, config.m_hot, config.m_stop, false));
    let metrics = web::Data::new(Metrics::new());
    let app = test::init_service(
        App::new().app_data(api.clone()).app_data(metrics.clone()).configure(routes),
    )
    .await;

    let experiment_id = fresh_id("exp-b");
    let req = test::TestRequest::post()
        .uri("/experiments")
        .set_json(json!({ "experiment_id": experiment_id, "n_arms": 2 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    for (arm_id, reward, n) in [(1, 1.0, 100), (1, 0.0, 10), (0, 1.0, 5), (0, 0.0, 95)] {
        for _ in 0..n {
            let req = test::TestRequest::post()
                .uri("/reward")
                .set_json(json!({ "experiment_id": experiment_id, "arm_id": arm_id, "reward": reward }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 204);
        }
    }

    let req = test::TestRequest::get()
        .uri(&format!("/experiments/{experiment_id}/p_best"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let p_best_arm_1 = body["p_best"][1].as_f64().unwrap();
    assert!(p_best_arm_1 > 0.99, "p_best[1]={p_best_arm_1}");

    let req = test::TestRequest::get()
        .uri(&format!("/experiments/{experiment_id}/conclude?threshold=0.95"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["should_conclude"], true);
    assert_eq!(body["winner_arm_id"], 1);
}

#[actix_web::test]
#[ignore]
async fn scenario_3_reward_outside_unit_interval_is_rejected() {
    let config = live_config().await;
    let store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;
    let api = web::Data::new(AppState::new(store, registry, config.m_hot, config.m_stop, false));
    let metrics = web::Data::new(Metrics::new());
    let app = test::init_service(
        App::new().app_data(api.clone()).app_data(metrics.clone()).configure(routes),
    )
    .await;

    let experiment_id = fresh_id("exp-c");
    let req = test::TestRequest::post()
        .uri("/experiments")
        .set_json(json!({ "experiment_id": experiment_id, "n_arms": 2 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/reward")
        .set_json(json!({ "experiment_id": experiment_id, "arm_id": 0, "reward": 1.5 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 422);
}

#[actix_web::test]
#[ignore]
async fn scenario_4_reward_against_unknown_experiment_is_not_found() {
    let config = live_config().await;
    let store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;
    let api = web::Data::new(AppState::new(store, registry, config.m_hot, config.m_stop, false));
    let metrics = web::Data::new(Metrics::new());
    let app = test::init_service(
        App::new().app_data(api.clone()).app_data(metrics.clone()).configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reward")
        .set_json(json!({ "experiment_id": "missing", "arm_id": 0, "reward": 1.0 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
#[ignore]
async fn scenario_6_concurrent_selects_and_rewards_preserve_the_counter_invariant() {
    let config = live_config().await;
    let mut store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;

    let experiment_id = fresh_id("exp-f");
    registry.create(&experiment_id, 2).await.unwrap();
    store.seed(&experiment_id, 2).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..1_000 {
        let mut store = store.clone();
        let experiment_id = experiment_id.clone();
        handles.push(tokio::spawn(async move {
            store
                .apply_reward(&experiment_id, i % 2, i % 3 == 0)
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (alphas, betas) = store.read_posteriors(&experiment_id, 2).await.unwrap();
    let total: u64 = alphas.iter().chain(betas.iter()).sum::<u64>() - 4;
    assert_eq!(total, 1_000);
}
