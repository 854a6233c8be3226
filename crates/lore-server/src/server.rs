use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;

use crate::handlers;
use crate::state::AppState;

/// Route table, separated so integration tests can mount it on a test
/// service with their own state.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/generate", web::post().to(handlers::generate::handler))
            .route("/health", web::get().to(handlers::health::handler)),
    );
}

pub async fn run_server(port: u16, state: AppState) -> io::Result<()> {
    let state = web::Data::new(state);

    log::info!("listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
