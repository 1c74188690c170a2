// Web Server - main.rs
// web-server/src/main.rs
mod proxy;
mod static_files;

use actix_web::middleware::{Compress, Condition};
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use common::{setup_tracing, Config};
use proxy::Upstream;

#[get("/healthz")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    setup_tracing();

    let config = Config::from_env();
    let server_addr = config.web_server_addr.clone();

    let upstream = Upstream::new(&config.proxy.backend_origin)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    tracing::info!("Starting Web Server on {}", server_addr);
    tracing::info!("Backend origin: {}", upstream.origin());
    tracing::info!("Serving SPA from {}", config.static_files.path);

    let upstream = web::Data::new(upstream);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(
                config.static_files.enable_compression,
                Compress::default(),
            ))
            .app_data(upstream.clone())
            .service(health)
            .configure(|cfg| proxy::configure(cfg, &config.proxy.prefixes))
            // Catch-all, registered last
            .configure(|cfg| static_files::configure(cfg, &config.static_files))
    })
    .bind(&server_addr)?
    .run()
    .await
}
