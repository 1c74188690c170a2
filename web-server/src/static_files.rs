// web-server/src/static_files.rs
use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpResponse};
use common::StaticFilesConfig;
use std::path::PathBuf;

// A last path segment with an extension names a file, not a client route
fn looks_like_asset(path: &str) -> bool {
    path.rsplit('/').next().map_or(false, |segment| segment.contains('.'))
}

async fn spa_fallback(req: ServiceRequest, index_path: PathBuf) -> Result<ServiceResponse, Error> {
    let (req, _) = req.into_parts();
    if looks_like_asset(req.path()) {
        return Ok(ServiceResponse::new(req, HttpResponse::NotFound().finish()));
    }
    let index = NamedFile::open_async(&index_path).await?;
    let res = index.into_response(&req);
    Ok(ServiceResponse::new(req, res))
}

/// Serve the built SPA; unknown client routes get the index page
pub fn configure(cfg: &mut web::ServiceConfig, config: &StaticFilesConfig) {
    let root = PathBuf::from(&config.path);
    let index_path = root.join(&config.index);

    if !index_path.exists() {
        tracing::warn!("SPA index {} not found; client routes will 404", index_path.display());
    }

    cfg.service(
        Files::new("/", &root)
            .index_file(config.index.clone())
            .prefer_utf8(true)
            .use_etag(true)
            .use_last_modified(true)
            .default_handler(fn_service(move |req: ServiceRequest| {
                spa_fallback(req, index_path.clone())
            })),
    );
}
