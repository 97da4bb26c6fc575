use actix_web::{get, web, HttpResponse};

use crate::dal::load_document;
use crate::startup::DashboardContext;

/// Raw persisted document, the same shape the crawl writes to disk.
#[get("/api/results")]
pub async fn api_results(context: web::Data<DashboardContext>) -> HttpResponse {
    let document = load_document(&context.store_path);
    HttpResponse::Ok().json(document)
}
