use actix_web::{get, web, HttpResponse};
use askama::Template;

use crate::dal::load_document;
use crate::domain::StoreDocument;
use crate::startup::DashboardContext;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    total_companies: usize,
    platform_count: usize,
    crawled_at: String,
    rows: Vec<PlatformRow>,
}

pub struct PlatformRow {
    pub name: String,
    pub count: usize,
    pub share: String,
    pub companies: Vec<CompanyRow>,
}

pub struct CompanyRow {
    pub name: String,
    pub changed: bool,
    pub previous: String,
}

/// Groups stored entries per main platform for the distribution view.
/// Failed searches and the low-confidence 사람인 의심 guesses stay out, the
/// way the chart page has always filtered them.
pub fn build_platform_rows(document: &StoreDocument) -> (usize, Vec<PlatformRow>) {
    let mut rows: Vec<PlatformRow> = Vec::new();
    let mut total = 0usize;

    for result in &document.results {
        if result.main_platform.hidden_from_stats() {
            continue;
        }
        total += 1;

        let label = result.main_platform.to_string();
        let company = CompanyRow {
            name: result
                .company
                .split('\t')
                .next()
                .unwrap_or(&result.company)
                .to_string(),
            changed: result.platform_changed.unwrap_or(false),
            previous: result
                .previous_platform
                .map(|platform| platform.to_string())
                .unwrap_or_default(),
        };

        match rows.iter_mut().find(|row| row.name == label) {
            Some(row) => {
                row.count += 1;
                row.companies.push(company);
            }
            None => rows.push(PlatformRow {
                name: label,
                count: 1,
                share: String::new(),
                companies: vec![company],
            }),
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    for row in &mut rows {
        row.share = format!("{:.1}", row.count as f64 / total.max(1) as f64 * 100.0);
    }

    (total, rows)
}

#[get("/dashboard")]
pub async fn dashboard(context: web::Data<DashboardContext>) -> HttpResponse {
    let document = load_document(&context.store_path);
    let (total, rows) = build_platform_rows(&document);

    let page = DashboardTemplate {
        total_companies: total,
        platform_count: rows.len(),
        crawled_at: document
            .metadata
            .crawled_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "정보 없음".to_string()),
        rows,
    };

    match page.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Dashboard render failed: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
