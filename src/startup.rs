use std::net::TcpListener;
use std::path::PathBuf;

use actix_files::Files;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::configuration::Settings;
use crate::routes::{dashboard_route, results_route};

pub struct DashboardContext {
    pub store_path: PathBuf,
}

pub fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let results_dir = settings.storage.results_dir.clone();
    let context = Data::new(DashboardContext {
        store_path: settings.storage.store_path(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(web::redirect("/", "/dashboard"))
            .service(dashboard_route::dashboard)
            .service(results_route::api_results)
            .service(Files::new("/results", results_dir.clone()).prefer_utf8(true))
            .app_data(context.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
