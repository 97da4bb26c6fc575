pub mod dashboard_route;
pub mod results_route;
