use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizgen_server::{
    app_state::AppState,
    config::Config,
    handlers::{self, generate_quiz, health_check, health_check_ready},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(e) = config.validate_for_production() {
        log::error!("{}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let bind = (config.web_server_host.clone(), config.web_server_port);
    let state = AppState::new(config)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!("starting HTTP server on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config())
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .service(generate_quiz)
            .service(health_check)
            .service(health_check_ready)
    })
    .bind(bind)?
    .run()
    .await
}
