use std::env;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use paperclip::actix::OpenApiExt;
use tracing_actix_web::TracingLogger;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use bookcrud_api::app_config::{config_app, json_config};
use bookcrud_api::books_repository::{
    BookRepository, InMemoryBookRepository, PostgresBooksRepository,
    PostgresBooksRepositoryConfig,
};

fn init_telemetry() {
    let app_name = "bookcrud_api";

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    // Emit spans as structured logs to stdout
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    let port: u16 = env::var("PORT")
        .map(|value| value.parse().expect("PORT must be a number"))
        .unwrap_or(8080);
    let use_in_memory_db = env::var("USE_IN_MEMORY_DB")
        .map(|value| value.to_lowercase() == "true")
        .unwrap_or_default();

    let books_repository: Arc<dyn BookRepository + Send + Sync> = if use_in_memory_db {
        Arc::new(InMemoryBookRepository::default())
    } else {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                tracing::error!("DATABASE_URL is missing");
                std::process::exit(1);
            }
        };
        Arc::new(
            PostgresBooksRepository::init(PostgresBooksRepositoryConfig { database_url })
                .await
                .expect("Failed to init postgres"),
        )
    };

    println!("starting HTTP server at http://localhost:{}", port);

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(actix_web::web::Data::new(books_repository.clone()))
            .app_data(json_config())
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
