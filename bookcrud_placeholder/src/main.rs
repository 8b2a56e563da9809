use std::env;

use actix_web::{web, App, HttpServer};

/// Deployment-check endpoint; this server has no data and no routes beyond it.
async fn greeting() -> &'static str {
    "Placeholder server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let port: u16 = env::var("PORT")
        .map(|value| value.parse().expect("PORT must be a number"))
        .unwrap_or(8080);

    println!("starting placeholder server at http://localhost:{}", port);

    HttpServer::new(|| App::new().route("/", web::get().to(greeting)))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
