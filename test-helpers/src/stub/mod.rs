//! A stand-in for the healthcare REST backend, serving the endpoints that
//! `payloads::APIClient` calls from an in-memory [`Store`].

pub mod routes;
pub mod store;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use std::net::TcpListener;
use std::sync::Mutex;

pub use store::Store;

pub type SharedStore = web::Data<Mutex<Store>>;

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
    /// List of allowed CORS origins. Use "*" to allow any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".into(),
            port: 0,
            allowed_origins: vec!["*".into()],
        }
    }
}

impl Config {
    /// Read `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS`, falling back to the
    /// development defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Override fields with `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS` where
    /// those are set.
    pub fn with_env(self) -> Self {
        use std::env::var;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(self.allowed_origins);

        Config {
            ip: var("IP_ADDRESS").unwrap_or(self.ip),
            port: var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(self.port),
            allowed_origins,
        }
    }
}

/// Build the server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(config: &mut Config, store: SharedStore) -> std::io::Result<Server> {
    let allowed_origins = config.allowed_origins.clone();

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let cors = if allowed_origins.iter().any(|o| o == "*") {
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
        } else {
            allowed_origins.iter().fold(
                Cors::default().allow_any_method().allow_any_header(),
                |cors, origin| cors.allowed_origin(origin),
            )
        };

        App::new()
            .wrap(cors)
            .service(routes::api_services())
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
