//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::core::registry::ModelRegistry;
use crate::server::handlers::health_check;
use crate::server::middleware::RequestIdMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::net::TcpListener;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, loading the static registry from config
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let registry = Arc::new(Self::build_registry(config)?);
        let state = AppState::new(config.clone(), registry)?;

        Ok(Self {
            config: config.gateway.server.clone(),
            state,
        })
    }

    /// Register configured providers, then models. Any duplicate aborts startup.
    pub fn build_registry(config: &Config) -> Result<ModelRegistry> {
        let registry = ModelRegistry::new();

        for provider in &config.gateway.providers {
            registry.register_provider(provider.clone()).map_err(|e| {
                GatewayError::Config(format!("Failed to register provider: {}", e))
            })?;
        }

        for model in &config.gateway.models {
            registry
                .register(model.clone())
                .map_err(|e| GatewayError::Config(format!("Failed to register model: {}", e)))?;
        }

        if registry.is_empty() {
            debug!("No models configured, every routed request will return 404");
        }
        info!(
            providers = config.gateway.providers.len(),
            models = registry.len(),
            "Model registry loaded"
        );

        Ok(registry)
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let server_config = state.config.server();
        let cors = Self::build_cors(server_config);
        let body_limit = web::PayloadConfig::new(server_config.max_body_size);

        App::new()
            .app_data(state)
            .app_data(body_limit)
            .wrap(cors)
            .wrap(DefaultHeaders::new().add(("Server", "passthrough-gateway")))
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .route("/health", web::get().to(health_check))
            .configure(routes::ai::configure_routes)
    }

    fn build_cors(server_config: &ServerConfig) -> Cors {
        let cors_config = &server_config.cors;
        if !cors_config.enabled {
            return Cors::default();
        }

        let mut cors = if cors_config.allows_all_origins() {
            Cors::default().allow_any_origin()
        } else {
            cors_config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };

        cors = cors
            .allowed_methods(["GET", "POST", "OPTIONS"])
            .allow_any_header()
            .expose_any_header()
            .max_age(cors_config.max_age as usize);

        if cors_config.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors
    }

    /// Bind the configured address and return the running server handle
    pub fn bind(self) -> Result<Server> {
        let bind_addr = self.config.address();
        let port = self.config.port;
        let listener = TcpListener::bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?;
        self.run(listener)
    }

    /// Serve on an already-bound listener
    pub fn run(self, listener: TcpListener) -> Result<Server> {
        let workers = self.config.worker_count();
        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .listen(listener)
            .map_err(|e| GatewayError::server(format!("Failed to listen: {}", e)))?
            .run();

        Ok(server)
    }

    /// Start the HTTP server and wait until it stops
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let server = self.bind()?;
        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
