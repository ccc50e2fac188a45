//! Prometheus scrape endpoint shared by all modules

use async_trait::async_trait;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Response, Server, StatusCode};
use jatsl::Job;
use library::metrics::MetricsRegistry;
use library::EmptyResult;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Job serving the rendered [`MetricsRegistry`] on `GET /metrics`
pub struct MetricsServerJob {
    port: u16,
    registry: Arc<MetricsRegistry>,
}

impl MetricsServerJob {
    /// Creates a new instance serving the given registry
    pub fn new(port: u16, registry: Arc<MetricsRegistry>) -> Self {
        Self { port, registry }
    }
}

#[async_trait]
impl Job for MetricsServerJob {
    const NAME: &'static str = module_path!();
    const SUPPORTS_GRACEFUL_TERMINATION: bool = true;

    async fn execute(&self, manager: jatsl::JobManager) -> EmptyResult {
        let registry = self.registry.clone();

        let make_svc = make_service_fn(move |_conn| {
            let registry = registry.clone();

            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let registry = registry.clone();

                    async move {
                        let response = match (req.method(), req.uri().path()) {
                            (&Method::GET, "/metrics") => Response::builder()
                                .header(hyper::header::CONTENT_TYPE, CONTENT_TYPE)
                                .body(Body::from(registry.render())),
                            _ => Response::builder()
                                .status(StatusCode::NOT_FOUND)
                                .body(Body::empty()),
                        };

                        response
                    }
                }))
            }
        });

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let server = Server::try_bind(&addr)?.serve(make_svc);
        let graceful = server.with_graceful_shutdown(manager.termination_signal());

        info!(?addr, "Serving metrics");
        manager.ready().await;
        graceful.await?;

        Ok(())
    }
}
