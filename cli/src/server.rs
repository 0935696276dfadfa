#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use grossup::{
        Config, GrossUpError, PayrollBreakdown, PayrollDeductions, SearchLimits, SearchRequest,
        Searcher, Snapshot,
    };
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tracing::{error, info, warn};

    #[derive(Clone)]
    pub struct AppState {
        config: Arc<Config>,
        searcher: Arc<Searcher<PayrollDeductions>>,
    }

    impl AppState {
        pub fn new(config: Config) -> Self {
            let searcher = Searcher::from_config(config.deductions.clone(), &config);
            Self {
                config: Arc::new(config),
                searcher: Arc::new(searcher),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct NetQuery {
        gross: Decimal,
    }

    #[derive(Debug, Deserialize)]
    struct SolveRequest {
        target_net_salary: Decimal,
        #[serde(default)]
        starting_gross_salary: Option<Decimal>,
        #[serde(default)]
        max_iterations: Option<u64>,
        #[serde(default)]
        trace: bool,
    }

    impl SolveRequest {
        fn search_request(&self) -> SearchRequest {
            match self.starting_gross_salary {
                Some(start) => SearchRequest::new(start, self.target_net_salary),
                None => SearchRequest::from_target(self.target_net_salary),
            }
        }
    }

    #[derive(Debug, Serialize)]
    struct StartedResponse {
        search_id: u64,
    }

    #[derive(Debug, Serialize)]
    struct CancelResponse {
        cancelled: bool,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    type ApiError = (StatusCode, Json<ErrorResponse>);

    fn api_error(err: GrossUpError) -> ApiError {
        let status = if err.is_limit() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        };
        (
            status,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
    }

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/net", get(net_salary))
            .route("/solve", post(solve))
            .route("/searches", post(start_search))
            .route(
                "/searches/current",
                get(current_search).delete(cancel_search),
            )
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn start_server(config: Config, host: &str, port: u16) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "grossup=info,tower_http=info".into()),
            )
            .init();

        let app = router(AppState::new(config));

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("grossup server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "grossup",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    async fn net_salary(
        State(state): State<AppState>,
        Query(query): Query<NetQuery>,
    ) -> Json<PayrollBreakdown> {
        Json(state.config.deductions.breakdown(query.gross))
    }

    async fn solve(
        State(state): State<AppState>,
        Json(payload): Json<SolveRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let request = payload.search_request();
        let limits = SearchLimits {
            max_iterations: payload.max_iterations.or(state.config.limits.max_iterations),
            ..state.config.limits
        };
        let solver = state.config.solver().limits(limits).trace(payload.trace);

        let config = Arc::clone(&state.config);
        let outcome = tokio::task::spawn_blocking(move || {
            solver.solve(&config.deductions, request)
        })
        .await
        .map_err(|e| {
            error!("Search task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Search task failed".to_string(),
                }),
            )
        })?
        .map_err(|e| {
            warn!("Search failed: {}", e);
            api_error(e)
        })?;

        info!(
            "Solved net {} with gross {} in {} iterations",
            outcome.request.target_net_salary,
            outcome.gross_salary(),
            outcome.iterations
        );
        Ok(Json(outcome))
    }

    async fn start_search(
        State(state): State<AppState>,
        Json(payload): Json<SolveRequest>,
    ) -> impl IntoResponse {
        let handle = state.searcher.start(payload.search_request());
        let search_id = handle.search_id();

        tokio::spawn(async move {
            match handle.outcome().await {
                Ok(outcome) => info!(
                    "Live search {} settled on gross {}",
                    search_id,
                    outcome.gross_salary()
                ),
                Err(GrossUpError::Cancelled { .. }) => {
                    info!("Live search {} was replaced or cancelled", search_id)
                }
                Err(e) => warn!("Live search {} failed: {}", search_id, e),
            }
        });

        (StatusCode::ACCEPTED, Json(StartedResponse { search_id }))
    }

    async fn current_search(State(state): State<AppState>) -> Json<Snapshot> {
        Json(state.searcher.snapshot())
    }

    async fn cancel_search(State(state): State<AppState>) -> Json<CancelResponse> {
        Json(CancelResponse {
            cancelled: state.searcher.cancel(),
        })
    }

}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _config: grossup::Config,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
