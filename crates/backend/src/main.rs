pub mod api;
pub mod dashboards;
pub mod projections;
pub mod shared;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Простой middleware для логирования запросов
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use chrono::Utc;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        let duration = start.elapsed();
        // Время в логе — по бизнес-часам, как в отчетах
        let timestamp =
            Utc::now() + chrono::Duration::hours(shared::clock::BUSINESS_UTC_OFFSET_HOURS);

        // Голубой для 200, коричневый для остальных
        let color_code = if response.status().as_u16() == 200 {
            "36"
        } else {
            "33"
        };

        println!(
            "\x1b[{}m{}\x1b[0m | {:>5}ms | {} {:>6} {}",
            color_code,
            timestamp.format("%H:%M:%S"),
            duration.as_millis(),
            response.status().as_u16(),
            method,
            uri.path()
        );

        response
    }

    // Конфигурация (config.toml рядом с бинарником или встроенный дефолт)
    shared::config::init_config()?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // UseCase u501: загрузка манифестов
        // ========================================
        .route(
            "/api/u501/fetch/run",
            post(api::handlers::usecases::u501_run_fetch),
        )
        .route(
            "/api/u501/fetch/status",
            get(api::handlers::usecases::u501_fetch_status),
        )
        // ========================================
        // P900: таблица фактов манифестов
        // ========================================
        .route(
            "/api/p900/manifest-facts",
            get(api::handlers::p900_manifest_facts::list_facts),
        )
        // ========================================
        // D400: дашборд доставки по филиалам
        // ========================================
        .route(
            "/api/d400/branch_delivery",
            get(api::handlers::d400_branch_delivery::get_branch_delivery),
        )
        .route(
            "/api/d400/branch_delivery/stage_breakdown",
            get(api::handlers::d400_branch_delivery::get_stage_breakdown),
        )
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    // Стартовая загрузка манифестов; не блокирует запуск сервера
    tokio::spawn(api::handlers::usecases::run_initial_fetch());

    let addr: SocketAddr = ([0, 0, 0, 0], 3000).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port 3000 is already in use. Please ensure no other process is using this port."
                );
            } else {
                tracing::error!("Failed to bind to port 3000. Error: {}", e);
            }
            // Propagate the error to stop the application
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
