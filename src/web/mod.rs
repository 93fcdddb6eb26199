//! Interactive plane viewer: serves an embedded canvas page, the current
//! plane as JSON, and a regenerate endpoint that rebroadcasts fresh planes
//! over SSE.

mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{config::Scenario, generator, plane::Plane};

pub struct ViewerConfig {
    pub scenario: Scenario,
    pub initial: Plane,
    pub host: String,
    pub port: u16,
}

struct AppState {
    scenario: Scenario,
    latest: Mutex<Plane>,
    broadcaster: broadcast::Sender<String>,
}

pub async fn run(config: ViewerConfig) -> Result<()> {
    let (tx, _) = broadcast::channel::<String>(64);
    let state = Arc::new(AppState {
        scenario: config.scenario,
        latest: Mutex::new(config.initial),
        broadcaster: tx,
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/plane", get(current_plane))
        .route("/api/regenerate", post(regenerate))
        .route("/api/events", get(stream_events))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("plane viewer live at http://{addr} (Ctrl+C to stop)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down plane viewer");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/css; charset=utf-8")
        .body(assets::STYLES_CSS.to_string())
        .unwrap()
}

async fn script() -> impl IntoResponse {
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )
        .body(assets::APP_JS.to_string())
        .unwrap()
}

async fn current_plane(State(state): State<Arc<AppState>>) -> Json<Plane> {
    let plane = state.latest.lock().expect("latest plane lock poisoned").clone();
    Json(plane)
}

#[derive(Deserialize)]
struct RegenerateParams {
    seed: Option<u64>,
}

async fn regenerate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegenerateParams>,
) -> Response {
    let scenario = state.scenario.clone();
    let seed = params.seed.unwrap_or_else(|| {
        let latest = state.latest.lock().expect("latest plane lock poisoned");
        latest.seed.wrapping_add(1)
    });

    let generated =
        tokio::task::spawn_blocking(move || generator::generate_seeded(&scenario, seed)).await;

    match generated {
        Ok(Ok(plane)) => {
            {
                let mut latest = state.latest.lock().expect("latest plane lock poisoned");
                *latest = plane.clone();
            }
            if let Ok(payload) = serde_json::to_string(&plane) {
                let _ = state.broadcaster.send(payload);
            }
            Json(plane).into_response()
        }
        Ok(Err(err)) => {
            error!("regeneration failed: {err}");
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
        }
        Err(err) => {
            error!("regeneration task failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "generation task failed".to_string(),
            )
                .into_response()
        }
    }
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
