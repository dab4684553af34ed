//! Region server for the climate map.
//!
//! Answers "is this point in the Baltic Sea region?", serves the dimming mask
//! for the map overlay and the normalized forecast heat grid.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use baltic_region::config::{Config, HeatConfig};
use baltic_region::heat::{normalize, HeatFetcher, HeatPoint};
use baltic_region::ready::{self, Ready};
use baltic_region::region::{build_mask, classify, load_region, Classification, RegionSource};
use baltic_region::{LatLng, RegionFeatureCollection};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "region-server")]
#[command(about = "Baltic region lookup server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Region GeoJSON file or URL (overrides config)
    #[arg(long)]
    region: Option<String>,

    /// Do not fetch the forecast heat grid
    #[arg(long)]
    no_heat: bool,
}

/// Application state shared across handlers
struct AppState {
    region: Ready<RegionFeatureCollection>,
    heat: Option<Ready<Vec<HeatPoint>>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(region) = args.region {
        config.region.asset = Some(region);
    }
    if args.no_heat {
        config.heat.enabled = false;
    }

    info!("Baltic Region Server");

    let source = config.region.asset.as_deref().map(RegionSource::from);

    let state = Arc::new(AppState {
        region: spawn_region_loader(source),
        heat: config.heat.enabled.then(|| spawn_heat_loader(config.heat.clone())),
    });

    let app = router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/region", get(region_handler))
        .route("/v1/region/contains", get(contains_handler))
        .route("/v1/region/mask", get(mask_handler))
        .route("/v1/heat", get(heat_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the region asset in the background. Until it arrives (or if it
/// never does) lookups use the bounding box.
fn spawn_region_loader(source: Option<RegionSource>) -> Ready<RegionFeatureCollection> {
    let (publisher, ready) = ready::channel();

    let Some(source) = source else {
        info!("No region asset configured, using bounding box");
        return ready;
    };

    tokio::spawn(async move {
        match load_region(&source).await {
            Ok(region) => {
                info!("Region asset loaded from {}", source);
                publisher.publish(region);
            }
            Err(e) => warn!("Region asset unavailable, using bounding box: {}", e),
        }
    });

    ready
}

fn spawn_heat_loader(cfg: HeatConfig) -> Ready<Vec<HeatPoint>> {
    let (publisher, ready) = ready::channel();

    tokio::spawn(async move {
        let fetcher = match HeatFetcher::new(&cfg) {
            Ok(f) => f,
            Err(e) => {
                // Dropping the publisher marks the grid as abandoned
                warn!("Heat grid unavailable: {}", e);
                return;
            }
        };
        let points = fetcher.load(&cfg).await;
        publisher.publish(normalize(&points));
    });

    ready
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        region_loaded: state.region.is_ready(),
        heat_loaded: state.heat.as_ref().is_some_and(Ready::is_ready),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    region_loaded: bool,
    heat_loaded: bool,
}

/// Region asset summary
async fn region_handler(State(state): State<Arc<AppState>>) -> Json<RegionResponse> {
    let region = state.region.get();

    Json(RegionResponse {
        loaded: region.is_some(),
        geometry_type: region
            .as_deref()
            .and_then(RegionFeatureCollection::primary_geometry)
            .map(|g| g.type_name()),
        bounds: region.as_deref().and_then(|r| r.bounds()).map(|rect| {
            [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
        }),
    })
}

#[derive(Serialize)]
struct RegionResponse {
    loaded: bool,
    geometry_type: Option<&'static str>,
    /// "minLon,minLat,maxLon,maxLat"
    bounds: Option<[f64; 4]>,
}

/// Point membership test
async fn contains_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContainsQueryParams>,
) -> Json<ContainsResponse> {
    let point = LatLng::new(params.lat, params.lng);
    let region = state.region.get();
    let (inside, method) = classify(point, region.as_deref());

    tracing::debug!("Region lookup at ({}): {} via {:?}", point, inside, method);

    Json(ContainsResponse {
        lat: params.lat,
        lng: params.lng,
        inside,
        method,
    })
}

#[derive(Deserialize)]
struct ContainsQueryParams {
    lat: f64,
    lng: f64,
}

#[derive(Serialize)]
struct ContainsResponse {
    lat: f64,
    lng: f64,
    inside: bool,
    method: Classification,
}

/// Inverse mask polygon for the map overlay
async fn mask_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MaskResponse>, (StatusCode, String)> {
    let region = state.region.get();

    build_mask(region.as_deref())
        .map(|rings| Json(MaskResponse { rings }))
        .ok_or((
            StatusCode::NOT_FOUND,
            "No region mask available".to_string(),
        ))
}

#[derive(Serialize)]
struct MaskResponse {
    rings: Vec<Vec<LatLng>>,
}

/// Normalized forecast heat grid. 503 while loading, 500 if the loader
/// gave up before publishing.
async fn heat_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HeatResponse>, (StatusCode, String)> {
    let Some(heat) = &state.heat else {
        return Err((StatusCode::NOT_FOUND, "Heat grid is disabled".to_string()));
    };

    match heat.get() {
        Some(points) => Ok(Json(HeatResponse {
            points: points.to_vec(),
        })),
        None if heat.is_abandoned() => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Heat grid is unavailable".to_string(),
        )),
        None => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Heat grid is still loading".to_string(),
        )),
    }
}

#[derive(Serialize)]
struct HeatResponse {
    points: Vec<HeatPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use baltic_region::models::{Geometry, Position};
    use serde_json::Value;

    fn rectangle() -> RegionFeatureCollection {
        let ring = [[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]]
            .iter()
            .map(|&[lng, lat]| Position { lng, lat })
            .collect();
        RegionFeatureCollection::from_geometry(Geometry::Polygon {
            coordinates: vec![ring],
        })
    }

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::new(state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn get_json(url: String) -> (StatusCode, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status();
        let body = response.text().await.unwrap();
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_contains_falls_back_to_bounding_box() {
        let (_publisher, region) = ready::channel();
        let base = serve(AppState { region, heat: None }).await;

        let (status, body) = get_json(format!("{}/v1/region/contains?lat=58&lng=20", base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["inside"], true);
        assert_eq!(body["method"], "bounding_box");

        let (_, body) = get_json(format!("{}/v1/region/contains?lat=0&lng=0", base)).await;
        assert_eq!(body["inside"], false);
    }

    #[tokio::test]
    async fn test_contains_uses_loaded_region() {
        let (publisher, region) = ready::channel();
        publisher.publish(rectangle());
        let base = serve(AppState { region, heat: None }).await;

        let (_, body) = get_json(format!("{}/v1/region/contains?lat=5&lng=5", base)).await;
        assert_eq!(body["inside"], true);
        assert_eq!(body["method"], "polygon");

        let (_, body) = get_json(format!("{}/v1/region/contains?lat=58&lng=20", base)).await;
        assert_eq!(body["inside"], false);
    }

    #[tokio::test]
    async fn test_contains_rejects_bad_params() {
        let (_publisher, region) = ready::channel();
        let base = serve(AppState { region, heat: None }).await;

        let (status, _) = get_json(format!("{}/v1/region/contains?lat=abc&lng=5", base)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(format!("{}/v1/region/contains?lat=5", base)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mask_and_region_summary() {
        let (publisher, region) = ready::channel();
        let base = serve(AppState {
            region: region.clone(),
            heat: None,
        })
        .await;

        let (status, _) = get_json(format!("{}/v1/region/mask", base)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        publisher.publish(rectangle());

        let (status, body) = get_json(format!("{}/v1/region/mask", base)).await;
        assert_eq!(status, StatusCode::OK);
        let rings = body["rings"].as_array().unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], serde_json::json!([-90.0, 180.0]));
        assert_eq!(rings[1][1], serde_json::json!([10.0, 0.0]));

        let (_, body) = get_json(format!("{}/v1/region", base)).await;
        assert_eq!(body["loaded"], true);
        assert_eq!(body["geometry_type"], "Polygon");
        assert_eq!(body["bounds"], serde_json::json!([0.0, 0.0, 10.0, 10.0]));
    }

    #[tokio::test]
    async fn test_heat_states() {
        let (_publisher, region) = ready::channel();
        let base = serve(AppState { region, heat: None }).await;
        let (status, _) = get_json(format!("{}/v1/heat", base)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_region_publisher, region) = ready::channel();
        let (heat_publisher, heat) = ready::channel();
        let base = serve(AppState {
            region,
            heat: Some(heat),
        })
        .await;

        let (status, _) = get_json(format!("{}/v1/heat", base)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        heat_publisher.publish(vec![HeatPoint::from([50.0, 8.0, 0.5])]);

        let (status, body) = get_json(format!("{}/v1/heat", base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["points"], serde_json::json!([[50.0, 8.0, 0.5]]));

        let (_, body) = get_json(format!("{}/health", base)).await;
        assert_eq!(body["heat_loaded"], true);
        assert_eq!(body["region_loaded"], false);
    }

    #[tokio::test]
    async fn test_heat_loader_gave_up() {
        let (_region_publisher, region) = ready::channel();
        let (heat_publisher, heat) = ready::channel::<Vec<HeatPoint>>();
        drop(heat_publisher);
        let base = serve(AppState {
            region,
            heat: Some(heat),
        })
        .await;

        let (status, _) = get_json(format!("{}/v1/heat", base)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = get_json(format!("{}/health", base)).await;
        assert_eq!(body["heat_loaded"], false);
    }
}
