use crate::config::AppConfig;
use crate::types::{Dataset, Municipality};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

/// Hits farther than this from every municipality centroid return null.
const MAX_QUERY_DISTANCE_KM: f64 = 30.0;

pub struct AppState {
    pub records: Vec<Municipality>,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct QueryParams {
    lon: f64,
    lat: f64,
}

#[derive(Serialize)]
pub struct QueryResponse {
    name: String,
    longitude: f64,
    latitude: f64,
    rate: f64,
}

/// Serves the rendered page plus a point-lookup API over the loaded
/// dataset. The dataset is shared read-only; nothing mutates it after
/// load.
pub async fn start_server(config: AppConfig, dataset: Dataset) -> Result<()> {
    let state = Arc::new(AppState {
        records: dataset.records,
        config: config.clone(),
    });

    let port = config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    info!("Starting server on http://{}", addr);

    let app = Router::new()
        .route("/api/query", get(query_handler))
        .nest_service("/", ServeDir::new(&config.output.page_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Json<Option<QueryResponse>> {
    let hit = nearest_municipality(&state.records, params.lon, params.lat);
    Json(hit.map(|m| QueryResponse {
        name: m.name.clone(),
        longitude: m.longitude,
        latitude: m.latitude,
        rate: m.rate,
    }))
}

/// Linear scan for the closest record within MAX_QUERY_DISTANCE_KM.
/// The dataset tops out around two thousand municipalities, so no
/// spatial index is needed.
fn nearest_municipality(records: &[Municipality], lon: f64, lat: f64) -> Option<&Municipality> {
    let mut best: Option<(&Municipality, f64)> = None;
    for m in records {
        let d = distance_km(lon, lat, m.longitude, m.latitude);
        if d <= MAX_QUERY_DISTANCE_KM && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((m, d));
        }
    }
    best.map(|(m, _)| m)
}

/// Equirectangular approximation, adequate at municipality scale.
fn distance_km(a_lon: f64, a_lat: f64, b_lon: f64, b_lat: f64) -> f64 {
    const KM_PER_DEG: f64 = 111.32;
    let mid_lat = ((a_lat + b_lat) / 2.0).to_radians();
    let dx = (b_lon - a_lon) * mid_lat.cos();
    let dy = b_lat - a_lat;
    (dx * dx + dy * dy).sqrt() * KM_PER_DEG
}

#[cfg(test)]
mod tests {
    use super::*;

    fn muni(name: &str, lon: f64, lat: f64) -> Municipality {
        Municipality {
            name: name.to_string(),
            longitude: lon,
            latitude: lat,
            rate: 1.3,
        }
    }

    #[test]
    fn finds_the_closest_record() {
        let records = vec![muni("far", 141.0, 43.0), muni("near", 139.7, 35.7)];
        let hit = nearest_municipality(&records, 139.69, 35.69).unwrap();
        assert_eq!(hit.name, "near");
    }

    #[test]
    fn distant_points_return_nothing() {
        let records = vec![muni("tokyo", 139.69, 35.69)];
        // Middle of the Pacific.
        assert!(nearest_municipality(&records, 170.0, 20.0).is_none());
    }

    #[test]
    fn distance_is_roughly_right_at_japanese_latitudes() {
        // One degree of latitude is ~111 km everywhere.
        let d = distance_km(139.0, 35.0, 139.0, 36.0);
        assert!((d - 111.32).abs() < 1.0);
        // One degree of longitude at 35N is ~91 km.
        let d = distance_km(139.0, 35.0, 140.0, 35.0);
        assert!((d - 91.2).abs() < 2.0);
    }
}
