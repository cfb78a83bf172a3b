use crate::types::{ColumnRecord, PipelineError};
use serde::Serialize;

// Fixed camera over the Tokyo area; the scene is not data-driven here.
pub const VIEW_LONGITUDE: f64 = 139.6917;
pub const VIEW_LATITUDE: f64 = 35.6895;
pub const VIEW_ZOOM: u8 = 4;
pub const VIEW_PITCH: u8 = 60;

pub const COLUMN_RADIUS: f64 = 1000.0;
pub const ELEVATION_SCALE: f64 = 300.0;
// How much neighbouring columns overlap.
pub const COVERAGE: f64 = 2.9;

pub const TOOLTIP_HTML: &str = "<b>{name}</b><br><b>合計特殊出生率:</b> {rate}";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: u8,
    pub pitch: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayer {
    pub radius: f64,
    pub elevation_scale: f64,
    pub elevation_range: [f64; 2],
    pub coverage: f64,
    pub auto_highlight: bool,
    pub pickable: bool,
    pub extruded: bool,
    pub data: Vec<ColumnRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tooltip {
    pub html: String,
    pub style: TooltipStyle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    pub background_color: String,
    pub color: String,
}

/// View + layer + tooltip, the full description handed to the rendering
/// surface. Serializes to the JSON the page script consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub initial_view_state: ViewState,
    pub layer: ColumnLayer,
    pub tooltip: Tooltip,
}

impl Scene {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Assembles the scene from the surviving records. The elevation domain
/// upper bound is recomputed from the current records each build, so an
/// empty set has no valid domain and is refused outright.
pub fn build_scene(records: Vec<ColumnRecord>) -> Result<Scene, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::EmptyScene);
    }

    let max_height = records.iter().map(|r| r.height).fold(0.0_f64, f64::max);

    Ok(Scene {
        initial_view_state: ViewState {
            longitude: VIEW_LONGITUDE,
            latitude: VIEW_LATITUDE,
            zoom: VIEW_ZOOM,
            pitch: VIEW_PITCH,
        },
        layer: ColumnLayer {
            radius: COLUMN_RADIUS,
            elevation_scale: ELEVATION_SCALE,
            elevation_range: [0.0, max_height * 100.0],
            coverage: COVERAGE,
            auto_highlight: true,
            pickable: true,
            extruded: true,
            data: records,
        },
        tooltip: Tooltip {
            html: TOOLTIP_HTML.to_string(),
            style: TooltipStyle {
                background_color: "steelblue".to_string(),
                color: "white".to_string(),
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    fn column(name: &str, rate: f64, height: f64) -> ColumnRecord {
        ColumnRecord {
            name: name.to_string(),
            longitude: 139.0,
            latitude: 35.0,
            rate,
            height,
            color: Rgb(0, 0, 255),
        }
    }

    #[test]
    fn elevation_range_tracks_the_max_height() {
        let scene = build_scene(vec![column("A", 1.1, 2.0), column("B", 1.26, 5.0)]).unwrap();
        assert_eq!(scene.layer.elevation_range, [0.0, 500.0]);
    }

    #[test]
    fn view_state_is_the_fixed_tokyo_camera() {
        let scene = build_scene(vec![column("A", 1.3, 6.27)]).unwrap();
        assert_eq!(scene.initial_view_state.longitude, 139.6917);
        assert_eq!(scene.initial_view_state.latitude, 35.6895);
        assert_eq!(scene.initial_view_state.zoom, 4);
        assert_eq!(scene.initial_view_state.pitch, 60);
    }

    #[test]
    fn empty_record_set_is_refused() {
        assert!(matches!(
            build_scene(Vec::new()),
            Err(PipelineError::EmptyScene)
        ));
    }

    #[test]
    fn scene_json_uses_camel_case_layer_props() {
        let scene = build_scene(vec![column("A", 1.3, 6.27)]).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        assert_eq!(json["initialViewState"]["zoom"], 4);
        assert_eq!(json["layer"]["elevationScale"], 300.0);
        assert_eq!(json["layer"]["coverage"], 2.9);
        assert_eq!(json["layer"]["autoHighlight"], true);
        assert_eq!(json["layer"]["data"][0]["color"][2], 255);
        assert_eq!(json["tooltip"]["style"]["backgroundColor"], "steelblue");
    }
}
