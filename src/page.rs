use crate::classify;
use crate::config::AppConfig;
use crate::scene::Scene;
use crate::types::Dataset;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub const PAGE_TITLE: &str = "市町村別の合計特殊出生率の可視化";

pub const CAPTION: &str =
    "※本グラフは合計特殊出生率の値を視覚的に強調するため、係数として7乗した値で描画しています。";

const DECK_GL_CDN: &str = "https://unpkg.com/deck.gl@9.0.0/dist.min.js";

/// The fixed reference-metadata rows shown in the expandable panel.
pub fn reference_entries() -> [(&'static str, &'static str); 4] {
    [
        (
            "人口動態統計特殊報告",
            "平成30年～令和４年人口動態保健所・市区町村別統計の概況",
        ),
        ("年", "2020年（令和2年）"),
        (
            "※",
            "楢葉町、富岡町、川内村、大熊町、双葉町、浪江町、葛尾村、飯舘村、球磨村のデータなし",
        ),
        (
            "URL",
            "https://www.mhlw.go.jp/toukei/saikin/hw/jinkou/other/hoken24/index.html",
        ),
    ]
}

/// Renders the page and writes it under the configured output directory.
/// The document is assembled in memory first so a failed render never
/// leaves a truncated index.html behind.
pub fn write_page(config: &AppConfig, scene: &Scene, dataset: &Dataset) -> Result<PathBuf> {
    let mut buf = Vec::new();
    render_page(
        &mut buf,
        scene,
        dataset,
        &config.input.dropped_display_columns,
    )?;

    fs::create_dir_all(&config.output.page_dir).with_context(|| {
        format!("Failed to create output directory {:?}", config.output.page_dir)
    })?;
    let path = config.output.page_dir.join("index.html");
    fs::write(&path, buf).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}

/// Writes the complete HTML document: title, map, caption, expandable
/// reference/raw-data panel, legend. Pure templating over data already
/// computed upstream.
pub fn render_page<W: Write>(
    w: &mut W,
    scene: &Scene,
    dataset: &Dataset,
    dropped_columns: &[usize],
) -> Result<()> {
    let scene_json = scene.to_json()?;

    write!(
        w,
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<script src="{deck}"></script>
<style>
body {{ font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 1rem; }}
#map {{ position: relative; height: 600px; background: #111; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; font-size: 0.85rem; }}
caption, .caption {{ color: #555; font-size: 0.85rem; text-align: left; }}
details {{ margin: 1rem 0; }}
.data-panel {{ max-height: 400px; overflow-y: auto; }}
ul.legend {{ list-style-type: none; padding-left: 0; }}
</style>
</head>
<body>
<h1>{title}</h1>
<div id="map"></div>
"#,
        title = PAGE_TITLE,
        deck = DECK_GL_CDN,
    )?;

    write_map_script(w, &scene_json)?;

    write!(w, "<p class=\"caption\">{}</p>\n", escape_html(CAPTION))?;

    write!(w, "<details>\n<summary>参照データ</summary>\n")?;
    write_reference_table(w)?;
    write_raw_data_table(w, dataset, dropped_columns)?;
    write!(w, "</details>\n")?;

    write_legend(w)?;

    write!(w, "</body>\n</html>\n")?;
    Ok(())
}

fn write_map_script<W: Write>(w: &mut W, scene_json: &str) -> Result<()> {
    // `<` in a JSON string could otherwise close the script block from
    // inside the data; the unicode escape reads back as the same
    // character.
    let scene_json = scene_json.replace('<', "\\u003c");
    write!(
        w,
        r#"<script>
const scene = {json};
new deck.DeckGL({{
  container: "map",
  initialViewState: scene.initialViewState,
  controller: true,
  layers: [
    new deck.ColumnLayer({{
      id: "tfr-columns",
      data: scene.layer.data,
      getPosition: d => [d.longitude, d.latitude],
      getElevation: d => d.height,
      getFillColor: d => d.color,
      radius: scene.layer.radius,
      elevationScale: scene.layer.elevationScale,
      elevationRange: scene.layer.elevationRange,
      coverage: scene.layer.coverage,
      autoHighlight: scene.layer.autoHighlight,
      pickable: scene.layer.pickable,
      extruded: scene.layer.extruded,
    }}),
  ],
  getTooltip: ({{object}}) => object && {{
    html: scene.tooltip.html
      .replace("{{name}}", object.name)
      .replace("{{rate}}", object.rate),
    style: scene.tooltip.style,
  }},
}});
</script>
"#,
        json = scene_json,
    )?;
    Ok(())
}

fn write_reference_table<W: Write>(w: &mut W) -> Result<()> {
    write!(w, "<table class=\"reference\">\n")?;
    for (key, value) in reference_entries() {
        if value.starts_with("http") {
            write!(
                w,
                "<tr><th>{}</th><td><a href=\"{}\">{}</a></td></tr>\n",
                escape_html(key),
                escape_html(value),
                escape_html(value),
            )?;
        } else {
            write!(
                w,
                "<tr><th>{}</th><td>{}</td></tr>\n",
                escape_html(key),
                escape_html(value),
            )?;
        }
    }
    write!(w, "</table>\n")?;
    Ok(())
}

/// Dumps the loaded table with the configured positional columns hidden.
fn write_raw_data_table<W: Write>(
    w: &mut W,
    dataset: &Dataset,
    dropped_columns: &[usize],
) -> Result<()> {
    let visible: Vec<usize> = (0..dataset.raw.headers.len())
        .filter(|i| !dropped_columns.contains(i))
        .collect();

    write!(w, "<div class=\"data-panel\">\n<table class=\"raw-data\">\n<tr>")?;
    for &i in &visible {
        write!(w, "<th>{}</th>", escape_html(&dataset.raw.headers[i]))?;
    }
    write!(w, "</tr>\n")?;

    for row in &dataset.raw.rows {
        write!(w, "<tr>")?;
        for &i in &visible {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            write!(w, "<td>{}</td>", escape_html(cell))?;
        }
        write!(w, "</tr>\n")?;
    }
    write!(w, "</table>\n</div>\n")?;
    Ok(())
}

fn write_legend<W: Write>(w: &mut W) -> Result<()> {
    write!(w, "<h2>凡例</h2>\n<ul class=\"legend\">\n")?;
    for (label, color) in classify::legend_entries() {
        write!(
            w,
            "<li><span style=\"color: {};\">■</span> {}</li>\n",
            color.css(),
            escape_html(&label),
        )?;
    }
    write!(w, "</ul>\n")?;
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
