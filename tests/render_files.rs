//! Load sources from disk, render, and export.

use std::{fs, path::Path, time::Duration};

use choropleth::{Attribute, Dataset, Session, Sources, ViewConfig};

const DATA: &str = "\
name,Cost Index,Grocery Cost Index,Housing Cost Index,Utilities Cost Index,Transportation Cost Index,Miscellaneous Cost Index
Texas,91.6,89.5,84.2,99.5,93.9,95.6
Oklahoma,86.8,95.3,70.2,96.5,90.3,93.6
Nowhere,150,150,150,150,150,150
";

/// Two adjacent lon/lat boxes sharing the arc at 95°W.
const STATES: &str = r#"{
    "type": "Topology",
    "arcs": [
        [[-95, 30], [-95, 35]],
        [[-95, 35], [-100, 35], [-100, 30], [-95, 30]],
        [[-95, 30], [-90, 30], [-90, 35], [-95, 35]]
    ],
    "objects": {
        "states": {
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Polygon", "arcs": [[0, 1]], "properties": { "name": "Texas" } },
                { "type": "Polygon", "arcs": [[2, -1]], "properties": { "name": "Oklahoma" } },
                { "type": "Polygon", "arcs": [[2]], "properties": { "name": "Atlantis" } }
            ]
        }
    }
}"#;

const COUNTRIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "name": "Mexico" },
          "geometry": { "type": "Polygon", "coordinates": [[[-110, 20], [-95, 20], [-95, 28], [-110, 28], [-110, 20]]] } }
    ]
}"#;

fn write_sources(dir: &Path) -> Sources {
    fs::write(dir.join("data.csv"), DATA).unwrap();
    fs::write(dir.join("states.topojson"), STATES).unwrap();
    fs::write(dir.join("countries.geojson"), COUNTRIES).unwrap();
    Sources {
        states_object: Some("states".to_string()),
        ..Sources::new(dir.join("data.csv"), dir.join("states.topojson"))
    }
    .with_countries(dir.join("countries.geojson"))
}

#[test]
fn renders_map_chart_and_context_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path());
    let mut session = Session::new(Dataset::load(&sources).unwrap(), ViewConfig::default()).unwrap();

    assert_eq!(session.regions().len(), 3);
    assert!(!session.regions()[2].values.any_valid());
    assert_eq!(session.view().bars().len(), 3);

    session.select(Attribute::Housing, Duration::ZERO);
    let midway = session.render_svg(Duration::from_millis(250)).unwrap();
    assert!(midway.contains("Housing Cost Index by State"));

    session.settle();
    let svg = session.render_svg(Duration::ZERO).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"class="gratBackground""#));
    assert!(svg.contains(r#"class="countries""#));
    assert!(svg.contains(r#"class="statesMap Texas""#));
    assert!(svg.contains(r#"class="bar Oklahoma""#));
    assert!(svg.contains(r##"fill="#cccccc""##));
    assert!(svg.contains("Housing Cost Index</text>"));
}

#[test]
fn writes_output_files_and_respects_force() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path());
    let session = Session::new(Dataset::load(&sources).unwrap(), ViewConfig::default()).unwrap();

    let svg = dir.path().join("out").join("map.svg");
    session.write_svg(&svg, Duration::ZERO, false).unwrap();
    assert!(session.write_svg(&svg, Duration::ZERO, false).is_err());
    session.write_svg(&svg, Duration::ZERO, true).unwrap();

    let geojson = dir.path().join("joined.geojson");
    session.write_geojson(&geojson, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&geojson).unwrap()).unwrap();
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0]["properties"]["Cost Index"], 91.6);
    assert!(features[2]["properties"]["Cost Index"].is_null());
}

#[test]
fn missing_or_malformed_sources_fail_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path());

    let missing = Sources { data: dir.path().join("absent.csv"), ..sources.clone() };
    assert!(Dataset::load(&missing).is_err());

    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let broken = Sources { states: dir.path().join("broken.json"), ..sources.clone() };
    assert!(Dataset::load(&broken).is_err());

    fs::write(dir.path().join("nameless.csv"), "state,Cost Index\nTexas,91.6\n").unwrap();
    let nameless = Sources { data: dir.path().join("nameless.csv"), ..sources };
    assert!(Dataset::load(&nameless).is_err());
}

#[test]
fn config_file_overrides_layout() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path());
    fs::write(dir.path().join("view.json"), r#"{ "map": { "width": 400, "height": 300 } }"#).unwrap();
    let config = ViewConfig::from_json_file(&dir.path().join("view.json")).unwrap();
    assert_eq!(config.chart, ViewConfig::default().chart);

    let session = Session::new(Dataset::load(&sources).unwrap(), config).unwrap();
    let svg = session.render_svg(Duration::ZERO).unwrap();
    assert!(svg.contains(&format!(r#"width="{}""#, 400.0 + 816.0)));
}
