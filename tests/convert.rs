use dxf::{
    Drawing, Point,
    entities::{Entity, EntityType, Polyline, Vertex},
};
use std::{fs, path::PathBuf};
use survey2geojson::{
    ConvertOptions, Error, MalformedInput, SourceFormat, TimeStats, UnreadableFile, convert,
    convert_file,
};
use tempfile::TempDir;

const UTM_10N: &str = "EPSG:32610";

const LOOP1_CSV: &str = "\
X,Y,Z,R,G,B
# Object: survey/site/Loop1,,,,,
500100,4000200,12.5,255,0,0
500300,4000200,12.5,255,0,0
500300,4000400,12.5,255,0,0
end,,,,,
";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);

    fs::write(&path, contents).unwrap();

    path
}

fn write_drawing(dir: &TempDir, name: &str, layer: &str, points: &[(f64, f64)]) -> PathBuf {
    let mut drawing = Drawing::new();

    let mut poly = Polyline::default();

    for &(x, y) in points {
        poly.add_vertex(&mut drawing, Vertex::new(Point::new(x, y, 0.0)));
    }

    let mut entity = Entity::new(EntityType::Polyline(poly));
    entity.common.layer = layer.to_string();

    drawing.add_entity(entity);

    let path = dir.path().join(name);

    drawing.save_file(&path).unwrap();

    path
}

fn ring_coords(collection: &geojson::FeatureCollection, index: usize) -> Vec<[f64; 2]> {
    let json = serde_json::to_value(collection).unwrap();

    json["features"][index]["geometry"]["coordinates"][0]
        .as_array()
        .unwrap()
        .iter()
        .map(|position| {
            [
                position[0].as_f64().unwrap(),
                position[1].as_f64().unwrap(),
            ]
        })
        .collect()
}

fn assert_lon_lat(coords: &[[f64; 2]]) {
    for [lon, lat] in coords {
        assert!((-180.0..=180.0).contains(lon), "longitude {lon}");
        assert!((-90.0..=90.0).contains(lat), "latitude {lat}");
    }
}

#[test]
fn csv_loop_becomes_closed_reversed_ring() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(&dir, "site.csv", LOOP1_CSV);

    let (collection, target) =
        convert_file(&source, UTM_10N, &ConvertOptions::default(), &mut TimeStats::default())
            .unwrap();

    assert_eq!(target, dir.path().join("site.json"));
    assert!(target.exists());

    assert_eq!(collection.features.len(), 1);
    assert_eq!(
        collection.features[0].property("id"),
        Some(&serde_json::json!("Loop1"))
    );

    let coords = ring_coords(&collection, 0);

    assert_eq!(coords.len(), 4);
    assert_eq!(coords[0], coords[3]);
    assert_lon_lat(&coords);

    // closed then reversed: first, third, second, first
    assert!(coords[1][0] > coords[0][0], "north-east corner second");
    assert!(coords[1][1] > coords[0][1], "north-east corner second");
    assert!(coords[2][1] < coords[1][1], "south-east corner third");
    assert!(coords[2][0] > coords[0][0], "south-east corner third");
}

#[test]
fn one_feature_per_marker() {
    let dir = tempfile::tempdir().unwrap();

    let source = write_fixture(
        &dir,
        "plots.csv",
        "\
X,Y,Z,R,G,B
# Object: a/P1,,,,,
500000,4000000,0,0,0,0
500010,4000000,0,0,0,0
# Object: a/P2,,,,,
500100,4000100,0,0,0,0
# Object: a/P3,,,,,
500200,4000200,0,0,0,0
500210,4000200,0,0,0,0
500210,4000210,0,0,0,0
footer,,,,,
",
    );

    let collection = convert(&source, "32610", &ConvertOptions::default()).unwrap();

    assert_eq!(collection.features.len(), 3);

    for (index, expected_len) in [3, 2, 4].into_iter().enumerate() {
        let coords = ring_coords(&collection, index);

        assert_eq!(coords.len(), expected_len);
        assert_eq!(coords.first(), coords.last());
    }

    // pure conversion writes nothing
    assert!(!dir.path().join("plots.json").exists());
}

#[test]
fn conversion_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(&dir, "site.csv", LOOP1_CSV);

    let options = ConvertOptions::default();

    let (_, target) = convert_file(&source, UTM_10N, &options, &mut TimeStats::default()).unwrap();
    let first = fs::read(&target).unwrap();

    convert_file(&source, UTM_10N, &options, &mut TimeStats::default()).unwrap();
    let second = fs::read(&target).unwrap();

    assert_eq!(first, second);
}

#[test]
fn vertex_before_marker_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();

    let source = write_fixture(
        &dir,
        "bad.csv",
        "X,Y,Z,R,G,B\n500000,4000000,0,0,0,0\n# Object: a/L,,,,,\nend,,,,,\n",
    );

    let err = convert_file(&source, UTM_10N, &ConvertOptions::default(), &mut TimeStats::default())
        .unwrap_err();

    assert!(matches!(
        err,
        Error::MalformedInput(MalformedInput::VertexBeforeMarker { .. })
    ));
    assert!(!dir.path().join("bad.json").exists());
}

#[test]
fn invalid_crs_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(&dir, "site.csv", LOOP1_CSV);

    let err = convert_file(
        &source,
        "not-a-code",
        &ConvertOptions::default(),
        &mut TimeStats::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidCrs { .. }));
    assert!(!dir.path().join("site.json").exists());
}

#[test]
fn marker_without_vertices_is_malformed() {
    let dir = tempfile::tempdir().unwrap();

    let source = write_fixture(
        &dir,
        "empty.csv",
        "X,Y,Z,R,G,B\n# Object: a/Empty,,,,,\n# Object: a/Full,,,,,\n500000,4000000,0,0,0,0\nend,,,,,\n",
    );

    let err = convert(&source, UTM_10N, &ConvertOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        Error::MalformedInput(MalformedInput::EmptyLoop { ref loop_id }) if loop_id == "Empty"
    ));
}

#[test]
fn unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_fixture(&dir, "site.txt", LOOP1_CSV);

    assert!(matches!(
        convert(&source, UTM_10N, &ConvertOptions::default()),
        Err(Error::UnsupportedFormat(_))
    ));

    let forced = ConvertOptions {
        format: Some(SourceFormat::Csv),
        ..ConvertOptions::default()
    };

    assert_eq!(convert(&source, UTM_10N, &forced).unwrap().features.len(), 1);
}

#[test]
fn dxf_polyline_keeps_vertex_order() {
    let dir = tempfile::tempdir().unwrap();

    let points = [
        (500_100.0, 4_000_200.0),
        (500_300.0, 4_000_200.0),
        (500_300.0, 4_000_400.0),
    ];

    let source = write_drawing(&dir, "site.dxf", "SURVEY%%LoopA", &points);

    let (collection, target) =
        convert_file(&source, UTM_10N, &ConvertOptions::default(), &mut TimeStats::default())
            .unwrap();

    assert_eq!(target, dir.path().join("site.json"));

    assert_eq!(collection.features.len(), 1);
    assert_eq!(
        collection.features[0].property("id"),
        Some(&serde_json::json!("LoopA"))
    );

    let coords = ring_coords(&collection, 0);

    assert_eq!(coords.len(), 4);
    assert_eq!(coords[0], coords[3]);
    assert_lon_lat(&coords);

    // drawing order: west to east, then north
    assert!(coords[0][0] < coords[1][0]);
    assert!(coords[1][1] < coords[2][1]);
}

#[test]
fn dxf_layer_without_separator() {
    let dir = tempfile::tempdir().unwrap();

    let source = write_drawing(&dir, "site.dxf", "SURVEY", &[(500_000.0, 4_000_000.0)]);

    assert!(matches!(
        convert(&source, UTM_10N, &ConvertOptions::default()),
        Err(Error::MalformedInput(MalformedInput::MissingLayerToken { .. }))
    ));
}

#[test]
fn missing_and_corrupt_drawings_are_distinguished() {
    let dir = tempfile::tempdir().unwrap();
    let options = ConvertOptions::default();

    let missing = dir.path().join("missing.dxf");

    assert!(matches!(
        convert(&missing, UTM_10N, &options),
        Err(Error::UnreadableFile(UnreadableFile::NotADrawing(_)))
    ));

    let text = write_fixture(&dir, "text.dxf", "this is not\na drawing\n");

    assert!(matches!(
        convert(&text, UTM_10N, &options),
        Err(Error::UnreadableFile(UnreadableFile::NotADrawing(_)))
    ));

    let empty = write_fixture(&dir, "empty.dxf", "");

    assert!(matches!(
        convert_file(&empty, UTM_10N, &options, &mut TimeStats::default()),
        Err(Error::UnreadableFile(UnreadableFile::NotADrawing(_)))
    ));

    let truncated = write_fixture(
        &dir,
        "truncated.dxf",
        "  0\nSECTION\n  2\nENTITIES\n  0\nPOLYLINE\n 10\nabc\n",
    );

    assert!(matches!(
        convert_file(&truncated, UTM_10N, &options, &mut TimeStats::default()),
        Err(Error::UnreadableFile(UnreadableFile::CorruptDrawing(_)))
    ));

    assert!(!dir.path().join("empty.json").exists());
    assert!(!dir.path().join("truncated.json").exists());
}

#[test]
fn missing_csv_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        convert(&dir.path().join("nope.csv"), UTM_10N, &ConvertOptions::default()),
        Err(Error::UnreadableFile(UnreadableFile::Io(_)))
    ));
}
