use crate::{error::Error, ring::Ring};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

// One Polygon feature per ring, `properties.id` carrying the loop id
pub fn feature_collection(rings: impl IntoIterator<Item = Ring>) -> FeatureCollection {
    let features = rings
        .into_iter()
        .map(|ring| {
            let mut properties = JsonObject::new();

            properties.insert("id".into(), JsonValue::from(ring.id.clone()));

            let polygon = ring.into_polygon();

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&polygon))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// `<base name>.json` next to the input file.
pub fn output_path(source_file: &Path) -> PathBuf {
    source_file.with_extension("json")
}

// Serialize to a temporary file in the target directory and rename it into
// place, so a failed write never leaves a partial document.
pub fn write_geojson(collection: &FeatureCollection, target_file: &Path) -> Result<(), Error> {
    let write_error = |source| Error::Write {
        path: target_file.to_path_buf(),
        source,
    };

    let dir = match target_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(write_error)?;

    {
        let mut writer = BufWriter::new(tmp.as_file());

        serde_json::to_writer_pretty(&mut writer, collection)?;

        writer.flush().map_err(write_error)?;
    }

    tmp.persist(target_file)
        .map_err(|e| write_error(e.error))?;

    Ok(())
}
