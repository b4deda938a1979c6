use geo::{Coord, Polygon};
use geojson::FeatureCollection;
use serde::Serialize;

pub const PREVIEW_ZOOM: u8 = 16;

/// What a map viewer needs to show a converted collection.
#[derive(Serialize, Debug)]
pub struct Preview<'a> {
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub data: &'a FeatureCollection,
}

impl<'a> Preview<'a> {
    /// `None` when the collection has no coordinate to center on.
    pub fn new(collection: &'a FeatureCollection) -> Option<Self> {
        let Coord { x, y } = viewport_center(collection)?;

        Some(Self {
            center: [x, y],
            zoom: PREVIEW_ZOOM,
            data: collection,
        })
    }
}

/// First vertex of the first feature.
pub fn viewport_center(collection: &FeatureCollection) -> Option<Coord<f64>> {
    let geometry = collection.features.first()?.geometry.as_ref()?;

    let polygon = Polygon::<f64>::try_from(geometry.value.clone()).ok()?;

    polygon.exterior().0.first().copied()
}
