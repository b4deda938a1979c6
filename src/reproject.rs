use crate::{
    error::{Error, MalformedInput},
    loops::Loop,
};
use proj::{Proj, Transform};
use std::borrow::Cow;
use tracing::debug;

pub const WGS84: &str = "EPSG:4326";

/// Source CRS to WGS84 transform, built once per conversion. Output axis
/// order is (longitude, latitude).
pub struct Reprojector {
    proj: Proj,
}

impl Reprojector {
    pub fn to_wgs84(source_crs: &str) -> Result<Self, Error> {
        let definition = crs_definition(source_crs);

        debug!("Creating transform {definition} -> {WGS84}");

        // new_known_crs normalizes the axis order for visualization
        let proj = Proj::new_known_crs(&definition, WGS84, None).map_err(|source| {
            Error::InvalidCrs {
                crs: source_crs.to_string(),
                source,
            }
        })?;

        Ok(Self { proj })
    }

    pub fn reproject(&self, lp: &mut Loop) -> Result<(), Error> {
        if lp.vertices.0.is_empty() {
            return Err(MalformedInput::EmptyLoop {
                loop_id: lp.id.clone(),
            }
            .into());
        }

        lp.vertices
            .transform(&self.proj)
            .map_err(|source| Error::Reprojection {
                loop_id: lp.id.clone(),
                source,
            })?;

        if lp
            .vertices
            .coords()
            .any(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(Error::NonFiniteCoordinate {
                loop_id: lp.id.clone(),
            });
        }

        Ok(())
    }
}

/// Bare numbers are taken as EPSG codes; anything else goes to PROJ as is.
pub fn crs_definition(source_crs: &str) -> Cow<'_, str> {
    let trimmed = source_crs.trim();

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Cow::Owned(format!("EPSG:{trimmed}"))
    } else {
        Cow::Borrowed(trimmed)
    }
}
