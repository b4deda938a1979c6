use crate::{error::MalformedInput, loops::Loop};
use geo::{LineString, Polygon};

/// How a reprojected loop is turned into a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPolicy {
    /// Always append the first vertex, then reverse the traversal (CSV).
    CloseAndReverse,
    /// Keep the CAD vertex order and close only an open ring (DXF).
    CloseIfOpen,
}

/// Closed outer ring of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: String,
    exterior: LineString<f64>,
}

impl Ring {
    pub fn new(lp: Loop, policy: RingPolicy) -> Result<Self, MalformedInput> {
        let Loop { id, mut vertices } = lp;

        let Some(&first) = vertices.0.first() else {
            return Err(MalformedInput::EmptyLoop { loop_id: id });
        };

        match policy {
            RingPolicy::CloseAndReverse => {
                vertices.0.push(first);
                vertices.0.reverse();
            }
            RingPolicy::CloseIfOpen => {
                if !vertices.is_closed() {
                    vertices.0.push(first);
                }
            }
        }

        Ok(Self {
            id,
            exterior: vertices,
        })
    }

    pub fn exterior(&self) -> &LineString<f64> {
        &self.exterior
    }

    pub fn into_polygon(self) -> Polygon<f64> {
        Polygon::new(self.exterior, vec![])
    }
}
