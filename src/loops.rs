use geo::{Coord, LineString};
use indexmap::IndexMap;
use tracing::warn;

/// Named vertex sequence read from a survey file.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub id: String,
    pub vertices: LineString<f64>,
}

impl Loop {
    pub fn new(id: impl Into<String>, vertices: impl Into<LineString<f64>>) -> Self {
        Self {
            id: id.into(),
            vertices: vertices.into(),
        }
    }
}

/// Loops in order of first appearance, unique by id.
#[derive(Debug, Default)]
pub struct Loops {
    loops: IndexMap<String, LineString<f64>>,
}

impl Loops {
    /// Starts an empty loop and returns its index. A duplicate id discards the
    /// earlier vertices but keeps the earlier position.
    pub fn start(&mut self, id: String) -> usize {
        self.insert(Loop::new(id, Vec::<Coord<f64>>::new()))
    }

    pub fn push_vertex(&mut self, index: usize, coord: Coord<f64>) {
        if let Some((_, vertices)) = self.loops.get_index_mut(index) {
            vertices.0.push(coord);
        }
    }

    pub fn insert(&mut self, lp: Loop) -> usize {
        let (index, previous) = self.loops.insert_full(lp.id, lp.vertices);

        if previous.is_some() {
            if let Some((id, _)) = self.loops.get_index(index) {
                warn!("Duplicate loop id {id:?}, overwriting earlier loop");
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.loops.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&LineString<f64>> {
        self.loops.get(id)
    }
}

impl IntoIterator for Loops {
    type Item = Loop;
    type IntoIter = std::vec::IntoIter<Loop>;

    fn into_iter(self) -> Self::IntoIter {
        self.loops
            .into_iter()
            .map(|(id, vertices)| Loop { id, vertices })
            .collect::<Vec<_>>()
            .into_iter()
    }
}
