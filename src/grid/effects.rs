use crate::grid::prelude::*;

/// A side table of labels bound to cells (auras, terrain effects and the like).
///
/// Boards never read this; it is consulted by whoever handles [`BoardEvent::Placed`] to find the
/// labels lying under a freshly placed footprint.
#[derive(Clone, Debug, Default)]
pub struct CellEffectMap {
    labels: BTreeMap<Coord, Vec<String>>,
}

impl CellEffectMap {
    /// Adds a label to a cell.
    pub fn tag(&mut self, coord: Coord, label: impl Into<String>) -> &mut Self {
        self.labels.entry(coord).or_default().push(label.into());
        self
    }

    /// Removes every label from a cell.
    pub fn clear(&mut self, coord: &Coord) -> Option<Vec<String>> {
        self.labels.remove(coord)
    }

    /// The labels bound to a cell.
    pub fn labels_at(&self, coord: &Coord) -> &[String] {
        self.labels.get(coord).map_or(&[], |v| v.as_slice())
    }

    /// The labelled cells covered by a placement event, in row-major order. Other events cover nothing.
    pub fn labels_under(&self, event: &BoardEvent) -> Vec<(Coord, &[String])> {
        let BoardEvent::Placed { origin, footprint, .. } = event else {
            return vec![];
        };
        let rect = Rect::at(*origin, *footprint);
        let mut under = self
            .labels
            .iter()
            .filter(|(c, _)| rect.contains(c))
            .map(|(c, labels)| (*c, labels.as_slice()))
            .collect::<Vec<_>>();
        under.sort_by_key(|(c, _)| (c.row, c.col));
        under
    }
}
