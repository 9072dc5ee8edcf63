use crate::{
    entity::Locatable,
    location::GeoPoint,
    locator::{self, LocatorError, RankedEntity},
};

/// Navigation state for "closest X" browsing. Owned by whoever is presenting the map, the
/// locator functions themselves hold nothing between calls.
#[derive(Debug, Clone)]
pub struct NearestSession<T> {
    reference: Option<GeoPoint>,
    ranked: Vec<RankedEntity<T>>,
    cursor: usize,
}

impl<T> Default for NearestSession<T> {
    fn default() -> Self {
        Self {
            reference: None,
            ranked: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T: Locatable + Clone> NearestSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-rank everything against a new reference point and go back to the closest entity.
    /// Without a usable reference point the ranking is simply empty.
    pub fn relocate(
        &mut self,
        reference: Option<GeoPoint>,
        entities: &[T],
    ) -> Option<&RankedEntity<T>> {
        let reference = reference.filter(GeoPoint::is_finite);
        self.reference = reference;
        self.ranked = reference
            .map(|reference| locator::rank(reference, entities))
            .unwrap_or_default();
        self.cursor = 0;
        self.current()
    }

    pub fn reference(&self) -> Option<GeoPoint> {
        self.reference
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Current cursor and the total number of ranked entities
    pub fn position(&self) -> (usize, usize) {
        (self.cursor, self.ranked.len())
    }

    pub fn current(&self) -> Option<&RankedEntity<T>> {
        locator::select(&self.ranked, self.cursor).ok()
    }

    pub fn next(&mut self) -> Result<&RankedEntity<T>, LocatorError> {
        self.cursor = locator::advance(self.cursor, &self.ranked)?;
        locator::select(&self.ranked, self.cursor)
    }

    pub fn previous(&mut self) -> Result<&RankedEntity<T>, LocatorError> {
        self.cursor = locator::retreat(self.cursor, &self.ranked)?;
        locator::select(&self.ranked, self.cursor)
    }
}
