//! Nearest-entity ranking and cursor movement.
//!
//! Everything here is a pure function over a ranked slice, the caller owns the
//! ranked list and the cursor (see [crate::NearestSession]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    entity::Locatable,
    location::{GeoPoint, Meters},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// An entity along with how far it is from the reference point
pub struct RankedEntity<T> {
    pub entity: T,
    /// Where the entity was measured at
    pub location: GeoPoint,
    pub distance: Meters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("cursor {cursor} is out of range for {len} entities")]
    OutOfRange { cursor: usize, len: usize },
    /// Already on the farthest entity
    #[error("no more entities")]
    NoMoreEntities,
    /// Already on the closest entity
    #[error("no closer entity")]
    NoCloserEntity,
}

impl LocatorError {
    /// Whether this is a user-facing notice rather than a caller bug
    pub const fn is_notice(&self) -> bool {
        matches!(self, Self::NoMoreEntities | Self::NoCloserEntity)
    }
}

/// Rank `entities` by great-circle distance from `reference`, closest first.
///
/// Entities without a location are skipped. Equal distances keep their input order.
/// A non-finite reference has no meaningful distances, so nothing is ranked.
pub fn rank<T: Locatable + Clone>(reference: GeoPoint, entities: &[T]) -> Vec<RankedEntity<T>> {
    if !reference.is_finite() {
        return Vec::new();
    }

    let mut ranked = entities
        .iter()
        .filter_map(|entity| {
            entity.location().map(|location| RankedEntity {
                entity: entity.clone(),
                location,
                distance: reference.distance_to(&location),
            })
        })
        .collect::<Vec<_>>();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

pub fn select<T>(
    ranked: &[RankedEntity<T>],
    cursor: usize,
) -> Result<&RankedEntity<T>, LocatorError> {
    ranked.get(cursor).ok_or(LocatorError::OutOfRange {
        cursor,
        len: ranked.len(),
    })
}

/// Move to the next farther entity
pub fn advance<T>(cursor: usize, ranked: &[RankedEntity<T>]) -> Result<usize, LocatorError> {
    cursor
        .checked_add(1)
        .filter(|next| *next < ranked.len())
        .ok_or(LocatorError::NoMoreEntities)
}

/// Move to the next closer entity
pub fn retreat<T>(cursor: usize, ranked: &[RankedEntity<T>]) -> Result<usize, LocatorError> {
    match cursor.checked_sub(1) {
        Some(prev) if prev < ranked.len() => Ok(prev),
        _ => Err(LocatorError::NoCloserEntity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Building;

    const REFERENCE: GeoPoint = GeoPoint::new(53.5232, -113.5263);

    fn building(id: i64, lat: Option<f64>, lng: Option<f64>) -> Building {
        Building {
            id,
            name: format!("Building {id}"),
            floors: None,
            lat,
            lng,
        }
    }

    fn ids(ranked: &[RankedEntity<Building>]) -> Vec<i64> {
        ranked.iter().map(|r| r.entity.id).collect()
    }

    #[test]
    fn test_rank_example() {
        let a = building(1, Some(53.5230), Some(-113.5260));
        let b = building(2, Some(53.5300), Some(-113.5400));

        let ranked = rank(REFERENCE, &[b, a]);

        assert_eq!(ids(&ranked), vec![1, 2]);
        assert!(ranked[0].distance < 50.0);
        assert!(ranked[1].distance > 900.0 && ranked[1].distance < 1500.0);

        let mut cursor = 0;
        assert_eq!(select(&ranked, cursor).unwrap().entity.id, 1);
        cursor = advance(cursor, &ranked).unwrap();
        assert_eq!(select(&ranked, cursor).unwrap().entity.id, 2);
        assert_eq!(advance(cursor, &ranked), Err(LocatorError::NoMoreEntities));
    }

    #[test]
    fn test_rank_sorted() {
        let entities = (0..20)
            .map(|i| {
                let offset = ((i * 7) % 13) as f64 * 0.001;
                building(i, Some(53.52 + offset), Some(-113.52 - offset / 2.0))
            })
            .collect::<Vec<_>>();

        let ranked = rank(REFERENCE, &entities);

        assert_eq!(ranked.len(), entities.len());
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_rank_empty() {
        let ranked = rank::<Building>(REFERENCE, &[]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_skips_missing_location() {
        let entities = [
            building(1, None, Some(-113.52)),
            building(2, Some(53.52), Some(-113.52)),
            building(3, Some(53.52), None),
            building(4, None, None),
        ];

        let ranked = rank(REFERENCE, &entities);

        assert_eq!(ids(&ranked), vec![2]);
    }

    #[test]
    fn test_rank_ties_keep_order() {
        let entities = [
            building(5, Some(53.53), Some(-113.53)),
            building(3, Some(53.53), Some(-113.53)),
            building(9, Some(53.53), Some(-113.53)),
        ];

        let ranked = rank(REFERENCE, &entities);

        assert_eq!(ids(&ranked), vec![5, 3, 9]);
    }

    #[test]
    fn test_select_out_of_range() {
        let ranked = rank(REFERENCE, &[building(1, Some(53.52), Some(-113.52))]);
        assert_eq!(
            select(&ranked, 1),
            Err(LocatorError::OutOfRange { cursor: 1, len: 1 })
        );
        assert!(!LocatorError::OutOfRange { cursor: 1, len: 1 }.is_notice());
    }

    #[test]
    fn test_retreat_at_start() {
        let ranked = rank(
            REFERENCE,
            &[
                building(1, Some(53.52), Some(-113.52)),
                building(2, Some(53.53), Some(-113.52)),
            ],
        );
        assert_eq!(retreat(0, &ranked), Err(LocatorError::NoCloserEntity));
        assert_eq!(retreat(1, &ranked), Ok(0));
        assert!(LocatorError::NoCloserEntity.is_notice());
    }

    #[test]
    fn test_rank_nan_reference() {
        let entities = [
            building(1, Some(53.5230), Some(-113.5260)),
            building(2, Some(53.5300), Some(-113.5400)),
        ];

        assert!(rank(GeoPoint::new(f64::NAN, -113.5), &entities).is_empty());
        assert!(rank(GeoPoint::new(53.5, f64::INFINITY), &entities).is_empty());
    }

    #[test]
    fn test_advance_at_max_cursor() {
        let ranked = rank(REFERENCE, &[building(1, Some(53.52), Some(-113.52))]);
        assert_eq!(
            advance(usize::MAX, &ranked),
            Err(LocatorError::NoMoreEntities)
        );
        assert_eq!(
            advance::<Building>(usize::MAX, &[]),
            Err(LocatorError::NoMoreEntities)
        );
    }

    #[test]
    fn test_moves_on_empty() {
        let ranked: Vec<RankedEntity<Building>> = vec![];
        assert_eq!(advance(0, &ranked), Err(LocatorError::NoMoreEntities));
        assert_eq!(retreat(0, &ranked), Err(LocatorError::NoCloserEntity));
    }
}
