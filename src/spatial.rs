//! Spatial candidate selection around a reference point.
//!
//! All queries skip candidates without a finite location. Invalid arguments
//! (negative or NaN radius, degenerate polygon) produce an empty selection
//! rather than an error: these back interactive filters.

use serde::{Deserialize, Serialize};

use crate::haversine::{distance_meters, is_finite_point};
use crate::polygon::point_in_polygon;
use crate::traits::Candidate;

/// The last spatial query run in an editing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SelectionMode {
    #[default]
    None,
    Radius { meters: f64 },
    TopK { k: usize },
}

/// Candidates within `radius_meters` (inclusive) of the reference point, in pool order.
pub fn by_radius<C: Candidate>(pool: &[C], clat: f64, clng: f64, radius_meters: f64) -> Vec<C::Id> {
    if radius_meters.is_nan() || radius_meters < 0.0 {
        return Vec::new();
    }

    located(pool)
        .filter(|(_, (lat, lng))| distance_meters(clat, clng, *lat, *lng) <= radius_meters)
        .map(|(candidate, _)| candidate.id().clone())
        .collect()
}

/// The `k` candidates nearest the reference point, nearest first.
///
/// Ties keep pool order.
pub fn top_k<C: Candidate>(pool: &[C], clat: f64, clng: f64, k: usize) -> Vec<C::Id> {
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(f64, &C)> = located(pool)
        .map(|(candidate, (lat, lng))| (distance_meters(clat, clng, lat, lng), candidate))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    ranked
        .into_iter()
        .take(k)
        .map(|(_, candidate)| candidate.id().clone())
        .collect()
}

/// Candidates inside `polygon` (even-odd rule), in pool order.
pub fn by_polygon<C: Candidate>(pool: &[C], polygon: &[(f64, f64)]) -> Vec<C::Id> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    located(pool)
        .filter(|(_, (lat, lng))| point_in_polygon(*lat, *lng, polygon))
        .map(|(candidate, _)| candidate.id().clone())
        .collect()
}

/// Runs `mode` over `pool`. `SelectionMode::None` selects the whole pool.
pub fn apply_mode<C: Candidate>(
    pool: &[C],
    clat: f64,
    clng: f64,
    mode: SelectionMode,
) -> Vec<C::Id> {
    match mode {
        SelectionMode::None => pool.iter().map(|candidate| candidate.id().clone()).collect(),
        SelectionMode::Radius { meters } => by_radius(pool, clat, clng, meters),
        SelectionMode::TopK { k } => top_k(pool, clat, clng, k),
    }
}

fn located<C: Candidate>(pool: &[C]) -> impl Iterator<Item = (&C, (f64, f64))> {
    pool.iter().filter_map(|candidate| {
        candidate
            .location()
            .filter(|point| is_finite_point(*point))
            .map(|point| (candidate, point))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Pin {
        id: &'static str,
        location: Option<(f64, f64)>,
    }

    impl Candidate for Pin {
        type Id = &'static str;

        fn id(&self) -> &Self::Id {
            &self.id
        }

        fn location(&self) -> Option<(f64, f64)> {
            self.location
        }
    }

    fn pin(id: &'static str, lat: f64, lng: f64) -> Pin {
        Pin {
            id,
            location: Some((lat, lng)),
        }
    }

    // Roughly 111_195 m per degree of latitude.
    const CENTER: (f64, f64) = (45.50, -73.60);

    fn north_of_center(meters: f64) -> f64 {
        CENTER.0 + meters / 111_195.0
    }

    fn pool() -> Vec<Pin> {
        vec![
            pin("far", north_of_center(400.0), CENTER.1),
            pin("near", north_of_center(50.0), CENTER.1),
            Pin { id: "nowhere", location: None },
            pin("mid", north_of_center(150.0), CENTER.1),
            pin("broken", f64::NAN, CENTER.1),
        ]
    }

    #[test]
    fn test_radius_inclusive_and_skips_unlocated() {
        let selected = by_radius(&pool(), CENTER.0, CENTER.1, 200.0);
        assert_eq!(selected, vec!["near", "mid"]);
    }

    #[test]
    fn test_radius_zero_selects_exact_coordinate() {
        let pool = vec![
            pin("here", CENTER.0, CENTER.1),
            pin("near", north_of_center(1.0), CENTER.1),
        ];
        assert_eq!(by_radius(&pool, CENTER.0, CENTER.1, 0.0), vec!["here"]);
    }

    #[test]
    fn test_negative_or_nan_radius_selects_nothing() {
        assert!(by_radius(&pool(), CENTER.0, CENTER.1, -1.0).is_empty());
        assert!(by_radius(&pool(), CENTER.0, CENTER.1, f64::NAN).is_empty());
    }

    #[test]
    fn test_top_k_orders_by_distance() {
        assert_eq!(top_k(&pool(), CENTER.0, CENTER.1, 1), vec!["near"]);
        assert_eq!(top_k(&pool(), CENTER.0, CENTER.1, 2), vec!["near", "mid"]);
    }

    #[test]
    fn test_top_k_bounds() {
        assert!(top_k(&pool(), CENTER.0, CENTER.1, 0).is_empty());
        assert_eq!(top_k(&pool(), CENTER.0, CENTER.1, 50), vec!["near", "mid", "far"]);
    }

    #[test]
    fn test_top_k_ties_keep_pool_order() {
        let pool = vec![
            pin("b", north_of_center(100.0), CENTER.1),
            pin("a", north_of_center(100.0), CENTER.1),
            pin("c", north_of_center(10.0), CENTER.1),
        ];
        assert_eq!(top_k(&pool, CENTER.0, CENTER.1, 3), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_polygon_selection() {
        let square = [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)];
        let pool = vec![pin("inside", 1.0, 1.0), pin("outside", 10.0, 10.0)];
        assert_eq!(by_polygon(&pool, &square), vec!["inside"]);
        assert!(by_polygon(&pool, &square[..2]).is_empty());
    }

    #[test]
    fn test_apply_mode() {
        let pool = pool();
        assert_eq!(
            apply_mode(&pool, CENTER.0, CENTER.1, SelectionMode::None),
            vec!["far", "near", "nowhere", "mid", "broken"]
        );
        assert_eq!(
            apply_mode(&pool, CENTER.0, CENTER.1, SelectionMode::Radius { meters: 100.0 }),
            vec!["near"]
        );
        assert_eq!(
            apply_mode(&pool, CENTER.0, CENTER.1, SelectionMode::TopK { k: 1 }),
            vec!["near"]
        );
    }
}
