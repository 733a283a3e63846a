//! Real Montreal-area locations for realistic test fixtures.
//!
//! Coordinates are approximate, taken from OpenStreetMap.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Destination sites
// ============================================================================

pub const HEAD_OFFICE: Location = Location::new("Place Ville Marie", 45.5017, -73.5693);

// ============================================================================
// Homes near the Plateau / downtown stop
// ============================================================================

pub const DOWNTOWN_HOMES: &[Location] = &[
    Location::new("McGill University", 45.5048, -73.5772),
    Location::new("Berri-UQAM", 45.5152, -73.5610),
    Location::new("Old Port", 45.5075, -73.5540),
    Location::new("Parc La Fontaine", 45.5271, -73.5697),
    Location::new("Atwater Market", 45.4785, -73.5770),
];

// ============================================================================
// Homes in the north-east
// ============================================================================

pub const NORTH_EAST_HOMES: &[Location] = &[
    Location::new("Olympic Stadium", 45.5580, -73.5519),
    Location::new("Jean-Talon Market", 45.5363, -73.6147),
    Location::new("Botanical Garden", 45.5600, -73.5630),
];

// ============================================================================
// Suburbs (far from every stop)
// ============================================================================

pub const SUBURB_HOMES: &[Location] = &[
    Location::new("Carrefour Laval", 45.5711, -73.7520),
    Location::new("Longueuil Metro", 45.5249, -73.5219),
];

/// Pickup stops used by the fixtures.
pub const STOPS: &[Location] = &[
    Location::new("Peel Station", 45.5009, -73.5750),
    Location::new("Pie-IX Station", 45.5537, -73.5515),
];
