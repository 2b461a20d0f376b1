//! The fixed room catalog of the property.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier of a bookable room. The catalog is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomId {
    C1,
    C2,
    C3,
    C4,
    D1,
    D2,
    G1,
    G2,
}

impl RoomId {
    /// Every room in catalog order.
    pub const ALL: [RoomId; 8] = [
        RoomId::C1,
        RoomId::C2,
        RoomId::C3,
        RoomId::C4,
        RoomId::D1,
        RoomId::D2,
        RoomId::G1,
        RoomId::G2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomId::C1 => "C1",
            RoomId::C2 => "C2",
            RoomId::C3 => "C3",
            RoomId::C4 => "C4",
            RoomId::D1 => "D1",
            RoomId::D2 => "D2",
            RoomId::G1 => "G1",
            RoomId::G2 => "G2",
        }
    }

    /// Room category letter (`C`, `D` or `G`).
    pub fn category(&self) -> char {
        match self {
            RoomId::C1 | RoomId::C2 | RoomId::C3 | RoomId::C4 => 'C',
            RoomId::D1 | RoomId::D2 => 'D',
            RoomId::G1 | RoomId::G2 => 'G',
        }
    }

    /// Long label such as `C1 - Category C Room 1`.
    pub fn label(&self) -> String {
        let code = self.as_str();
        format!(
            "{code} - Category {} Room {}",
            self.category(),
            &code[1..]
        )
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a room of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoom(pub String);

impl fmt::Display for UnknownRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown room `{}`", self.0)
    }
}

impl std::error::Error for UnknownRoom {}

impl FromStr for RoomId {
    type Err = UnknownRoom;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        RoomId::ALL
            .into_iter()
            .find(|room| room.as_str() == normalized)
            .ok_or_else(|| UnknownRoom(value.to_string()))
    }
}

/// Room selector used by occupancy queries: a single room or the whole property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoomFilter {
    #[default]
    All,
    Room(RoomId),
}

impl RoomFilter {
    /// Whether a stay occupying `rooms` is visible through this filter.
    pub fn admits(&self, rooms: &[RoomId]) -> bool {
        match self {
            RoomFilter::All => true,
            RoomFilter::Room(room) => rooms.contains(room),
        }
    }
}

impl fmt::Display for RoomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomFilter::All => f.write_str("all"),
            RoomFilter::Room(room) => write!(f, "{room}"),
        }
    }
}

impl FromStr for RoomFilter {
    type Err = UnknownRoom;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(RoomFilter::All);
        }
        value.parse().map(RoomFilter::Room)
    }
}
