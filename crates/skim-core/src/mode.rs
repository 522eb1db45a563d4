//! Transport mode tags for links and transit routes.
//!
//! Road links carry a [`ModeSet`] of the modes allowed on them; transit
//! routes carry a single [`TransportMode`] which the skim driver's
//! train-detection predicate inspects.

use std::str::FromStr;

use crate::CoreError;

/// The means of travel a link admits or a transit route operates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum TransportMode {
    /// Private vehicle.
    Car = 0,
    /// On foot.
    Walk = 1,
    /// Bicycle.
    Bike = 2,
    /// Scheduled bus service.
    Bus = 3,
    /// Heavy or regional rail.
    Rail = 4,
    /// Tram / light rail.
    Tram = 5,
    /// Metro / underground.
    Subway = 6,
    /// Ferry service.
    Ferry = 7,
}

impl TransportMode {
    pub const ALL: [TransportMode; 8] = [
        TransportMode::Car,
        TransportMode::Walk,
        TransportMode::Bike,
        TransportMode::Bus,
        TransportMode::Rail,
        TransportMode::Tram,
        TransportMode::Subway,
        TransportMode::Ferry,
    ];

    /// `true` for scheduled public-transport modes.
    #[inline]
    pub fn is_transit(self) -> bool {
        matches!(
            self,
            TransportMode::Bus
                | TransportMode::Rail
                | TransportMode::Tram
                | TransportMode::Subway
                | TransportMode::Ferry
        )
    }

    /// Lower-case label, as used in network and schedule files.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Car    => "car",
            TransportMode::Walk   => "walk",
            TransportMode::Bike   => "bike",
            TransportMode::Bus    => "bus",
            TransportMode::Rail   => "rail",
            TransportMode::Tram   => "tram",
            TransportMode::Subway => "subway",
            TransportMode::Ferry  => "ferry",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = CoreError;

    /// Case-insensitive parse of the labels produced by [`as_str`](Self::as_str).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| CoreError::Parse(format!("unknown transport mode '{s}'")))
    }
}

// ── ModeSet ───────────────────────────────────────────────────────────────────

/// Compact set of [`TransportMode`]s, one bit per mode.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeSet(u16);

impl ModeSet {
    pub const EMPTY: ModeSet = ModeSet(0);

    #[inline]
    pub fn single(mode: TransportMode) -> Self {
        ModeSet(1 << mode as u16)
    }

    #[inline]
    pub fn with(self, mode: TransportMode) -> Self {
        ModeSet(self.0 | 1 << mode as u16)
    }

    #[inline]
    pub fn insert(&mut self, mode: TransportMode) {
        self.0 |= 1 << mode as u16;
    }

    #[inline]
    pub fn contains(self, mode: TransportMode) -> bool {
        self.0 & (1 << mode as u16) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Modes in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = TransportMode> {
        TransportMode::ALL.into_iter().filter(move |&m| self.contains(m))
    }

    /// Parse a comma-separated list such as `"car,bus,rail"`.
    pub fn parse_list(s: &str) -> Result<Self, CoreError> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .try_fold(ModeSet::EMPTY, |set, part| Ok(set.with(part.parse()?)))
    }
}

impl FromIterator<TransportMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = TransportMode>>(iter: I) -> Self {
        iter.into_iter().fold(ModeSet::EMPTY, ModeSet::with)
    }
}
