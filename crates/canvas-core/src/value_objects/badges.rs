//! Artist badges
//!
//! Badges are unlocked by an artist's artwork count and kept as a bit set.
//! Recomputing only ever unions new tiers in, so a badge once earned stays.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BadgeSet: u8 {
        const NOVICE_ARTIST  = 1 << 0;
        const RISING_STAR    = 1 << 1;
        const MASTER_CREATOR = 1 << 2;
        const LEGENDARY      = 1 << 3;
    }
}

/// One rung of the badge ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeTier {
    pub flag: BadgeSet,
    pub name: &'static str,
    pub threshold: i32,
    pub color: &'static str,
}

/// Ladder ordered by threshold
pub const BADGE_TIERS: [BadgeTier; 4] = [
    BadgeTier {
        flag: BadgeSet::NOVICE_ARTIST,
        name: "Novice Artist",
        threshold: 3,
        color: "yellow-400",
    },
    BadgeTier {
        flag: BadgeSet::RISING_STAR,
        name: "Rising Star",
        threshold: 5,
        color: "blue-400",
    },
    BadgeTier {
        flag: BadgeSet::MASTER_CREATOR,
        name: "Master Creator",
        threshold: 10,
        color: "purple-400",
    },
    BadgeTier {
        flag: BadgeSet::LEGENDARY,
        name: "Legendary",
        threshold: 20,
        color: "red-400",
    },
];

impl BadgeSet {
    /// Every tier whose threshold `artwork_count` reaches
    pub fn earned_for(artwork_count: i32) -> Self {
        BADGE_TIERS
            .iter()
            .filter(|tier| artwork_count >= tier.threshold)
            .fold(Self::empty(), |acc, tier| acc | tier.flag)
    }

    /// Tiers held by this set, lowest first
    pub fn tiers(self) -> impl Iterator<Item = &'static BadgeTier> {
        BADGE_TIERS.iter().filter(move |tier| self.contains(tier.flag))
    }

    pub fn names(self) -> Vec<String> {
        self.tiers().map(|tier| tier.name.to_string()).collect()
    }

    /// Rebuild a set from stored badge names, ignoring names no tier uses
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                BADGE_TIERS
                    .iter()
                    .find(|tier| tier.name == name.as_ref())
                    .map(|tier| tier.flag)
            })
            .fold(Self::empty(), |acc, flag| acc | flag)
    }
}

impl Default for BadgeSet {
    fn default() -> Self {
        Self::empty()
    }
}
