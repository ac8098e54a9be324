//! Card type descriptors.
//!
//! A `CardType` describes a *kind* of card ("Wheat" at face value 1), not
//! a physical copy. Every copy a holding contains refers to the same
//! `CardTypeId`; counting and equality are by id only.
//!
//! `CardSpec` is the catalog entry a `CardType` is registered from. Its
//! JSON shape follows the deck configuration used by the orchestrator,
//! where `count` (the number of copies in the game) doubles as the
//! per-holder set cap.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Identifier issued by `CardRegistry` for a registered card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardTypeId(pub u32);

impl CardTypeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CardType({})", self.0)
    }
}

/// Calamity severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalamityKind {
    Minor,
    Major,
}

impl CalamityKind {
    /// Lowercase name, used as the primary resolution sort key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CalamityKind::Minor => "minor",
            CalamityKind::Major => "major",
        }
    }
}

impl std::fmt::Display for CalamityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered card type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardType {
    pub id: CardTypeId,

    /// Unique name.
    pub name: String,

    /// Face value. Calamities carry their severity here.
    pub face_value: i64,

    /// Copies a single holder can usefully collect.
    pub max_count: u32,

    /// `None` for commodities.
    pub calamity: Option<CalamityKind>,

    /// May be handed over in a trade.
    pub tradeable: bool,

    /// Listed in the owner's offer.
    pub offerable: bool,

    /// Belongs to the additional commodity set of large games.
    pub additional_set: bool,

    /// Last holder a calamity of this type moved to in a trade.
    pub last_owner: Option<PlayerId>,
}

impl CardType {
    pub(crate) fn from_spec(id: CardTypeId, spec: CardSpec) -> Self {
        Self {
            id,
            name: spec.name,
            face_value: spec.value,
            max_count: spec.max_count,
            calamity: spec.calamity,
            tradeable: spec.tradeable,
            offerable: spec.offerable,
            additional_set: spec.additional_set,
            last_owner: None,
        }
    }

    #[must_use]
    pub fn is_calamity(&self) -> bool {
        self.calamity.is_some()
    }

    #[must_use]
    pub fn is_commodity(&self) -> bool {
        self.calamity.is_none()
    }

    #[must_use]
    pub fn is_major_calamity(&self) -> bool {
        self.calamity == Some(CalamityKind::Major)
    }

    #[must_use]
    pub fn is_minor_calamity(&self) -> bool {
        self.calamity == Some(CalamityKind::Minor)
    }

    /// Commodity with a positive face value; the only kind that counts
    /// toward a holding's total value.
    #[must_use]
    pub fn is_valuable(&self) -> bool {
        self.is_commodity() && self.face_value > 0
    }

    /// Commodity usable as balancing filler (face value not negative).
    #[must_use]
    pub fn is_filler(&self) -> bool {
        self.is_commodity() && self.face_value >= 0
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.face_value)
    }
}

fn default_true() -> bool {
    true
}

/// Catalog entry for registering a card type.
///
/// ```
/// use empire_trade::cards::{CardSpec, CalamityKind};
///
/// let wheat = CardSpec::commodity("Wheat", 1, 8);
/// let flood = CardSpec::major_calamity("Flood", 3).untradeable();
///
/// assert_eq!(flood.calamity, Some(CalamityKind::Major));
/// assert!(!flood.tradeable);
/// assert!(wheat.offerable);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardSpec {
    pub name: String,
    pub value: i64,
    #[serde(rename = "count")]
    pub max_count: u32,
    #[serde(default)]
    pub calamity: Option<CalamityKind>,
    #[serde(default = "default_true")]
    pub tradeable: bool,
    #[serde(default = "default_true")]
    pub offerable: bool,
    #[serde(default)]
    pub additional_set: bool,
}

impl CardSpec {
    /// A tradeable, offerable commodity.
    pub fn commodity(name: impl Into<String>, value: i64, max_count: u32) -> Self {
        Self {
            name: name.into(),
            value,
            max_count,
            calamity: None,
            tradeable: true,
            offerable: true,
            additional_set: false,
        }
    }

    /// A single-copy calamity of the given severity.
    ///
    /// Calamities are tradeable but never offered.
    pub fn calamity(name: impl Into<String>, severity: i64, kind: CalamityKind) -> Self {
        Self {
            name: name.into(),
            value: severity,
            max_count: 1,
            calamity: Some(kind),
            tradeable: true,
            offerable: false,
            additional_set: false,
        }
    }

    pub fn major_calamity(name: impl Into<String>, severity: i64) -> Self {
        Self::calamity(name, severity, CalamityKind::Major)
    }

    pub fn minor_calamity(name: impl Into<String>, severity: i64) -> Self {
        Self::calamity(name, severity, CalamityKind::Minor)
    }

    #[must_use]
    pub fn untradeable(mut self) -> Self {
        self.tradeable = false;
        self
    }

    #[must_use]
    pub fn unofferable(mut self) -> Self {
        self.offerable = false;
        self
    }

    #[must_use]
    pub fn additional_set(mut self) -> Self {
        self.additional_set = true;
        self
    }
}
