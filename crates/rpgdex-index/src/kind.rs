//! Collection types and their backing files.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// One of the known collection types.
///
/// The declaration order is the processing order of an index build, which
/// fixes the order of entries inside every name-index bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionKind {
    Actor,
    Class,
    Skill,
    Item,
    Weapon,
    Armor,
    Enemy,
    Troop,
    State,
    Animation,
    Tileset,
    CommonEvent,
}

impl CollectionKind {
    /// All kinds, in processing order.
    pub const ALL: [CollectionKind; 12] = [
        CollectionKind::Actor,
        CollectionKind::Class,
        CollectionKind::Skill,
        CollectionKind::Item,
        CollectionKind::Weapon,
        CollectionKind::Armor,
        CollectionKind::Enemy,
        CollectionKind::Troop,
        CollectionKind::State,
        CollectionKind::Animation,
        CollectionKind::Tileset,
        CollectionKind::CommonEvent,
    ];

    /// Canonical type name.
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Actor => "actor",
            CollectionKind::Class => "class",
            CollectionKind::Skill => "skill",
            CollectionKind::Item => "item",
            CollectionKind::Weapon => "weapon",
            CollectionKind::Armor => "armor",
            CollectionKind::Enemy => "enemy",
            CollectionKind::Troop => "troop",
            CollectionKind::State => "state",
            CollectionKind::Animation => "animation",
            CollectionKind::Tileset => "tileset",
            CollectionKind::CommonEvent => "commonEvent",
        }
    }

    /// File name of the collection inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            CollectionKind::Actor => "Actors.json",
            CollectionKind::Class => "Classes.json",
            CollectionKind::Skill => "Skills.json",
            CollectionKind::Item => "Items.json",
            CollectionKind::Weapon => "Weapons.json",
            CollectionKind::Armor => "Armors.json",
            CollectionKind::Enemy => "Enemies.json",
            CollectionKind::Troop => "Troops.json",
            CollectionKind::State => "States.json",
            CollectionKind::Animation => "Animations.json",
            CollectionKind::Tileset => "Tilesets.json",
            CollectionKind::CommonEvent => "CommonEvents.json",
        }
    }

    /// Human-facing plural label.
    pub fn label(self) -> &'static str {
        match self {
            CollectionKind::Actor => "Actors",
            CollectionKind::Class => "Classes",
            CollectionKind::Skill => "Skills",
            CollectionKind::Item => "Items",
            CollectionKind::Weapon => "Weapons",
            CollectionKind::Armor => "Armors",
            CollectionKind::Enemy => "Enemies",
            CollectionKind::Troop => "Troops",
            CollectionKind::State => "States",
            CollectionKind::Animation => "Animations",
            CollectionKind::Tileset => "Tilesets",
            CollectionKind::CommonEvent => "Common Events",
        }
    }

    /// Parse a canonical type name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl FromStr for CollectionKind {
    type Err = rpgdex_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| rpgdex_common::Error::UnsupportedKind(s.to_string()))
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CollectionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
