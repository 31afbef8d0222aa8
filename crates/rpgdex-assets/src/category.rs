//! Asset categories, consumer kinds, and the directory layout they map to.

use std::fmt;

use serde::{Serialize, Serializer};

/// Raster image extensions, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Compressed audio extensions, lowercase.
pub const AUDIO_EXTENSIONS: &[&str] = &["ogg", "m4a", "mp3"];

/// Category of a binary asset, decided by the directory it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetCategory {
    Character,
    Face,
    Enemy,
    Tileset,
    Battleback,
    SvActor,
    Picture,
    Audio,
    Unknown,
}

impl AssetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Character => "character",
            AssetCategory::Face => "face",
            AssetCategory::Enemy => "enemy",
            AssetCategory::Tileset => "tileset",
            AssetCategory::Battleback => "battleback",
            AssetCategory::SvActor => "sv_actor",
            AssetCategory::Picture => "picture",
            AssetCategory::Audio => "audio",
            AssetCategory::Unknown => "unknown",
        }
    }

    /// Parse a category name; anything unrecognized is `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "character" => AssetCategory::Character,
            "face" => AssetCategory::Face,
            "enemy" => AssetCategory::Enemy,
            "tileset" => AssetCategory::Tileset,
            "battleback" => AssetCategory::Battleback,
            "sv_actor" => AssetCategory::SvActor,
            "picture" => AssetCategory::Picture,
            "audio" => AssetCategory::Audio,
            _ => AssetCategory::Unknown,
        }
    }

    /// Extensions accepted for files of this category.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AssetCategory::Audio => AUDIO_EXTENSIONS,
            AssetCategory::Unknown => &[],
            _ => IMAGE_EXTENSIONS,
        }
    }

    /// Whether `file_name` has one of this category's extensions.
    pub fn accepts(self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.extensions()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AssetCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Directories scanned for assets, relative to the project root, in scan order.
pub const CATEGORY_DIRS: &[(&str, AssetCategory)] = &[
    ("img/characters", AssetCategory::Character),
    ("img/faces", AssetCategory::Face),
    ("img/enemies", AssetCategory::Enemy),
    ("img/tilesets", AssetCategory::Tileset),
    ("img/battlebacks1", AssetCategory::Battleback),
    ("img/battlebacks2", AssetCategory::Battleback),
    ("img/sv_actors", AssetCategory::SvActor),
    ("img/pictures", AssetCategory::Picture),
    ("audio/bgm", AssetCategory::Audio),
    ("audio/bgs", AssetCategory::Audio),
    ("audio/me", AssetCategory::Audio),
    ("audio/se", AssetCategory::Audio),
];

/// The kind of record that consumes an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConsumerKind {
    Actor,
    Enemy,
    Map,
    Troop,
    Item,
    Skill,
}

impl ConsumerKind {
    pub const ALL: [ConsumerKind; 6] = [
        ConsumerKind::Actor,
        ConsumerKind::Enemy,
        ConsumerKind::Map,
        ConsumerKind::Troop,
        ConsumerKind::Item,
        ConsumerKind::Skill,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsumerKind::Actor => "actor",
            ConsumerKind::Enemy => "enemy",
            ConsumerKind::Map => "map",
            ConsumerKind::Troop => "troop",
            ConsumerKind::Item => "item",
            ConsumerKind::Skill => "skill",
        }
    }

    /// Capitalized label used in reports, e.g. `Actor`.
    pub fn label(self) -> &'static str {
        match self {
            ConsumerKind::Actor => "Actor",
            ConsumerKind::Enemy => "Enemy",
            ConsumerKind::Map => "Map",
            ConsumerKind::Troop => "Troop",
            ConsumerKind::Item => "Item",
            ConsumerKind::Skill => "Skill",
        }
    }
}

impl fmt::Display for ConsumerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConsumerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_is_case_insensitive() {
        assert!(AssetCategory::Character.accepts("Actor1.PNG"));
        assert!(AssetCategory::Picture.accepts("title.jpeg"));
        assert!(!AssetCategory::Face.accepts("Actor1.ogg"));
        assert!(AssetCategory::Audio.accepts("Battle1.M4A"));
        assert!(!AssetCategory::Audio.accepts("Battle1"));
        assert!(!AssetCategory::Unknown.accepts("x.png"));
    }

    #[test]
    fn test_parse_falls_back_to_unknown() {
        assert_eq!(AssetCategory::parse("sv_actor"), AssetCategory::SvActor);
        assert_eq!(AssetCategory::parse("parallax"), AssetCategory::Unknown);
    }
}
