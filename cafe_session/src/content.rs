use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Number of curiosities hidden in the exploration location.
pub const CURIOSITY_COUNT: usize = 7;

/// Drinks offered on the cafe menu, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrinkId {
    AquariusAmericano,
    SeoulMatcha,
    PalestinianMint,
    WeekndEspresso,
    LeReveCappuccino,
    CosmicColdBrew,
}

impl DrinkId {
    pub const ALL: [DrinkId; 6] = [
        DrinkId::AquariusAmericano,
        DrinkId::SeoulMatcha,
        DrinkId::PalestinianMint,
        DrinkId::WeekndEspresso,
        DrinkId::LeReveCappuccino,
        DrinkId::CosmicColdBrew,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            DrinkId::AquariusAmericano => "aquarius-americano",
            DrinkId::SeoulMatcha => "seoul-matcha",
            DrinkId::PalestinianMint => "palestinian-mint",
            DrinkId::WeekndEspresso => "weeknd-espresso",
            DrinkId::LeReveCappuccino => "le-reve-cappuccino",
            DrinkId::CosmicColdBrew => "cosmic-cold-brew",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DrinkId::AquariusAmericano => "The Aquarius Americano",
            DrinkId::SeoulMatcha => "Seoul Matcha Latte",
            DrinkId::PalestinianMint => "Palestinian Mint Tea",
            DrinkId::WeekndEspresso => "The Weeknd's Espresso",
            DrinkId::LeReveCappuccino => "Le Reve Cappuccino",
            DrinkId::CosmicColdBrew => "Cosmic Cold Brew",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DrinkId::AquariusAmericano => "Bold, innovative, intellectual",
            DrinkId::SeoulMatcha => "Smooth, balanced, culturally rich",
            DrinkId::PalestinianMint => "Refreshing, meaningful, rooted",
            DrinkId::WeekndEspresso => "Smooth, deep, unforgettable",
            DrinkId::LeReveCappuccino => "Elegant, dreamy, French-inspired",
            DrinkId::CosmicColdBrew => "Mystical, smooth, enlightening",
        }
    }

    /// Position in the menu grid (declaration order).
    pub fn menu_index(&self) -> usize {
        DrinkId::ALL
            .iter()
            .position(|drink| drink == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for DrinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DrinkId {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        DrinkId::ALL
            .into_iter()
            .find(|drink| drink.slug() == needle)
            .ok_or_else(|| SessionError::UnknownDrink(value.to_string()))
    }
}

/// Optional discoverable items scattered around the exploration location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CuriosityId {
    EvilEye,
    Piano,
    Flag,
    Plant,
    Espresso,
    Moon,
    Books,
}

impl CuriosityId {
    pub const ALL: [CuriosityId; CURIOSITY_COUNT] = [
        CuriosityId::EvilEye,
        CuriosityId::Piano,
        CuriosityId::Flag,
        CuriosityId::Plant,
        CuriosityId::Espresso,
        CuriosityId::Moon,
        CuriosityId::Books,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            CuriosityId::EvilEye => "evil-eye",
            CuriosityId::Piano => "piano",
            CuriosityId::Flag => "flag",
            CuriosityId::Plant => "plant",
            CuriosityId::Espresso => "espresso",
            CuriosityId::Moon => "moon",
            CuriosityId::Books => "books",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CuriosityId::EvilEye => "Evil Eye",
            CuriosityId::Piano => "Piano",
            CuriosityId::Flag => "Palestinian Flag",
            CuriosityId::Plant => "Monstera Plant",
            CuriosityId::Espresso => "Espresso Machine",
            CuriosityId::Moon => "Moon",
            CuriosityId::Books => "Bookshelf",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CuriosityId::EvilEye => "Protection and good vibes",
            CuriosityId::Piano => "Music feeds the soul",
            CuriosityId::Flag => "Stand for what matters",
            CuriosityId::Plant => "Growth takes patience",
            CuriosityId::Espresso => "Life is better with coffee",
            CuriosityId::Moon => "Aquarius: The Water Bearer",
            CuriosityId::Books => "Every book is a new world",
        }
    }
}

impl fmt::Display for CuriosityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CuriosityId {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        CuriosityId::ALL
            .into_iter()
            .find(|curiosity| curiosity.slug() == needle)
            .ok_or_else(|| SessionError::UnknownCuriosity(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_parse_back() {
        for drink in DrinkId::ALL {
            assert_eq!(drink.slug().parse::<DrinkId>().expect("drink slug"), drink);
        }
        for curiosity in CuriosityId::ALL {
            assert_eq!(
                curiosity.slug().parse::<CuriosityId>().expect("curiosity slug"),
                curiosity
            );
        }
    }

    #[test]
    fn unknown_slugs_are_rejected() {
        assert!("latte".parse::<DrinkId>().is_err());
        assert!("teapot".parse::<CuriosityId>().is_err());
    }

    #[test]
    fn menu_index_follows_declaration_order() {
        assert_eq!(DrinkId::AquariusAmericano.menu_index(), 0);
        assert_eq!(DrinkId::CosmicColdBrew.menu_index(), 5);
    }

    #[test]
    fn serde_uses_kebab_slugs() {
        let json = serde_json::to_string(&CuriosityId::EvilEye).expect("serialize");
        assert_eq!(json, "\"evil-eye\"");
        let drink: DrinkId = serde_json::from_str("\"le-reve-cappuccino\"").expect("deserialize");
        assert_eq!(drink, DrinkId::LeReveCappuccino);
    }
}
