//! Dishes and the daily menu.
//!
//! A [`Dish`] is immutable once created and owned by the active [`Menu`].
//! The menu is rebuilt once per day: reset to the base set, then the
//! day's generated special is prepended. Menu ids are unique; a prepend
//! that would duplicate an existing id is rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::DishId;

/// A single dish the stall can cook and sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    /// Identity of the dish. Order matching uses this, never the name.
    pub id: DishId,
    /// Display name shown to the player.
    pub name: String,
    /// Emoji icon used in menus and order bubbles.
    pub icon: String,
    /// Price in gold before tips.
    pub base_price: Decimal,
    /// Base preparation time in milliseconds, before kitchen upgrades.
    pub prep_time_ms: u64,
    /// Short flavor text.
    pub description: String,
    /// Whether this is a generated daily special.
    pub special: bool,
}

impl Dish {
    /// Create a regular (non-special) dish.
    pub fn new(
        slug: &str,
        name: &str,
        icon: &str,
        base_price: u32,
        prep_time_ms: u64,
        description: &str,
    ) -> Self {
        Self {
            id: DishId::new(slug),
            name: name.to_owned(),
            icon: icon.to_owned(),
            base_price: Decimal::from(base_price),
            prep_time_ms,
            description: description.to_owned(),
            special: false,
        }
    }

    /// Create a generated special dish with a fresh unique id.
    pub fn special(name: &str, icon: &str, base_price: Decimal, prep_time_ms: u64, description: &str) -> Self {
        Self {
            id: DishId::special(),
            name: name.to_owned(),
            icon: icon.to_owned(),
            base_price,
            prep_time_ms,
            description: description.to_owned(),
            special: true,
        }
    }
}

/// The ordered menu for one day of service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    dishes: Vec<Dish>,
}

impl Menu {
    /// The base menu every day starts from, before the special is added.
    ///
    /// Fish Soup 10g / 2000ms, Tuna Sushi 15g / 3000ms, Catnip Tea
    /// 8g / 1000ms.
    pub fn base() -> Self {
        Self {
            dishes: vec![
                Dish::new("fish_soup", "Fish Soup", "🍲", 10, 2000, "Warm and savory."),
                Dish::new("tuna_sushi", "Tuna Sushi", "🍣", 15, 3000, "Fresh catch!"),
                Dish::new("catnip_tea", "Catnip Tea", "🍵", 8, 1000, "Relaxing brew."),
            ],
        }
    }

    /// Build a menu from an explicit dish list, dropping duplicate ids.
    pub fn from_dishes(dishes: Vec<Dish>) -> Self {
        let mut menu = Self { dishes: Vec::new() };
        for dish in dishes {
            menu.push_unique(dish);
        }
        menu
    }

    /// Prepend the day's special dish.
    ///
    /// Returns `false` (leaving the menu unchanged) if a dish with the
    /// same id is already present.
    pub fn prepend_special(&mut self, dish: Dish) -> bool {
        if self.contains(&dish.id) {
            return false;
        }
        self.dishes.insert(0, dish);
        true
    }

    /// Whether a dish with the given id is on the menu.
    pub fn contains(&self, id: &DishId) -> bool {
        self.dishes.iter().any(|d| &d.id == id)
    }

    /// Look up a dish by id.
    pub fn get(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| &d.id == id)
    }

    /// Dish at a position, used for uniform random order selection.
    pub fn get_index(&self, index: usize) -> Option<&Dish> {
        self.dishes.get(index)
    }

    /// Number of dishes currently on the menu.
    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    /// Whether the menu is empty.
    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Iterate over the dishes in menu order.
    pub fn iter(&self) -> core::slice::Iter<'_, Dish> {
        self.dishes.iter()
    }

    fn push_unique(&mut self, dish: Dish) {
        if !self.contains(&dish.id) {
            self.dishes.push(dish);
        }
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a Dish;
    type IntoIter = core::slice::Iter<'a, Dish>;

    fn into_iter(self) -> Self::IntoIter {
        self.dishes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_menu_has_three_unique_dishes() {
        let menu = Menu::base();
        assert_eq!(menu.len(), 3);
        assert!(menu.contains(&DishId::new("fish_soup")));
        assert!(menu.contains(&DishId::new("tuna_sushi")));
        assert!(menu.contains(&DishId::new("catnip_tea")));
    }

    #[test]
    fn special_is_prepended() {
        let mut menu = Menu::base();
        let special = Dish::special("Traveler's Stew", "🥘", Decimal::from(20), 3000, "Hearty.");
        let id = special.id.clone();
        assert!(menu.prepend_special(special));
        assert_eq!(menu.len(), 4);
        assert_eq!(menu.get_index(0).map(|d| d.id.clone()), Some(id));
    }

    #[test]
    fn duplicate_special_is_rejected() {
        let mut menu = Menu::base();
        let special = Dish::special("Stew", "🥘", Decimal::from(20), 3000, "");
        let dup = special.clone();
        assert!(menu.prepend_special(special));
        assert!(!menu.prepend_special(dup));
        assert_eq!(menu.len(), 4);
    }

    #[test]
    fn two_specials_with_same_name_are_distinct_orders() {
        let a = Dish::special("Stew", "🥘", Decimal::from(20), 3000, "");
        let b = Dish::special("Stew", "🥘", Decimal::from(20), 3000, "");
        assert_ne!(a.id, b.id);
        let mut menu = Menu::base();
        assert!(menu.prepend_special(a));
        assert!(menu.prepend_special(b));
        assert_eq!(menu.len(), 5);
    }

    #[test]
    fn from_dishes_drops_duplicates() {
        let menu = Menu::from_dishes(vec![
            Dish::new("tea", "Tea", "🍵", 5, 500, ""),
            Dish::new("tea", "Tea Again", "🍵", 6, 600, ""),
        ]);
        assert_eq!(menu.len(), 1);
    }
}
