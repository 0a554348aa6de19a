//! Serving-scale view over a converted recipe.
//!
//! Scaling is display-only: the recipe itself is never mutated.

use crate::recipe::{Amount, Ingredient, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServingScale {
    original: u32,
    current: u32,
}

impl ServingScale {
    #[must_use]
    pub fn new(original: u32) -> Self {
        let original = original.max(1);
        Self {
            original,
            current: original,
        }
    }

    #[must_use]
    pub fn original(&self) -> u32 {
        self.original
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Set the target serving count; values below one are clamped to one.
    pub fn set(&mut self, servings: i64) {
        self.current = u32::try_from(servings.max(1)).unwrap_or(u32::MAX);
    }

    pub fn increment(&mut self) {
        self.current = self.current.saturating_add(1);
    }

    pub fn decrement(&mut self) {
        self.current = self.current.saturating_sub(1).max(1);
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.current) / f64::from(self.original)
    }

    /// Scale a single quantity.
    ///
    /// Free text and zero are returned unchanged. Whole results are kept exact, other
    /// results are rounded to one decimal place.
    #[must_use]
    pub fn scaled_amount(&self, amount: &Amount) -> Amount {
        if self.current == self.original {
            return amount.clone();
        }
        let Some(value) = amount.as_number() else {
            return amount.clone();
        };
        if value == 0.0 {
            return amount.clone();
        }

        let scaled = value * self.ratio();
        if scaled.fract() == 0.0 {
            Amount::Number(scaled)
        } else {
            Amount::Number((scaled * 10.0).round() / 10.0)
        }
    }

    /// Ingredients with scaled amounts, in recipe order.
    #[must_use]
    pub fn ingredients(&self, recipe: &Recipe) -> Vec<Ingredient> {
        recipe
            .ingredients
            .iter()
            .map(|ing| Ingredient {
                amount: ing.amount.as_ref().map(|a| self.scaled_amount(a)),
                ..ing.clone()
            })
            .collect()
    }

    /// A copy of `recipe` at the current serving count.
    #[must_use]
    pub fn scaled_recipe(&self, recipe: &Recipe) -> Recipe {
        Recipe {
            servings: self.current,
            ingredients: self.ingredients(recipe),
            ..recipe.clone()
        }
    }
}
