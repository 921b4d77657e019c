//! Theme property store.
//!
//! A [`Theme`] maps slash-separated keys (`/window/header/height`) to
//! [`ThemeValue`]s. Widgets look properties up with a fallback, so a theme
//! only needs to carry the keys it wants to change. [`Theme::default`] holds
//! the stock look.

use std::collections::HashMap;

use crate::geometry::Color;

/// A single theme property.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeValue {
    Int(i32),
    Float(f32),
    Color(Color),
    Str(String),
}

impl From<i32> for ThemeValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for ThemeValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Color> for ThemeValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<&str> for ThemeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ThemeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Key → value property store with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    properties: HashMap<String, ThemeValue>,
}

impl Theme {
    /// A theme with no properties; every lookup falls back.
    pub fn empty() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    /// Look a property up.
    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.properties.get(key)
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ThemeValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Set a property only if it is absent; returns the stored value.
    pub fn set_default(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ThemeValue>,
    ) -> &ThemeValue {
        self.properties.entry(key.into()).or_insert_with(|| value.into())
    }

    /// Overwrite this theme's properties with every property of `other`.
    pub fn update(&mut self, other: &Theme) {
        for (key, value) in &other.properties {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    /// Integer property. Floats are truncated.
    pub fn get_int_or(&self, key: &str, default: i32) -> i32 {
        match self.get(key) {
            Some(ThemeValue::Int(v)) => *v,
            Some(ThemeValue::Float(v)) => *v as i32,
            _ => default,
        }
    }

    /// Float property. Integers are widened.
    pub fn get_float_or(&self, key: &str, default: f32) -> f32 {
        match self.get(key) {
            Some(ThemeValue::Float(v)) => *v,
            Some(ThemeValue::Int(v)) => *v as f32,
            _ => default,
        }
    }

    /// Colour property.
    pub fn get_color_or(&self, key: &str, default: Color) -> Color {
        match self.get(key) {
            Some(ThemeValue::Color(c)) => *c,
            _ => default,
        }
    }

    /// String property.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.get(key) {
            Some(ThemeValue::Str(s)) => s.as_str(),
            _ => default,
        }
    }

    /// Number of properties set.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Default for Theme {
    fn default() -> Self {
        let mut theme = Self::empty();

        theme.set("/text-size", 16);
        theme.set("/text-color", Color::gray8(255, 160));
        theme.set("/text-shadow", Color::gray8(0, 160));
        theme.set("/disabled-text-color", Color::gray8(255, 80));
        theme.set("/shadow", Color::gray8(0, 128));
        theme.set("/transparent", Color::gray8(0, 0));
        theme.set("/icon-color", Color::gray8(255, 160));

        theme.set("/border/dark", Color::gray8(29, 255));
        theme.set("/border/light", Color::gray8(92, 255));
        theme.set("/border/medium", Color::gray8(35, 255));

        theme.set("/button/text-size", 20);
        theme.set("/button/corner-radius", 0);
        theme.set("/button/focused/grad-top", Color::gray8(64, 255));
        theme.set("/button/focused/grad-bot", Color::gray8(48, 255));
        theme.set("/button/unfocused/grad-top", Color::gray8(74, 255));
        theme.set("/button/unfocused/grad-bot", Color::gray8(58, 255));
        theme.set("/button/pushed/grad-top", Color::gray8(41, 255));
        theme.set("/button/pushed/grad-bot", Color::gray8(29, 255));

        theme.set("/window/unfocused/fill", Color::gray8(43, 230));
        theme.set("/window/unfocused/title", Color::gray8(220, 160));
        theme.set("/window/focused/fill", Color::gray8(45, 230));
        theme.set("/window/focused/title", Color::gray8(255, 190));
        theme.set("/window/corner-radius", 0);
        theme.set("/window/shadow-size", 10);
        theme.set("/window/header/height", 30);
        theme.set("/window/header/grad-top", Color::gray8(74, 255));
        theme.set("/window/header/grad-bot", Color::gray8(58, 255));
        theme.set("/window/header/sep-top", Color::gray8(92, 255));
        theme.set("/window/header/sep-bot", Color::gray8(29, 255));

        theme.set("/popup/fill", Color::gray8(50, 255));
        theme.set("/popup/transparent", Color::gray8(50, 0));

        theme.set("/font/normal", "sans");
        theme.set("/font/bold", "sans-bold");
        theme.set("/font/mono", "mono");
        theme.set("/font/icons", "icons");

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.get_int_or("/window/header/height", 0), 30);
        assert_eq!(theme.get_int_or("/window/shadow-size", 0), 10);
        assert_eq!(
            theme.get_color_or("/popup/fill", Color::BLACK),
            Color::gray8(50, 255)
        );
        assert_eq!(theme.get_str_or("/font/bold", ""), "sans-bold");
    }

    #[test]
    fn test_missing_key_falls_back() {
        let theme = Theme::empty();
        assert_eq!(theme.get_int_or("/nope", 7), 7);
        assert_eq!(theme.get_float_or("/nope", 1.5), 1.5);
        assert!(theme.is_empty());
    }

    #[test]
    fn test_numeric_coercion() {
        let mut theme = Theme::empty();
        theme.set("/a", 2.75f32);
        theme.set("/b", 3);
        assert_eq!(theme.get_int_or("/a", 0), 2);
        assert_eq!(theme.get_float_or("/b", 0.0), 3.0);
    }

    #[test]
    fn test_set_default_keeps_existing() {
        let mut theme = Theme::default();
        let stored = theme.set_default("/text-size", 99).clone();
        assert_eq!(stored, ThemeValue::Int(16));
        theme.set_default("/custom", 5);
        assert_eq!(theme.get_int_or("/custom", 0), 5);
    }

    #[test]
    fn test_update_overrides() {
        let mut theme = Theme::default();
        let mut overrides = Theme::empty();
        overrides.set("/window/header/height", 24);
        theme.update(&overrides);
        assert_eq!(theme.get_int_or("/window/header/height", 0), 24);
        assert_eq!(theme.get_int_or("/text-size", 0), 16);
    }
}
