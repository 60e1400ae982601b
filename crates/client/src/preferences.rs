use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use strum::{AsRefStr, Display, EnumString};

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";

#[derive(EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::En,
        }
    }
}

/// Flat string key-value storage for remembered choices.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore(BTreeMap<String, String>);

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Stores preferences as a JSON object in a single file, rewritten on each change.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

/// Root view state threaded down to every section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
}

impl Preferences {
    pub fn load(store: &impl PreferenceStore) -> Self {
        let mut preferences = Self::default();

        if let Some(theme) = store.get(THEME_KEY).and_then(|v| Theme::from_str(&v).ok()) {
            preferences.theme = theme;
        }
        if let Some(language) = store
            .get(LANGUAGE_KEY)
            .and_then(|v| Language::from_str(&v).ok())
        {
            preferences.language = language;
        }

        preferences
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn toggle_theme(&mut self, store: &mut impl PreferenceStore) {
        self.theme = self.theme.toggled();
        persist(store, THEME_KEY, self.theme.as_ref());
    }

    pub fn toggle_language(&mut self, store: &mut impl PreferenceStore) {
        self.language = self.language.toggled();
        persist(store, LANGUAGE_KEY, self.language.as_ref());
    }
}

fn persist(store: &mut impl PreferenceStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        tracing::warn!(key, value, error = %err, "failed to persist preference");
    }
}
