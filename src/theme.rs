// Light/dark theme setting with change notification

use crate::storage::KeyValueStore;
use eyre::{Context, Result, eyre};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Storage key holding the theme name
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(eyre!("Unknown theme: {:?}", other)),
        }
    }
}

/// Handle returned by [`ThemeStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Theme)>;

/// Holds the current theme, persists it, and tells subscribers when it flips
pub struct ThemeStore<S: KeyValueStore> {
    theme: Theme,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Read the stored theme; absent or unrecognized values fall back to light
    pub fn open(storage: S) -> Result<Self> {
        let theme = match storage.get(THEME_KEY)? {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e: eyre::Report| {
                warn!(value = %raw, error = %e, "Unrecognized stored theme, using default");
                Theme::default()
            }),
        };
        info!(%theme, "Loaded theme");

        Ok(Self {
            theme,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Flip light/dark, persist, then notify subscribers
    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.storage
            .set(THEME_KEY, next.as_str())
            .context("Failed to persist theme")?;
        self.theme = next;

        debug!(theme = %next, listeners = self.listeners.len(), "Theme toggled");
        for (_, listener) in self.listeners.iter_mut() {
            listener(next);
        }

        Ok(next)
    }

    /// Register a callback invoked with the new theme after every toggle
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(Theme) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("Dark".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn test_defaults_to_light_when_absent() {
        let store = ThemeStore::open(MemoryStorage::new()).unwrap();
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_defaults_to_light_when_unrecognized() {
        let store = ThemeStore::open(MemoryStorage::new().with(THEME_KEY, "solarized")).unwrap();
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_loads_stored_theme() {
        let store = ThemeStore::open(MemoryStorage::new().with(THEME_KEY, "dark")).unwrap();
        assert_eq!(store.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let mut store = ThemeStore::open(MemoryStorage::new()).unwrap();

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.current(), Theme::Dark);
        assert_eq!(store.storage().get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reopened = ThemeStore::open(store.into_storage()).unwrap();
        assert_eq!(reopened.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        for start in [Theme::Light, Theme::Dark] {
            let mut store = ThemeStore::open(MemoryStorage::new().with(THEME_KEY, start.as_str())).unwrap();
            store.toggle().unwrap();
            store.toggle().unwrap();
            assert_eq!(store.current(), start);
            assert_eq!(store.storage().get(THEME_KEY).unwrap().as_deref(), Some(start.as_str()));
        }
    }

    #[test]
    fn test_subscribers_notified() {
        let mut store = ThemeStore::open(MemoryStorage::new()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        store.subscribe(move |theme| sink.borrow_mut().push(theme));

        store.toggle().unwrap();
        store.toggle().unwrap();
        assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Light]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = ThemeStore::open(MemoryStorage::new()).unwrap();
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.toggle().unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.toggle().unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_opening_does_not_write() {
        let store = ThemeStore::open(MemoryStorage::new()).unwrap();
        assert_eq!(store.storage().get(THEME_KEY).unwrap(), None);
    }
}
