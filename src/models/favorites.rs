use serde::{Deserialize, Serialize};

/// Favorite channels, keyed by display name in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    names: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns false if the name was already present
    pub fn add(&mut self, name: &str) -> bool {
        if self.is_favorite(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Returns false if the name was not present
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    /// Flip membership; returns the new state
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.remove(name) {
            false
        } else {
            self.add(name)
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_toggle() {
        let mut favorites = Favorites::new();

        assert!(favorites.add("News"));
        assert!(!favorites.add("News"));
        assert!(favorites.is_favorite("News"));

        assert!(!favorites.toggle("News"));
        assert!(!favorites.is_favorite("News"));
        assert!(favorites.toggle("News"));

        assert!(favorites.remove("News"));
        assert!(!favorites.remove("News"));
        assert!(favorites.names().is_empty());
    }

    #[test]
    fn test_persists_as_plain_list() {
        let mut favorites = Favorites::new();
        favorites.add("A");
        favorites.add("B");

        let json = serde_json::to_string(&favorites).unwrap();
        assert_eq!(json, r#"["A","B"]"#);

        let back: Favorites = serde_json::from_str(&json).unwrap();
        assert_eq!(back, favorites);
    }
}
