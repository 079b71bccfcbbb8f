//! Path-based navigation history
//!
//! Mirrors `pushState`/`replaceState` semantics: pushing the current path
//! again never duplicates the entry, and a push clears the forward stack.
//! A redirect replacing an entry with the one behind it collapses the two.

use super::route::RouteId;

/// Navigation history owned by the router
#[derive(Debug, Clone)]
pub struct PathHistory {
    /// Current history entry
    current: Option<RouteId>,
    /// Entries behind the current one (most recent first)
    back: Vec<RouteId>,
    /// Entries ahead of the current one (most recent first)
    forward: Vec<RouteId>,
    /// Maximum number of entries kept behind the current one
    max_history: usize,
}

impl PathHistory {
    /// Create an empty history
    pub fn new(max_history: usize) -> Self {
        Self {
            current: None,
            back: Vec::new(),
            forward: Vec::new(),
            max_history,
        }
    }

    /// Push a new entry; returns false when `path` already is the current entry
    pub fn push(&mut self, path: RouteId) -> bool {
        if self.current.as_ref() == Some(&path) {
            return false;
        }

        if let Some(previous) = self.current.take() {
            self.back.insert(0, previous);

            // Trim history if it exceeds max size
            if self.back.len() > self.max_history {
                self.back.truncate(self.max_history);
            }
        }

        self.forward.clear();
        self.current = Some(path);
        true
    }

    /// Replace the current entry; an identical entry right behind it is
    /// merged into the replacement
    pub fn replace(&mut self, path: RouteId) {
        if self.back.first() == Some(&path) {
            self.back.remove(0);
        }
        self.current = Some(path);
    }

    /// Move one entry back
    pub fn go_back(&mut self) -> Option<RouteId> {
        if self.back.is_empty() {
            return None;
        }
        let previous = self.back.remove(0);
        if let Some(current) = self.current.take() {
            self.forward.insert(0, current);
        }
        self.current = Some(previous.clone());
        Some(previous)
    }

    /// Move one entry forward
    pub fn go_forward(&mut self) -> Option<RouteId> {
        if self.forward.is_empty() {
            return None;
        }
        let next = self.forward.remove(0);
        if let Some(current) = self.current.take() {
            self.back.insert(0, current);
        }
        self.current = Some(next.clone());
        Some(next)
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    /// Check if we can go forward
    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Get the current entry
    pub fn current(&self) -> Option<&RouteId> {
        self.current.as_ref()
    }

    /// Entries behind the current one, most recent first
    pub fn entries(&self) -> &[RouteId] {
        &self.back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_does_not_duplicate_current() {
        let mut history = PathHistory::new(50);
        assert!(history.push("/dashboard".into()));
        assert!(!history.push("/dashboard".into()));
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = PathHistory::new(50);
        history.push("/dashboard".into());
        history.push("/scanner".into());
        history.push("/alerts".into());

        assert_eq!(history.go_back(), Some(RouteId::from("/scanner")));
        assert_eq!(history.go_back(), Some(RouteId::from("/dashboard")));
        assert_eq!(history.go_back(), None);
        assert!(history.can_go_forward());

        assert_eq!(history.go_forward(), Some(RouteId::from("/scanner")));
        history.push("/backtest".into());
        assert!(!history.can_go_forward());
        assert_eq!(history.current(), Some(&RouteId::from("/backtest")));
        assert_eq!(
            history.entries(),
            &[RouteId::from("/scanner"), RouteId::from("/dashboard")]
        );
    }

    #[test]
    fn test_replace_keeps_stacks() {
        let mut history = PathHistory::new(50);
        history.push("/dashboard".into());
        history.push("/scanner".into());
        history.push("/missing".into());
        history.replace("/about".into());

        assert_eq!(history.current(), Some(&RouteId::from("/about")));
        assert_eq!(
            history.entries(),
            &[RouteId::from("/scanner"), RouteId::from("/dashboard")]
        );
    }

    #[test]
    fn test_replace_merges_identical_previous_entry() {
        let mut history = PathHistory::new(50);
        history.push("/dashboard".into());
        history.push("/missing".into());
        history.replace("/dashboard".into());

        assert_eq!(history.current(), Some(&RouteId::from("/dashboard")));
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = PathHistory::new(2);
        for path in ["/a", "/b", "/c", "/d"] {
            history.push(path.into());
        }
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.entries()[0], RouteId::from("/c"));
    }
}
