//! Screen routes and navigation history.

/// Which screen is mounted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(u64),
}

/// Browser-style history: a stack whose top is the current route.
#[derive(Clone, Debug)]
pub struct Navigator {
    entries: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        self.entries.last().copied().unwrap_or(Route::List)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    /// Swap the current entry, keeping history depth.
    pub fn replace(&mut self, route: Route) {
        match self.entries.last_mut() {
            Some(top) => *top = route,
            None => self.entries.push(route),
        }
    }

    /// Pop to the previous entry. `None` when already at the first entry.
    pub fn back(&mut self) -> Option<Route> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::List)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_follows_history_not_a_fixed_route() {
        let mut nav = Navigator::new(Route::Detail(3));
        nav.push(Route::List);
        nav.push(Route::Detail(5));
        assert_eq!(nav.back(), Some(Route::List));
        assert_eq!(nav.back(), Some(Route::Detail(3)));
        assert_eq!(nav.back(), None);
        assert_eq!(nav.current(), Route::Detail(3));
    }

    #[test]
    fn replace_keeps_depth() {
        let mut nav = Navigator::default();
        nav.push(Route::Detail(1));
        nav.replace(Route::Detail(2));
        assert_eq!(nav.depth(), 2);
        assert_eq!(nav.current(), Route::Detail(2));
    }
}
