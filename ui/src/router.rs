//! In-app navigation between the onboarding page, folder grids and the
//! carousel.

use std::fmt;

const LAUNCH_SEGMENT: &str = "launch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Launch,
    Folder { directory: String },
    Photo { directory: String, photo_name: String },
}

impl Route {
    /// Parse a location such as `/d1/cat.jpg`. Unknown shapes fall back to
    /// [`Route::Home`].
    pub fn parse(location: &str) -> Route {
        let trimmed = location.trim().trim_start_matches('/');
        let mut parts = trimmed.splitn(2, '/');
        let first = parts.next().unwrap_or_default();
        let rest = parts.next().map(|r| r.trim_end_matches('/'));

        match (first, rest) {
            ("", _) => Route::Home,
            (LAUNCH_SEGMENT, None) | (LAUNCH_SEGMENT, Some("")) => Route::Launch,
            (dir, None) | (dir, Some("")) => Route::Folder {
                directory: dir.to_string(),
            },
            (dir, Some(name)) => Route::Photo {
                directory: dir.to_string(),
                photo_name: name.to_string(),
            },
        }
    }

    pub fn directory(&self) -> Option<&str> {
        match self {
            Route::Folder { directory } | Route::Photo { directory, .. } => Some(directory),
            _ => None,
        }
    }

    pub fn photo_name(&self) -> Option<&str> {
        match self {
            Route::Photo { photo_name, .. } => Some(photo_name),
            _ => None,
        }
    }

    pub fn folder(directory: impl Into<String>) -> Route {
        Route::Folder {
            directory: directory.into(),
        }
    }

    pub fn photo(directory: impl Into<String>, photo_name: impl Into<String>) -> Route {
        Route::Photo {
            directory: directory.into(),
            photo_name: photo_name.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Launch => write!(f, "/{}", LAUNCH_SEGMENT),
            Route::Folder { directory } => write!(f, "/{}", directory),
            Route::Photo {
                directory,
                photo_name,
            } => write!(f, "/{}/{}", directory, photo_name),
        }
    }
}

/// History stack. The last entry is the current location.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty: `back` keeps the first entry.
        &self.history[self.history.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        if self.current() != &route {
            tracing::debug!("navigate to {}", route);
            self.history.push(route);
        }
    }

    /// Swap the current entry without growing the history.
    pub fn replace(&mut self, route: Route) {
        let last = self.history.len() - 1;
        self.history[last] = route;
    }

    pub fn back(&mut self) -> &Route {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.current()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
