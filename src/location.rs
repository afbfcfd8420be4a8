//! Location addressing: the `#fragment` that names the displayed section.
//!
//! The home section has an empty fragment, every other section is addressed as `#id`. Moving
//! back and forward through visited locations works like browser history: each move is a
//! location change that the controller answers with a navigation.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A location fragment, empty for the home section.
pub struct Location {
    fragment: String,
}

impl Location {
    #[must_use]
    /// Location of `section_id`, which is empty when it is the home section.
    pub fn for_section(section_id: &str, home: &str) -> Self {
        if section_id == home {
            Self::default()
        } else {
            Self {
                fragment: section_id.to_string(),
            }
        }
    }

    #[must_use]
    /// Parses `#id`, `id` or a path with a trailing `#id`.
    pub fn parse(input: &str) -> Self {
        let fragment = input
            .rsplit_once('#')
            .map_or(input, |(_, fragment)| fragment)
            .trim();
        Self {
            fragment: fragment.to_string(),
        }
    }

    #[must_use]
    /// The fragment without its leading `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    #[must_use]
    /// Whether no section is named.
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fragment.is_empty() {
            Ok(())
        } else {
            write!(f, "#{}", self.fragment)
        }
    }
}

#[derive(Debug, Default)]
/// Visited locations with a cursor, like a browser's session history.
pub struct History {
    entries: Vec<Location>,
    cursor: usize,
}

impl History {
    /// Records a new location, discarding any forward entries.
    ///
    /// Pushing the location already under the cursor is ignored.
    pub fn push(&mut self, location: Location) {
        if self.current() == Some(&location) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(location);
        self.cursor = self.entries.len() - 1;
    }

    #[must_use]
    /// Location under the cursor.
    pub fn current(&self) -> Option<&Location> {
        self.entries.get(self.cursor)
    }

    /// Steps back one entry and returns it.
    pub fn back(&mut self) -> Option<&Location> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry and returns it.
    pub fn forward(&mut self) -> Option<&Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }
}

#[cfg(test)]
#[path = "tests/location.rs"]
mod tests;
