use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};

use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// An edition of a book: not the physical object, but the combination of
/// words and pictures that make up a book.
///
/// Each edition is identified by its title, author list and publication year.
/// Alphabetic case and author order are significant, so a book written by
/// "Fred" is different from a book written by "FRED".
///
/// Editions sort by title, then newest first, then by author list.
///
/// ```
/// use shelf_catalog::Edition;
///
/// let older = Edition::new("What", ["Arthur"], 2009).unwrap();
/// let newer = Edition::new("What", ["Arthur"], 2015).unwrap();
/// assert!(newer < older);
/// assert!(Edition::new("   ", ["Arthur"], 2009).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawEdition"))]
pub struct Edition {
    title: String,
    authors: Vec<String>,
    year: u32,
}

impl Edition {
    /// Make an edition, validating every field.
    ///
    /// - `title` must contain at least one non-space character,
    /// - `authors` must have at least one name, and each name must contain
    ///   at least one non-space character,
    /// - `year` is in the Common Era calendar and must be non-negative.
    ///
    /// Names are kept exactly as given (no trimming or case folding).
    #[instrument(level = "trace", skip_all)]
    pub fn new<A: Into<String>>(title: impl Into<String>, authors: impl IntoIterator<Item = A>, year: i32) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            exn::bail!(ErrorKind::EmptyTitle);
        }
        let authors: Vec<String> = authors.into_iter().map(Into::into).collect();
        if authors.is_empty() {
            exn::bail!(ErrorKind::NoAuthors);
        }
        if let Some(position) = authors.iter().position(|author| author.trim().is_empty()) {
            exn::bail!(ErrorKind::EmptyAuthor(position));
        }
        let Ok(year) = u32::try_from(year) else {
            exn::bail!(ErrorKind::NegativeYear(year));
        };
        Ok(Self { title, authors, year })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Authors in the order printed on the edition.
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// Returns `true` if the query is exactly this edition's title, or exactly
    /// one of its authors. Case-sensitive.
    pub fn matches(&self, query: &str) -> bool {
        self.title == query || self.authors.iter().any(|author| author == query)
    }
}

impl Ord for Edition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.title
            .cmp(&other.title)
            .then_with(|| other.year.cmp(&self.year))
            .then_with(|| self.authors.cmp(&other.authors))
    }
}
impl PartialOrd for Edition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Edition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "\"{}\" by {} ({})", self.title, self.authors.join(", "), self.year)
    }
}

/// Unvalidated shape used for deserialization; everything goes back through
/// [`Edition::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawEdition {
    title: String,
    authors: Vec<String>,
    year: i32,
}
#[cfg(feature = "serde")]
impl TryFrom<RawEdition> for Edition {
    type Error = ErrorKind;
    fn try_from(raw: RawEdition) -> std::result::Result<Self, Self::Error> {
        Self::new(raw.title, raw.authors, raw.year).map_err(|err| (*err).clone())
    }
}
