//! Title and author indexes.
//!
//! Two exact-match mappings, `title -> editions` and `author -> editions`.
//! An edition is inserted when it gets its first live copy and removed with
//! its last; key buckets that become empty are dropped, so the index never
//! holds an edition without copies.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shelf_catalog::Edition;

type Bucket = HashSet<Arc<Edition>>;

#[derive(Debug, Default)]
pub(crate) struct Index {
    pub(crate) by_title: HashMap<String, Bucket>,
    pub(crate) by_author: HashMap<String, Bucket>,
}

/// An index key, tagged with the mapping it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Key<'a> {
    Title(&'a str),
    Author(&'a str),
}
impl Key<'_> {
    /// Returns `true` if `edition` belongs under this key: its title for a
    /// title key, one of its authors for an author key.
    pub(crate) fn fits(&self, edition: &Edition) -> bool {
        match self {
            Self::Title(title) => edition.title() == *title,
            Self::Author(author) => edition.authors().iter().any(|name| name == author),
        }
    }
}

fn insert_into(map: &mut HashMap<String, Bucket>, key: &str, edition: &Arc<Edition>) {
    match map.get_mut(key) {
        Some(bucket) => {
            bucket.insert(Arc::clone(edition));
        },
        None => {
            map.insert(key.to_string(), HashSet::from([Arc::clone(edition)]));
        },
    }
}

fn remove_from(map: &mut HashMap<String, Bucket>, key: &str, edition: &Edition) {
    let Some(bucket) = map.get_mut(key) else {
        return;
    };
    bucket.remove(edition);
    if bucket.is_empty() {
        map.remove(key);
    }
}

fn holds(map: &HashMap<String, Bucket>, key: &str, edition: &Edition) -> bool {
    map.get(key).is_some_and(|bucket| bucket.contains(edition))
}

fn pairs<'a>(
    map: &'a HashMap<String, Bucket>,
    tag: fn(&'a str) -> Key<'a>,
) -> impl Iterator<Item = (Key<'a>, &'a Arc<Edition>)> {
    map.iter().flat_map(move |(key, bucket)| bucket.iter().map(move |edition| (tag(key.as_str()), edition)))
}

impl Index {
    pub(crate) fn insert(&mut self, edition: &Arc<Edition>) {
        insert_into(&mut self.by_title, edition.title(), edition);
        for author in edition.authors() {
            insert_into(&mut self.by_author, author, edition);
        }
    }

    pub(crate) fn remove(&mut self, edition: &Edition) {
        remove_from(&mut self.by_title, edition.title(), edition);
        for author in edition.authors() {
            remove_from(&mut self.by_author, author, edition);
        }
    }

    /// Distinct editions whose title is `query` or whose authors include
    /// `query`. Unordered.
    pub(crate) fn lookup(&self, query: &str) -> HashSet<Arc<Edition>> {
        let titled = self.by_title.get(query).into_iter().flatten();
        let authored = self.by_author.get(query).into_iter().flatten();
        titled.chain(authored).cloned().collect()
    }

    /// Returns `true` if the edition is present under its title and under
    /// every one of its authors.
    pub(crate) fn contains(&self, edition: &Edition) -> bool {
        holds(&self.by_title, edition.title(), edition)
            && edition.authors().iter().all(|author| holds(&self.by_author, author, edition))
    }

    /// Returns `true` if the edition appears anywhere in the index.
    #[cfg(test)]
    pub(crate) fn mentions(&self, edition: &Edition) -> bool {
        holds(&self.by_title, edition.title(), edition)
            || edition.authors().iter().any(|author| holds(&self.by_author, author, edition))
    }

    pub(crate) fn title_count(&self) -> usize {
        self.by_title.len()
    }

    pub(crate) fn author_count(&self) -> usize {
        self.by_author.len()
    }

    /// Every (key, edition) pair, titles first. Only used by the consistency
    /// check, never on a lending path.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (Key<'_>, &Arc<Edition>)> {
        pairs(&self.by_title, Key::Title).chain(pairs(&self.by_author, Key::Author))
    }

    /// Returns the first empty key bucket, if any; there never should be one.
    pub(crate) fn empty_bucket(&self) -> Option<&str> {
        self.by_title
            .iter()
            .chain(self.by_author.iter())
            .find(|(_, bucket)| bucket.is_empty())
            .map(|(key, _)| key.as_str())
    }
}
