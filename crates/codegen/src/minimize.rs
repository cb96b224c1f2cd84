//! Shared-base extraction for sibling classes
//!
//! Read, create and edit payload classes of one entity mostly declare the
//! same fields. [`extract_common`] picks the fields worth moving into a
//! shared base class, and [`factor`] splits each sibling into "inherits the
//! base and declares the rest" or "declares everything".
//!
//! Inheritance puts the base's fields first. A sibling may only inherit if
//! that does not reorder it: the base (in its own order) followed by the
//! sibling's remaining fields must reproduce the sibling exactly.
//!
//! The search is greedy over the union of all fields in first-seen order.
//! It is deterministic for a given input order, but it is not a global
//! optimum: a smaller valid base can exist that it does not find.

use tracing::{debug, trace};

// ============================================================================
// Ordered Set
// ============================================================================

/// Insertion-ordered collection without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append unless already present; returns whether it was added
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove an item, keeping the order of the rest
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Items of `self` not in `other`, in `self`'s order
    pub fn difference<'a>(&'a self, other: &'a OrderedSet<T>) -> impl Iterator<Item = &'a T> {
        self.items.iter().filter(move |i| !other.contains(i))
    }
}

impl<T: PartialEq> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T: PartialEq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Whether `original` can inherit `shared` without being reordered
pub fn inherits<T: PartialEq>(original: &OrderedSet<T>, shared: &OrderedSet<T>) -> bool {
    shared
        .iter()
        .chain(original.difference(shared))
        .eq(original.iter())
}

/// Fields a set still has to declare under `shared`
fn effective_len<T: PartialEq>(original: &OrderedSet<T>, shared: &OrderedSet<T>) -> usize {
    if inherits(original, shared) {
        original.difference(shared).count()
    } else {
        original.len()
    }
}

fn total_cost<T: PartialEq>(sets: &[OrderedSet<T>], shared: &OrderedSet<T>) -> usize {
    sets.iter().map(|s| effective_len(s, shared)).sum::<usize>() + shared.len()
}

/// Greedy shared base for a group of ordered sets
///
/// Candidates are tried in first-seen order across all sets. Each one stays
/// in the base only if it strictly lowers the total number of declarations
/// (every set's remainder, or its full length if it cannot inherit, plus the
/// base itself).
pub fn extract_common<T: PartialEq + Clone>(sets: &[OrderedSet<T>]) -> OrderedSet<T> {
    let union: OrderedSet<T> = sets.iter().flat_map(|s| s.iter().cloned()).collect();

    let mut shared = OrderedSet::new();
    let mut best = total_cost(sets, &shared);

    for candidate in union {
        shared.insert(candidate.clone());
        let cost = total_cost(sets, &shared);
        if cost < best {
            trace!(cost, best, "keeping shared candidate");
            best = cost;
        } else {
            trace!(cost, best, "dropping shared candidate");
            shared.remove(&candidate);
        }
    }

    debug!(
        sets = sets.len(),
        shared = shared.len(),
        declarations = best,
        "extracted common base"
    );
    shared
}

// ============================================================================
// Factoring
// ============================================================================

/// One sibling after factoring
#[derive(Debug, Clone, PartialEq)]
pub struct FactoredSet<T> {
    /// Declares only its remainder on top of the base
    pub inherits_base: bool,
    /// Items this sibling declares itself
    pub items: Vec<T>,
}

/// A base plus each sibling's share of the declarations
#[derive(Debug, Clone, PartialEq)]
pub struct Factoring<T> {
    pub base: Vec<T>,
    pub members: Vec<FactoredSet<T>>,
}

/// Extract a base and split every set against it, preserving input order
pub fn factor<T: PartialEq + Clone>(sets: &[OrderedSet<T>]) -> Factoring<T> {
    let base = extract_common(sets);
    let members = sets
        .iter()
        .map(|set| {
            if !base.is_empty() && inherits(set, &base) {
                FactoredSet {
                    inherits_base: true,
                    items: set.difference(&base).cloned().collect(),
                }
            } else {
                FactoredSet {
                    inherits_base: false,
                    items: set.as_slice().to_vec(),
                }
            }
        })
        .collect();
    Factoring {
        base: base.into_vec(),
        members,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&'static str]) -> OrderedSet<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_ordered_set_basics() {
        let mut s = set(&["a", "b", "a", "c"]);
        assert_eq!(s.as_slice(), &["a", "b", "c"]);
        assert!(!s.insert("b"));
        assert!(s.remove(&"b"));
        assert_eq!(s.as_slice(), &["a", "c"]);
        let other = set(&["c"]);
        assert_eq!(s.difference(&other).collect::<Vec<_>>(), vec![&"a"]);
    }

    #[test]
    fn test_inherits_prefix_rule() {
        let original = set(&["a", "b", "id"]);
        assert!(inherits(&original, &set(&[])));
        assert!(inherits(&original, &set(&["a"])));
        assert!(inherits(&original, &set(&["a", "b"])));
        assert!(!inherits(&original, &set(&["b"])));
        assert!(!inherits(&original, &set(&["b", "a"])));
        assert!(!inherits(&original, &set(&["a", "x"])));
    }

    #[test]
    fn test_shared_fields_extracted() {
        // read = fields + id, create = fields, edit = optional(fields)
        let read = set(&["name", "email", "id"]);
        let create = set(&["name", "email"]);
        let edit = set(&["name?", "email?"]);
        let common = extract_common(&[read, create, edit]);
        assert_eq!(common.as_slice(), &["name", "email"]);
    }

    #[test]
    fn test_reordering_candidate_excluded() {
        // id leads the read shape, so no field can be hoisted ahead of it
        let read = set(&["id", "name", "email"]);
        let create = set(&["name", "email"]);
        let edit = set(&["name?", "email?"]);
        let common = extract_common(&[read, create, edit]);
        assert!(common.is_empty());
    }

    #[test]
    fn test_single_set_never_shares() {
        let common = extract_common(&[set(&["a", "b", "c"])]);
        assert!(common.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let common = extract_common::<&str>(&[]);
        assert!(common.is_empty());
        let common = extract_common(&[set(&[]), set(&[])]);
        assert!(common.is_empty());
    }

    #[test]
    fn test_greedy_keeps_first_seen_order() {
        // "x" is considered first and kept; the alternative base ["y", "z"]
        // is never reached.
        let a = set(&["x", "y", "z"]);
        let b = set(&["x"]);
        let c = set(&["y", "z"]);
        let d = set(&["y", "z"]);
        let common = extract_common(&[a, b, c, d]);
        assert_eq!(common.as_slice(), &["x"]);
    }

    #[test]
    fn test_deterministic() {
        let sets = vec![
            set(&["title", "body", "author_id", "id"]),
            set(&["title", "body", "author_id"]),
            set(&["title?", "body?", "author_id"]),
        ];
        let first = extract_common(&sets);
        for _ in 0..5 {
            assert_eq!(extract_common(&sets), first);
        }
        assert_eq!(first.as_slice(), &["title", "body", "author_id"]);
    }

    #[test]
    fn test_factor_splits_members() {
        let sets = vec![
            set(&["name", "email", "id"]),
            set(&["name", "email"]),
            set(&["name?", "email?"]),
        ];
        let factoring = factor(&sets);
        assert_eq!(factoring.base, vec!["name", "email"]);
        assert_eq!(
            factoring.members,
            vec![
                FactoredSet {
                    inherits_base: true,
                    items: vec!["id"],
                },
                FactoredSet {
                    inherits_base: true,
                    items: vec![],
                },
                FactoredSet {
                    inherits_base: false,
                    items: vec!["name?", "email?"],
                },
            ]
        );
    }

    #[test]
    fn test_factor_without_base() {
        let factoring = factor(&[set(&["a"]), set(&["b"])]);
        assert!(factoring.base.is_empty());
        assert!(factoring.members.iter().all(|m| !m.inherits_base));
    }
}
