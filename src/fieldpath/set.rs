//! Set types for field path tracking.

use super::path::{Path, PathElement};
use std::collections::BTreeMap;

/// PathElementSet is a sorted set of PathElements for efficient membership testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathElementSet {
    members: Vec<PathElement>,
}

impl PathElementSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        PathElementSet {
            members: Vec::new(),
        }
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if the set contains the given element.
    pub fn contains(&self, element: &PathElement) -> bool {
        self.members.binary_search(element).is_ok()
    }

    /// Inserts an element into the set.
    pub fn insert(&mut self, element: PathElement) {
        match self.members.binary_search(&element) {
            Ok(_) => {} // Already present
            Err(pos) => self.members.insert(pos, element),
        }
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.members.iter()
    }

    /// Returns the union of two sets.
    pub fn union(&self, other: &PathElementSet) -> PathElementSet {
        let mut result = Vec::with_capacity(self.len() + other.len());
        let mut i = 0;
        let mut j = 0;

        while i < self.members.len() && j < other.members.len() {
            match self.members[i].cmp(&other.members[j]) {
                std::cmp::Ordering::Less => {
                    result.push(self.members[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    result.push(other.members[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    result.push(self.members[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }

        result.extend(self.members[i..].iter().cloned());
        result.extend(other.members[j..].iter().cloned());

        PathElementSet { members: result }
    }
}

/// SetNodeMap maps PathElements to child Sets.
pub type SetNodeMap = BTreeMap<PathElement, Set>;

/// Set is a trie of field paths: `members` are paths terminating at this
/// level, `children` lead to deeper paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Set {
    /// Direct children at this level.
    pub members: PathElementSet,
    /// Nested children for deeper paths.
    pub children: SetNodeMap,
    /// True if the empty path (root itself) is in this set.
    root_in_set: bool,
}

impl Set {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Set {
            members: PathElementSet::new(),
            children: BTreeMap::new(),
            root_in_set: false,
        }
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        !self.root_in_set && self.members.is_empty() && self.children.is_empty()
    }

    /// Returns true if this set equals another set.
    pub fn equals(&self, other: &Set) -> bool {
        self == other
    }

    /// Returns true if the set contains the given path.
    pub fn has(&self, path: &Path) -> bool {
        if path.is_empty() {
            return self.root_in_set;
        }

        self.has_path_elements(path.as_slice())
    }

    fn has_path_elements(&self, elements: &[PathElement]) -> bool {
        let first = &elements[0];
        let rest = &elements[1..];

        if rest.is_empty() {
            return self.members.contains(first);
        }

        if let Some(child) = self.children.get(first) {
            return child.has_path_elements(rest);
        }

        false
    }

    /// Inserts a path into the set.
    pub fn insert(&mut self, path: &Path) {
        if path.is_empty() {
            self.root_in_set = true;
            return;
        }

        self.insert_path_elements(path.as_slice());
    }

    fn insert_path_elements(&mut self, elements: &[PathElement]) {
        let first = &elements[0];
        let rest = &elements[1..];

        if rest.is_empty() {
            self.members.insert(first.clone());
            return;
        }

        let child = self.children.entry(first.clone()).or_insert_with(Set::new);
        child.insert_path_elements(rest);
    }

    /// Returns the union of two sets.
    pub fn union(&self, other: &Set) -> Set {
        let mut result = self.clone();
        result.union_into(other);
        result
    }

    fn union_into(&mut self, other: &Set) {
        self.root_in_set = self.root_in_set || other.root_in_set;
        self.members = self.members.union(&other.members);

        for (key, other_child) in &other.children {
            if let Some(self_child) = self.children.get_mut(key) {
                self_child.union_into(other_child);
            } else {
                self.children.insert(key.clone(), other_child.clone());
            }
        }
    }

    /// Returns the set of leaf paths: paths that are not a strict prefix of
    /// any other path in the set. A path that is both a member and an
    /// interior node is not a leaf.
    pub fn leaves(&self) -> Set {
        let mut leaves = Set::new();

        leaves.root_in_set =
            self.root_in_set && self.members.is_empty() && self.children.is_empty();

        for member in self.members.iter() {
            if !self.children.contains_key(member) {
                leaves.members.insert(member.clone());
            }
        }

        for (key, child) in &self.children {
            let child_leaves = child.leaves();
            if !child_leaves.is_empty() {
                leaves.children.insert(key.clone(), child_leaves);
            }
        }

        leaves
    }

    /// Iterates over all paths in the set.
    pub fn iterate<F>(&self, mut f: F)
    where
        F: FnMut(&Path),
    {
        self.iterate_with_path(&mut Path::new(), &mut f);
    }

    fn iterate_with_path<F>(&self, current_path: &mut Path, f: &mut F)
    where
        F: FnMut(&Path),
    {
        // Visit root if it's in the set
        if self.root_in_set && current_path.is_empty() {
            f(current_path);
        }

        // Visit members
        for member in self.members.iter() {
            current_path.push(member.clone());
            f(current_path);
            current_path.pop();
        }

        // Visit children
        for (key, child) in &self.children {
            current_path.push(key.clone());
            child.iterate_with_path(current_path, f);
            current_path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_path(names: &[&str]) -> Path {
        names.iter().map(|n| PathElement::field_name(*n)).collect()
    }

    #[test]
    fn test_path_element_set_operations() {
        let mut set1 = PathElementSet::new();
        set1.insert(PathElement::field_name("a"));
        set1.insert(PathElement::field_name("b"));
        set1.insert(PathElement::field_name("b"));

        assert_eq!(set1.len(), 2);

        let mut set2 = PathElementSet::new();
        set2.insert(PathElement::field_name("b"));
        set2.insert(PathElement::field_name("c"));

        let union = set1.union(&set2);
        assert_eq!(union.len(), 3);
        assert!(union.contains(&PathElement::field_name("a")));
        assert!(union.contains(&PathElement::field_name("b")));
        assert!(union.contains(&PathElement::field_name("c")));
    }

    #[test]
    fn test_set_insert_and_has() {
        let mut set = Set::new();
        assert!(set.is_empty());

        let path = field_path(&["metadata", "name"]);
        set.insert(&path);
        assert!(set.has(&path));

        let partial_path = field_path(&["metadata"]);
        assert!(!set.has(&partial_path));
    }

    #[test]
    fn test_set_union() {
        let mut set1 = Set::new();
        set1.insert(&field_path(&["a", "x"]));

        let mut set2 = Set::new();
        set2.insert(&field_path(&["a", "y"]));

        let union = set1.union(&set2);
        assert!(union.has(&field_path(&["a", "x"])));
        assert!(union.has(&field_path(&["a", "y"])));
    }

    #[test]
    fn test_set_union_is_idempotent_and_commutative() {
        let mut set1 = Set::new();
        set1.insert(&field_path(&["a", "x"]));
        set1.insert(&field_path(&["b"]));

        let mut set2 = Set::new();
        set2.insert(&field_path(&["a", "y"]));

        assert!(set1.union(&set1).equals(&set1));
        assert!(set1.union(&set2).equals(&set2.union(&set1)));
    }

    #[test]
    fn test_set_iterate() {
        let mut set = Set::new();
        set.insert(&field_path(&["a"]));
        set.insert(&field_path(&["b", "c"]));

        let mut paths = Vec::new();
        set.iterate(|path| {
            paths.push(path.clone());
        });

        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_leaves_drops_interior_members() {
        let mut set = Set::new();
        set.insert(&field_path(&["spec"]));
        set.insert(&field_path(&["spec", "replicas"]));
        set.insert(&field_path(&["metadata", "name"]));

        let leaves = set.leaves();
        assert!(leaves.has(&field_path(&["spec", "replicas"])));
        assert!(leaves.has(&field_path(&["metadata", "name"])));
        // ".spec" is a prefix of ".spec.replicas" and so not a leaf.
        assert!(!leaves.has(&field_path(&["spec"])));
    }

    #[test]
    fn test_leaves_of_union_has_no_prefix_pairs() {
        let mut set1 = Set::new();
        set1.insert(&field_path(&["spec"]));
        set1.insert(&field_path(&["spec", "selector", "app"]));

        let mut set2 = Set::new();
        set2.insert(&field_path(&["spec", "selector"]));
        set2.insert(&field_path(&["status"]));

        let leaves = set1.union(&set2).leaves();

        let mut paths: Vec<Path> = Vec::new();
        leaves.iterate(|p| paths.push(p.clone()));

        for a in &paths {
            for b in &paths {
                if a == b {
                    continue;
                }
                let a_str = a.to_string();
                let b_str = b.to_string();
                assert!(
                    !b_str.starts_with(&a_str),
                    "{} is a strict prefix of {}",
                    a_str,
                    b_str
                );
            }
        }
    }

    #[test]
    fn test_leaves_root_only_set() {
        let mut set = Set::new();
        set.insert(&Path::new());
        assert!(set.leaves().has(&Path::new()));

        set.insert(&field_path(&["a"]));
        assert!(!set.leaves().has(&Path::new()));
    }
}
