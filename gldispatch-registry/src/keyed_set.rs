use std::collections::HashMap;
use std::hash::Hash;

/// Gives an element a computed key under which it is stored in an
/// [`OrderedKeyedSet`].
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

impl Keyed for String {
    type Key = String;

    fn key(&self) -> String {
        self.clone()
    }
}

/// A set of keyed elements that preserves order of first insertion.
///
/// Replacing an element (adding an element whose key is already present)
/// updates the value in place without moving it to the end. Every collection
/// in the registry model iterates through one of these, which is what makes
/// generated output byte-stable across runs.
#[derive(Clone)]
pub struct OrderedKeyedSet<T: Keyed> {
    elems: Vec<T>,
    index: HashMap<T::Key, usize>,
}

impl<T: Keyed + std::fmt::Debug> std::fmt::Debug for OrderedKeyedSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.elems).finish()
    }
}

impl<T: Keyed> Default for OrderedKeyedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> OrderedKeyedSet<T> {
    pub fn new() -> Self {
        OrderedKeyedSet {
            elems: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add an element. If its key is already present, the old element is
    /// replaced in place and returned; insertion order is not altered.
    pub fn add(&mut self, elem: T) -> Option<T> {
        match self.index.get(&elem.key()) {
            Some(&slot) => Some(std::mem::replace(&mut self.elems[slot], elem)),
            None => {
                self.index.insert(elem.key(), self.elems.len());
                self.elems.push(elem);
                None
            }
        }
    }

    pub fn extend(&mut self, elems: impl IntoIterator<Item = T>) {
        for elem in elems {
            self.add(elem);
        }
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.index.get(key).map(|&slot| &self.elems[slot])
    }

    /// Mutable access to the element stored under `key`. The mutation must
    /// not change the element's key.
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.index.get(key).map(|&slot| &mut self.elems[slot])
    }

    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Iterate elements in order of first insertion.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elems.iter()
    }

    /// Iterate elements mutably, in order of first insertion. Mutations must
    /// not change element keys.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elems.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = T::Key> + '_ {
        self.elems.iter().map(|e| e.key())
    }

    /// The union of two sets. All elements of `self` precede the elements
    /// found only in `other`, each side keeping its own insertion order. On
    /// key collision the element from `other` wins but keeps `self`'s
    /// position.
    pub fn union(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        let mut joined = self.clone();
        joined.extend(other.iter().cloned());
        joined
    }
}

impl<'a, T: Keyed> IntoIterator for &'a OrderedKeyedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Keyed> FromIterator<T> for OrderedKeyedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedKeyedSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod test {
    use super::{Keyed, OrderedKeyedSet};

    #[derive(Debug, Clone, PartialEq)]
    struct Cheese {
        name: &'static str,
        flavor: &'static str,
    }

    impl Keyed for Cheese {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.name
        }
    }

    fn cheese(name: &'static str, flavor: &'static str) -> Cheese {
        Cheese { name, flavor }
    }

    #[test]
    fn replacement_keeps_position() {
        let mut cheeses = OrderedKeyedSet::new();
        cheeses.add(cheese("cheddar", "good"));
        cheeses.add(cheese("gouda", "smells like feet"));
        cheeses.add(cheese("romano", "awesome"));

        let old = cheeses.add(cheese("gouda", "ok i guess"));
        assert_eq!(old.unwrap().flavor, "smells like feet");
        assert_eq!(cheeses.get(&"gouda").unwrap().flavor, "ok i guess");

        let order: Vec<_> = cheeses.iter().map(|c| c.name).collect();
        assert_eq!(order, ["cheddar", "gouda", "romano"]);
    }

    #[test]
    fn union_prefers_other_values_but_self_order() {
        let a: OrderedKeyedSet<_> =
            [cheese("a", "1"), cheese("b", "2")].into_iter().collect();
        let b: OrderedKeyedSet<_> =
            [cheese("b", "3"), cheese("c", "4")].into_iter().collect();

        let joined = a.union(&b);
        let order: Vec<_> = joined.iter().map(|c| (c.name, c.flavor)).collect();
        assert_eq!(order, [("a", "1"), ("b", "3"), ("c", "4")]);
    }

    #[test]
    fn union_is_disjoint_concatenation_without_collisions() {
        let a: OrderedKeyedSet<_> = [cheese("como", "subtle")].into_iter().collect();
        let b: OrderedKeyedSet<_> = [cheese("sourdough", "pleasant")].into_iter().collect();
        assert_eq!(a.union(&b).len(), a.len() + b.len());
    }
}
