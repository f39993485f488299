//! An environment for storing variables with scopes.
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FromIterator;
use std::rc::Rc;

use crate::metrics::{increment, sample};

/// An environment as a linked-list of hashmaps.
///
/// Each node of the linked-list corresponds to what is called "a layer", where only the current
/// layer can be modified, the previous ones are only accessible for lookup.
///
/// For the generic parameters, `K` is the type for the environment keys, and `V` are their value.
///
/// Cloning an environment is cheap: the current layer is frozen into the list of previous layers
/// (shared by reference counting), and the clone starts from a fresh, empty current layer. Both
/// the original and the clone can then be extended independently without affecting each other,
/// which gives the snapshot semantics required by lexical scoping.
#[derive(Debug, PartialEq)]
pub struct Environment<K: Hash + Eq, V: PartialEq> {
    current: Rc<HashMap<K, V>>,
    previous: Option<Rc<Environment<K, V>>>,
}

impl<K: Hash + Eq, V: PartialEq> Clone for Environment<K, V> {
    fn clone(&self) -> Self {
        increment!("Environment::clone");
        if self.current.is_empty() {
            Self {
                current: Rc::new(HashMap::new()),
                previous: self.previous.clone(),
            }
        } else {
            Self {
                current: Rc::new(HashMap::new()),
                previous: Some(Rc::new(Environment {
                    current: self.current.clone(),
                    previous: self.previous.clone(),
                })),
            }
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> Default for Environment<K, V> {
    fn default() -> Self {
        Self {
            current: Rc::new(HashMap::new()),
            previous: None,
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> Environment<K, V> {
    /// Creates a new empty Environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key-value pair into the Environment.
    pub fn insert(&mut self, key: K, value: V) {
        increment!("Environment::insert");
        // If the current layer is shared with a clone, it must not be mutated anymore: freeze it
        // as a previous layer and start a fresh one.
        if Rc::get_mut(&mut self.current).is_none() {
            let frozen = std::mem::replace(&mut self.current, Rc::new(HashMap::new()));
            self.previous = Some(Rc::new(Environment {
                current: frozen,
                previous: self.previous.take(),
            }));
        }
        // unwrap(): the current layer was exclusively owned, or has just been replaced by a fresh
        // map with a single owner.
        Rc::get_mut(&mut self.current).unwrap().insert(key, value);
    }

    /// Tries to find the value of a key in the Environment, most recent layer first.
    pub fn get(&self, key: &K) -> Option<&V> {
        increment!("Environment::get");

        let mut layer_count = 0;
        let mut env = self;
        let result = loop {
            layer_count += 1;
            sample!("Environment.hashmap_size_get", env.current.len() as f64);

            if let Some(value) = env.current.get(key) {
                break Some(value);
            }

            match env.previous.as_deref() {
                Some(previous) => env = previous,
                None => break None,
            }
        };
        sample!("Environment.get_layers_traversed", layer_count as f64);

        result
    }

    /// Returns the number of layers of this environment, including the current one.
    pub fn layer_count(&self) -> usize {
        let mut count = 1;
        let mut env = self;
        while let Some(prev) = env.previous.as_deref() {
            count += 1;
            env = prev;
        }
        count
    }
}

impl<K: Hash + Eq, V: PartialEq> FromIterator<(K, V)> for Environment<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            current: Rc::new(HashMap::from_iter(iter)),
            previous: None,
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> Extend<(K, V)> for Environment<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_base() {
        let mut env_base = Environment::new();
        env_base.insert(1, 'a');
        assert_eq!(env_base.get(&1), Some(&'a'));
        assert_eq!(env_base.get(&5), None);
        assert_eq!(env_base.layer_count(), 1);
    }

    #[test]
    fn test_clone() {
        let mut env_base = Environment::new();
        env_base.insert(1, 'a');

        let mut env2 = env_base.clone();
        env2.insert(2, 'b');
        assert_eq!(env2.get(&1), Some(&'a'));
        assert_eq!(env2.get(&2), Some(&'b'));
        env_base.insert(3, 'c');
        assert_eq!(env2.get(&3), None);
        assert_eq!(env_base.get(&3), Some(&'c'));
        env_base.insert(2, 'z');
        assert_eq!(env_base.get(&2), Some(&'z'));
    }

    #[test]
    fn test_shadowing() {
        let mut env_base = Environment::new();
        env_base.insert(1, 'a');
        let mut env2 = env_base.clone();
        env2.insert(1, 'b');

        // The most recent binding shadows the older one, in the clone only.
        assert_eq!(env2.get(&1), Some(&'b'));
        assert_eq!(env_base.get(&1), Some(&'a'));
    }

    #[test]
    fn test_from_iter() {
        let env: Environment<u8, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
        assert_eq!(env.get(&1), Some(&'a'));
        assert_eq!(env.get(&2), Some(&'b'));
        assert_eq!(env.get(&3), None);
    }
}
