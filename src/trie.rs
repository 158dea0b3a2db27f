//! Persistent prefix trie with resumable cursors.
//!
//! Nodes are shared through `Arc`, and insertion copies nodes on write along the
//! key path. A [`Cursor`] therefore stays valid (and keeps seeing the structure it
//! was created against) no matter what happens to the trie afterwards.
//!
//! Subtree values are gathered at query time by walking the frontier's subtrees:
//! insertion is O(key length), a query is O(key length + visited subtree).

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// A trie node: ordered children plus the value stored at exactly this path.
#[derive(Debug, Clone)]
pub struct TrieNode<K, V> {
    children: BTreeMap<K, Arc<TrieNode<K, V>>>,
    value: Option<V>,
}

impl<K, V> Default for TrieNode<K, V> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            value: None,
        }
    }
}

impl<K: Ord, V> TrieNode<K, V> {
    /// Value stored at exactly this node's path.
    pub const fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn child(&self, symbol: &K) -> Option<&Arc<Self>> {
        self.children.get(symbol)
    }

    pub fn children(&self) -> impl Iterator<Item = (&K, &Arc<Self>)> {
        self.children.iter()
    }

    /// Appends every value in this subtree: own value first, then children in key order.
    fn collect_values<'a>(&'a self, out: &mut Vec<&'a V>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(value) = &node.value {
                out.push(value);
            }
            stack.extend(node.children.values().rev().map(|child| &**child));
        }
    }
}

/// An ordered trie mapping symbol sequences to accumulated values.
#[derive(Debug, Clone)]
pub struct PrefixTrie<K, V> {
    root: Arc<TrieNode<K, V>>,
    len: usize,
}

impl<K, V> Default for PrefixTrie<K, V> {
    fn default() -> Self {
        Self {
            root: Arc::new(TrieNode::default()),
            len: 0,
        }
    }
}

impl<K, V> PrefixTrie<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct paths holding a value.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn root(&self) -> &Arc<TrieNode<K, V>> {
        &self.root
    }

    /// Walks (creating as needed) the nodes along `path` and replaces the terminal
    /// value with `update(previous)`.
    ///
    /// Nodes shared with a cursor or another snapshot are copied, never mutated.
    pub fn insert<I, F>(&mut self, path: I, update: F)
    where
        I: IntoIterator<Item = K>,
        F: FnOnce(Option<V>) -> V,
    {
        let mut node = Arc::make_mut(&mut self.root);
        for symbol in path {
            let child = node.children.entry(symbol).or_default();
            node = Arc::make_mut(child);
        }
        let previous = node.value.take();
        if previous.is_none() {
            self.len += 1;
        }
        node.value = Some(update(previous));
    }

    /// Looks up the value stored at exactly `path`.
    pub fn get(&self, path: &[K]) -> Option<&V> {
        let mut node = self.root.as_ref();
        for symbol in path {
            node = node.child(symbol)?;
        }
        node.value()
    }

    /// Every value in the trie, in key order.
    pub fn values(&self) -> Vec<&V> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_values(&mut out);
        out
    }

    /// A cursor positioned at the root.
    pub fn cursor(&self) -> Cursor<K, V> {
        Cursor {
            path: vec![],
            trail: vec![vec![Arc::clone(&self.root)]],
        }
    }

    /// Consumes `suffix` from `cursor` by exact symbol lookup.
    pub fn query_from(&self, cursor: &Cursor<K, V>, suffix: &[K]) -> Cursor<K, V> {
        let mut next = cursor.clone();
        next.advance(suffix, |node, symbol, out| {
            if let Some(child) = node.child(symbol) {
                out.push(Arc::clone(child));
            }
        });
        next
    }

    /// Consumes `suffix` from `cursor`, following every child whose key satisfies
    /// `accepts(query_symbol, child_key)`.
    pub fn query_from_with<F>(
        &self,
        cursor: &Cursor<K, V>,
        suffix: &[K],
        accepts: F,
    ) -> Cursor<K, V>
    where
        F: Fn(&K, &K) -> bool,
    {
        let mut next = cursor.clone();
        next.advance(suffix, |node, symbol, out| {
            out.extend(
                node.children()
                    .filter(|(key, _)| accepts(symbol, key))
                    .map(|(_, child)| Arc::clone(child)),
            );
        });
        next
    }
}

impl<K: Ord + Clone, T: Clone> PrefixTrie<K, VecDeque<T>> {
    /// Prepends `item` to the list stored at `path` in constant time.
    pub fn push<I>(&mut self, path: I, item: T)
    where
        I: IntoIterator<Item = K>,
    {
        self.insert(path, |previous| {
            let mut items = previous.unwrap_or_default();
            items.push_front(item);
            items
        });
    }
}

/// Position reached by a query: the consumed key path plus the nodes reached after
/// each consumed symbol.
///
/// `trail[i]` is the frontier after `i` symbols, so `trail[0]` is the root and
/// `trail.len() == path.len() + 1`. An empty frontier means "no match"; it absorbs
/// every further symbol.
#[derive(Debug)]
pub struct Cursor<K, V> {
    path: Vec<K>,
    trail: Vec<Vec<Arc<TrieNode<K, V>>>>,
}

impl<K: Clone, V> Clone for Cursor<K, V> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            trail: self.trail.clone(),
        }
    }
}

impl<K: Ord + Clone, V> Cursor<K, V> {
    /// The key consumed so far.
    pub fn path(&self) -> &[K] {
        &self.path
    }

    /// Nodes reached by the consumed key.
    pub fn frontier(&self) -> &[Arc<TrieNode<K, V>>] {
        self.trail.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether the consumed key fell off the trie.
    pub fn is_exhausted(&self) -> bool {
        self.frontier().is_empty()
    }

    /// Values stored anywhere below the frontier.
    pub fn results(&self) -> Vec<&V> {
        let mut out = vec![];
        for node in self.frontier() {
            node.collect_values(&mut out);
        }
        out
    }

    /// Repositions the cursor on `key` by exact lookup, reusing the longest common
    /// prefix with the key consumed so far.
    pub fn seek(&self, key: &[K]) -> Self {
        self.seek_by(key, |node, symbol, out| {
            if let Some(child) = node.child(symbol) {
                out.push(Arc::clone(child));
            }
        })
    }

    /// Like [`Cursor::seek`], following every child accepted by `accepts`.
    pub fn seek_with<F>(&self, key: &[K], accepts: F) -> Self
    where
        F: Fn(&K, &K) -> bool,
    {
        self.seek_by(key, |node, symbol, out| {
            out.extend(
                node.children()
                    .filter(|(child_key, _)| accepts(symbol, child_key))
                    .map(|(_, child)| Arc::clone(child)),
            );
        })
    }

    fn seek_by<F>(&self, key: &[K], step: F) -> Self
    where
        F: Fn(&TrieNode<K, V>, &K, &mut Vec<Arc<TrieNode<K, V>>>),
    {
        let common = self
            .path
            .iter()
            .zip(key)
            .take_while(|(a, b)| a == b)
            .count();

        tracing::trace!(
            reused = common,
            consumed = self.path.len(),
            requested = key.len(),
            "Seeking trie cursor"
        );

        let mut next = Self {
            path: self.path[..common].to_vec(),
            trail: self.trail[..=common].to_vec(),
        };
        next.advance(&key[common..], step);
        next
    }

    fn advance<F>(&mut self, suffix: &[K], step: F)
    where
        F: Fn(&TrieNode<K, V>, &K, &mut Vec<Arc<TrieNode<K, V>>>),
    {
        for symbol in suffix {
            let mut reached = vec![];
            for node in self.frontier() {
                step(node, symbol, &mut reached);
            }
            self.path.push(symbol.clone());
            self.trail.push(reached);
        }
    }
}
