//! Hierarchical key/value store with push/pop scoping.
//!
//! A [`ScopedContext`] holds one flat map plus a stack of diff frames. Each
//! frame records what it changed so that [`ScopedContext::pop`] can put the
//! map back exactly as it was before the matching [`ScopedContext::push`].

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::ScopeError;

/// String-keyed mapping used for every rendering scope.
pub type ContextMap = BTreeMap<String, Value>;

/// Changes made inside one scope. A key is tracked in at most one of the
/// three collections.
#[derive(Debug, Clone, Default, PartialEq)]
struct Frame {
    added: BTreeSet<String>,
    modified: BTreeMap<String, Value>,
    removed: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ScopedContext {
    current: ContextMap,
    frames: Vec<Frame>,
}

impl ScopedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new, empty scope.
    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Merge `entries` into the current scope.
    pub fn add<I>(&mut self, entries: I) -> Result<(), ScopeError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let frame = self.frames.last_mut().ok_or(ScopeError::NoOpenScope)?;
        for (key, value) in entries {
            match self.current.get(&key) {
                None => {
                    if let Some(prior) = frame.removed.remove(&key) {
                        frame.modified.insert(key.clone(), prior);
                    } else if !frame.modified.contains_key(&key) {
                        frame.added.insert(key.clone());
                    }
                }
                Some(old) => {
                    if !frame.added.contains(&key) && !frame.modified.contains_key(&key) {
                        frame.modified.insert(key.clone(), old.clone());
                    }
                }
            }
            self.current.insert(key, value);
        }
        Ok(())
    }

    /// Set a single key in the current scope.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), ScopeError> {
        self.add([(key.into(), value)])
    }

    /// Remove `keys` from the visible map for the rest of the current scope.
    /// Keys that are not present are ignored.
    pub fn remove<I, K>(&mut self, keys: I) -> Result<(), ScopeError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let frame = self.frames.last_mut().ok_or(ScopeError::NoOpenScope)?;
        for key in keys {
            let key = key.as_ref();
            let Some(value) = self.current.remove(key) else {
                continue;
            };
            if frame.added.remove(key) {
                continue;
            }
            if let Some(prior) = frame.modified.remove(key) {
                frame.removed.insert(key.to_string(), prior);
            } else {
                frame.removed.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Close the innermost scope and undo every change it made.
    pub fn pop(&mut self) -> Result<(), ScopeError> {
        let frame = self.frames.pop().ok_or(ScopeError::NoOpenScope)?;
        for key in frame.added {
            self.current.remove(&key);
        }
        self.current.extend(frame.removed);
        self.current.extend(frame.modified);
        Ok(())
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.current.get(key)
    }

    /// Read-only view of the live mapping.
    pub fn data(&self) -> &ContextMap {
        &self.current
    }

    /// Owned copy of the live mapping, handed to collaborators so they can
    /// never mutate the scope behind its back.
    pub fn snapshot(&self) -> ContextMap {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn kv(k: &str, v: Value) -> (String, Value) {
        (k.to_string(), v)
    }

    #[test]
    fn operations_without_scope_fail() {
        let mut ctx = ScopedContext::new();
        assert_eq!(ctx.add([kv("a", json!(1))]), Err(ScopeError::NoOpenScope));
        assert_eq!(ctx.remove(["a"]), Err(ScopeError::NoOpenScope));
        assert_eq!(ctx.pop(), Err(ScopeError::NoOpenScope));
    }

    #[test]
    fn pop_restores_added_modified_and_removed() {
        let mut ctx = ScopedContext::new();
        ctx.push();
        ctx.add([kv("title", json!("root")), kv("keep", json!(true))])
            .unwrap();
        let before = ctx.snapshot();

        ctx.push();
        ctx.add([kv("title", json!("inner")), kv("fresh", json!(1))])
            .unwrap();
        ctx.remove(["keep"]).unwrap();
        assert_eq!(ctx.value("title"), Some(&json!("inner")));
        assert!(ctx.value("keep").is_none());
        ctx.pop().unwrap();

        assert_eq!(ctx.data(), &before);
    }

    #[test]
    fn remove_then_readd_restores_original_value() {
        let mut ctx = ScopedContext::new();
        ctx.push();
        ctx.insert("x", json!("outer")).unwrap();

        ctx.push();
        ctx.insert("x", json!("a")).unwrap();
        ctx.remove(["x"]).unwrap();
        ctx.insert("x", json!("b")).unwrap();
        ctx.remove(["x"]).unwrap();
        ctx.pop().unwrap();

        assert_eq!(ctx.value("x"), Some(&json!("outer")));
    }

    #[test]
    fn inner_values_invisible_after_pop_even_when_outer_shares_name() {
        let mut ctx = ScopedContext::new();
        ctx.push();
        ctx.insert("name", json!("outer")).unwrap();
        ctx.push();
        ctx.insert("name", json!("inner")).unwrap();
        ctx.insert("only_inner", json!(1)).unwrap();
        ctx.pop().unwrap();

        assert_eq!(ctx.value("name"), Some(&json!("outer")));
        assert!(ctx.value("only_inner").is_none());

        ctx.pop().unwrap();
        assert!(ctx.data().is_empty());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn removing_missing_key_is_noop() {
        let mut ctx = ScopedContext::new();
        ctx.push();
        ctx.remove(["ghost"]).unwrap();
        ctx.pop().unwrap();
        assert!(ctx.data().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, i64),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6, any::<i64>()).prop_map(|(k, v)| Op::Add(k, v)),
            (0u8..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn push_ops_pop_is_identity(
            seed in proptest::collection::vec((0u8..6, any::<i64>()), 0..6),
            ops in proptest::collection::vec(op(), 0..40),
        ) {
            let mut ctx = ScopedContext::new();
            ctx.push();
            ctx.add(seed.into_iter().map(|(k, v)| (format!("k{k}"), json!(v)))).unwrap();
            let before = ctx.snapshot();

            ctx.push();
            for op in ops {
                match op {
                    Op::Add(k, v) => ctx.insert(format!("k{k}"), json!(v)).unwrap(),
                    Op::Remove(k) => ctx.remove([format!("k{k}")]).unwrap(),
                }
            }
            ctx.pop().unwrap();

            prop_assert_eq!(ctx.data(), &before);
        }
    }
}
