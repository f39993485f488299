//! Interned identifiers.
//!
//! Identifier labels (variable names, primitive operator names, cosmetic type variable names) are
//! stored once in a process-wide interner: an [Ident] is a small copyable handle, and comparing
//! two identifiers for equality is an integer comparison. Interning is cosmetic bookkeeping only
//! and has no bearing on inference itself.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash};

use crate::position::TermPos;

static INTERNER: Lazy<interner::Interner> = Lazy::new(interner::Interner::new);

/// An interned identifier: a handle into the global interner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Ident(interner::Symbol);

impl Ident {
    pub fn new(label: impl AsRef<str>) -> Self {
        Ident(INTERNER.intern(label.as_ref()))
    }

    /// Return the string this identifier was interned from.
    pub fn label(&self) -> &str {
        INTERNER.lookup(self.0)
    }

    pub fn into_label(self) -> String {
        self.label().to_owned()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.label())
    }
}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.label().cmp(other.label())
    }
}

impl<F> From<F> for Ident
where
    String: From<F>,
{
    fn from(val: F) -> Self {
        Ident::new(String::from(val))
    }
}

// `From<Ident> for String` can't be derived from this the other way around: together with the
// generic `From<F> for Ident` above it would instantiate to `From<Ident> for Ident`, which
// conflicts with the blanket identity implementation in the standard library.
#[allow(clippy::from_over_into)]
impl Into<String> for Ident {
    fn into(self) -> String {
        self.into_label()
    }
}

/// An identifier together with the position of its occurrence in the source.
///
/// The position is ignored for equality and hashing: it only serves error reporting.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(into = "String", from = "String")]
pub struct LocIdent {
    ident: Ident,
    pub pos: TermPos,
}

impl LocIdent {
    pub fn new_with_pos(label: impl AsRef<str>, pos: TermPos) -> Self {
        LocIdent {
            ident: Ident::new(label),
            pos,
        }
    }

    pub fn new(label: impl AsRef<str>) -> Self {
        Self::new_with_pos(label, TermPos::None)
    }

    /// Return an identifier with the same label, located at `pos`.
    pub fn with_pos(self, pos: TermPos) -> LocIdent {
        LocIdent { pos, ..self }
    }

    /// Return the identifier without its position.
    pub fn ident(&self) -> Ident {
        self.ident
    }

    /// Return the string representation of this identifier.
    pub fn label(&self) -> &str {
        self.ident.label()
    }

    pub fn into_label(self) -> String {
        self.label().to_owned()
    }
}

impl PartialEq for LocIdent {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for LocIdent {}

impl Hash for LocIdent {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ident.hash(state)
    }
}

impl fmt::Display for LocIdent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<Ident> for LocIdent {
    fn from(ident: Ident) -> Self {
        LocIdent {
            ident,
            pos: TermPos::None,
        }
    }
}

impl<F> From<F> for LocIdent
where
    String: From<F>,
{
    fn from(val: F) -> Self {
        Self::new(String::from(val))
    }
}

#[allow(clippy::from_over_into)]
impl Into<String> for LocIdent {
    fn into(self) -> String {
        self.into_label()
    }
}

mod interner {
    use std::collections::HashMap;
    use std::sync::{Mutex, RwLock};

    use typed_arena::Arena;

    /// A handle to a string stored in the [Interner].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Symbol(u32);

    /// A thread-safe string interner. Each distinct string is stored exactly once, so interning
    /// the same string twice hands back the same [Symbol].
    pub(crate) struct Interner<'a>(RwLock<Store<'a>>);

    impl<'a> Interner<'a> {
        pub(crate) fn new() -> Self {
            Interner(RwLock::new(Store::new()))
        }

        /// Store `label` if it isn't already there and return its [Symbol].
        pub(crate) fn intern(&self, label: impl AsRef<str>) -> Symbol {
            self.0.write().unwrap().intern(label.as_ref())
        }

        /// Retrieve the string behind a [Symbol]. Symbols are only handed out by
        /// [Interner::intern], so the lookup always succeeds.
        pub(crate) fn lookup(&self, symbol: Symbol) -> &str {
            // SAFETY: the reference points into the arena of the store, which never deallocates.
            // Extending its lifetime to the one of `self` is sound because the store lives
            // exactly as long as the interner.
            unsafe { std::mem::transmute(self.0.read().unwrap().lookup(symbol)) }
        }
    }

    /// The state behind the interner lock.
    struct Store<'a> {
        /// Owns the string data. The arena only grows, so references into it stay valid as long
        /// as the store exists. The `Mutex` makes the store `Sync`, which the global interner
        /// static requires; the arena itself is not shareable between threads.
        arena: Mutex<Arena<u8>>,
        /// Maps stored strings back to their symbol, making [Store::intern] idempotent.
        symbols: HashMap<&'a str, Symbol>,
        /// The stored strings, indexed by symbol.
        labels: Vec<&'a str>,
    }

    impl<'a> Store<'a> {
        fn new() -> Self {
            Store {
                arena: Mutex::new(Arena::new()),
                symbols: HashMap::new(),
                labels: Vec::new(),
            }
        }

        fn intern(&mut self, label: &str) -> Symbol {
            if let Some(&symbol) = self.symbols.get(label) {
                return symbol;
            }

            // SAFETY: tying the lifetime of the allocated string to `'a` (the lifetime parameter
            // of the store) is sound for the same reason as in [Interner::lookup]: the arena
            // never deallocates and is dropped together with the store.
            let stored = unsafe {
                std::mem::transmute::<&str, &'a str>(self.arena.lock().unwrap().alloc_str(label))
            };
            let symbol = Symbol(self.labels.len() as u32);
            self.labels.push(stored);
            self.symbols.insert(stored, symbol);
            symbol
        }

        fn lookup(&self, symbol: Symbol) -> &str {
            self.labels[symbol.0 as usize]
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn intern_then_lookup() {
            let interner = Interner::new();
            let symbol = interner.intern("some_label");
            assert_eq!(interner.lookup(symbol), "some_label");
        }

        #[test]
        fn interning_is_idempotent() {
            let interner = Interner::new();
            assert_eq!(interner.intern("x"), interner.intern("x"));
        }

        #[test]
        fn distinct_strings_get_distinct_symbols() {
            let interner = Interner::new();
            assert_ne!(interner.intern("x"), interner.intern("y"));
        }
    }
}
