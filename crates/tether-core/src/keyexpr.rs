//! Key expressions: the addressing language of the pub/sub space.
//!
//! A key expression is a `/`-separated path whose chunks may be the
//! wildcards `*` (exactly one chunk) or `**` (any number of chunks,
//! including none). [`KeyExpr`] owns a validated expression;
//! [`KeyExprStr`] is its borrowed representation, handed out by the loan
//! verbs and usable directly over caller memory through
//! [`KeyExprView`].

use crate::error::{KeyExprError, KeyExprResult};
use crate::handle::{Loanable, Resource, View};

/// A borrowed, validated key expression.
///
/// This is the loaned representation of [`KeyExpr`]; it can only be
/// obtained from validated input, so every `&KeyExprStr` upholds the
/// chunk and wildcard rules.
#[repr(transparent)]
pub struct KeyExprStr(str);

impl KeyExprStr {
    /// Validates `s` and borrows it as a key expression.
    pub fn new(s: &str) -> KeyExprResult<&Self> {
        validate(s)?;
        Ok(Self::new_unchecked(s))
    }

    /// Wraps an already-validated string.
    fn new_unchecked(s: &str) -> &Self {
        // Sound: KeyExprStr is repr(transparent) over str.
        unsafe { &*(s as *const str as *const KeyExprStr) }
    }

    /// Returns the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the `/`-separated chunks.
    pub fn chunks(&self) -> std::str::Split<'_, char> {
        self.0.split('/')
    }

    /// Returns whether the expression contains a wildcard chunk.
    pub fn is_wild(&self) -> bool {
        self.chunks().any(|c| c == "*" || c == "**")
    }

    /// Returns whether every key matched by `other` is also matched by
    /// `self`.
    pub fn includes(&self, other: &KeyExprStr) -> bool {
        let pattern: Vec<&str> = self.chunks().collect();
        let key: Vec<&str> = other.chunks().collect();
        includes_chunks(&pattern, &key)
    }

    /// Returns whether some concrete key is matched by both expressions.
    pub fn intersects(&self, other: &KeyExprStr) -> bool {
        let left: Vec<&str> = self.chunks().collect();
        let right: Vec<&str> = other.chunks().collect();
        intersects_chunks(&left, &right)
    }

    /// Appends `suffix` under `self`, validating the result.
    pub fn join(&self, suffix: &str) -> KeyExprResult<KeyExpr> {
        KeyExpr::new(format!("{}/{}", &self.0, suffix))
    }

    /// Copies into an owned [`KeyExpr`].
    pub fn to_key_expr(&self) -> KeyExpr {
        KeyExpr {
            inner: Box::from(&self.0),
        }
    }
}

impl PartialEq for KeyExprStr {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for KeyExprStr {}

impl std::hash::Hash for KeyExprStr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl AsRef<str> for KeyExprStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyExprStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for KeyExprStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyExprStr({:?})", &self.0)
    }
}

/// A view over a key expression held in caller memory.
pub type KeyExprView<'a> = View<'a, KeyExprStr>;

/// Borrows caller memory as a key-expression view, validating it first.
pub fn key_expr_view(s: &str) -> KeyExprResult<KeyExprView<'_>> {
    Ok(View::new(KeyExprStr::new(s)?))
}

/// An owned, validated key expression.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KeyExpr {
    inner: Box<str>,
}

impl KeyExpr {
    /// Validates `s` and takes ownership of it.
    pub fn new(s: impl Into<String>) -> KeyExprResult<Self> {
        let s = s.into();
        validate(&s)?;
        Ok(Self {
            inner: s.into_boxed_str(),
        })
    }

    /// Like [`KeyExpr::new`], but first collapses redundant `**` runs
    /// (`a/**/**/b` becomes `a/**/b`).
    pub fn autocanonize(s: impl Into<String>) -> KeyExprResult<Self> {
        let s = s.into();
        let mut chunks: Vec<&str> = Vec::new();
        for chunk in s.split('/') {
            if chunk == "**" && chunks.last() == Some(&"**") {
                continue;
            }
            chunks.push(chunk);
        }
        Self::new(chunks.join("/"))
    }

    /// Returns the underlying string.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Resource for KeyExpr {
    const KIND: &'static str = "keyexpr";
}

impl Loanable for KeyExpr {
    type Loaned = KeyExprStr;

    fn loaned(&self) -> &KeyExprStr {
        KeyExprStr::new_unchecked(&self.inner)
    }
}

impl std::ops::Deref for KeyExpr {
    type Target = KeyExprStr;

    fn deref(&self) -> &KeyExprStr {
        self.loaned()
    }
}

impl TryFrom<&str> for KeyExpr {
    type Error = KeyExprError;

    fn try_from(s: &str) -> KeyExprResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for KeyExpr {
    type Error = KeyExprError;

    fn try_from(s: String) -> KeyExprResult<Self> {
        Self::new(s)
    }
}

impl std::str::FromStr for KeyExpr {
    type Err = KeyExprError;

    fn from_str(s: &str) -> KeyExprResult<Self> {
        Self::new(s)
    }
}

impl std::fmt::Display for KeyExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl std::fmt::Debug for KeyExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyExpr({:?})", &self.inner)
    }
}

fn validate(s: &str) -> KeyExprResult<()> {
    if s.is_empty() {
        return Err(KeyExprError::Empty);
    }
    for reserved in ['#', '?'] {
        if s.contains(reserved) {
            return Err(KeyExprError::ReservedChar(s.to_string(), reserved));
        }
    }
    for chunk in s.split('/') {
        if chunk.is_empty() {
            return Err(KeyExprError::EmptyChunk(s.to_string()));
        }
        if chunk.contains('*') && chunk != "*" && chunk != "**" {
            return Err(KeyExprError::MisplacedWildcard(s.to_string()));
        }
    }
    Ok(())
}

fn chunk_matches(a: &str, b: &str) -> bool {
    a == b || a == "*" || b == "*"
}

fn includes_chunks(pattern: &[&str], key: &[&str]) -> bool {
    match (pattern.first(), key.first()) {
        (None, None) => true,
        (Some(&"**"), _) => {
            includes_chunks(&pattern[1..], key)
                || (!key.is_empty() && includes_chunks(pattern, &key[1..]))
        }
        (Some(p), Some(k)) => {
            (p == k || (*p == "*" && *k != "**")) && includes_chunks(&pattern[1..], &key[1..])
        }
        _ => false,
    }
}

fn intersects_chunks(left: &[&str], right: &[&str]) -> bool {
    match (left.first(), right.first()) {
        (None, None) => true,
        (Some(&"**"), _) => {
            intersects_chunks(&left[1..], right)
                || (!right.is_empty() && intersects_chunks(left, &right[1..]))
        }
        (_, Some(&"**")) => {
            intersects_chunks(left, &right[1..])
                || (!left.is_empty() && intersects_chunks(&left[1..], right))
        }
        (Some(l), Some(r)) => chunk_matches(l, r) && intersects_chunks(&left[1..], &right[1..]),
        _ => false,
    }
}
