//! Shared byte buffers and buffered readers.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use crate::handle::{Loanable, Resource, self_loaned, self_loaned_mut};

/// A cheaply-cloneable, immutable byte buffer.
///
/// Cloning shares the underlying allocation; equality and hashing go by
/// contents. This is the payload currency of the whole API: samples,
/// queries and attachments all carry `Bytes`.
#[derive(Clone)]
pub struct Bytes {
    inner: Arc<[u8]>,
}

impl Bytes {
    /// An empty buffer.
    pub fn new() -> Self {
        Self {
            inner: Arc::from(&[][..]),
        }
    }

    /// Returns the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Returns the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns whether two buffers share the same allocation.
    ///
    /// Distinguishes an aliased clone from an equal copy.
    pub fn ptr_eq(a: &Bytes, b: &Bytes) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl Resource for Bytes {
    const KIND: &'static str = "bytes";
}

impl Loanable for Bytes {
    type Loaned = [u8];

    fn loaned(&self) -> &[u8] {
        &self.inner
    }
}

impl Default for Bytes {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Bytes {}

impl std::hash::Hash for Bytes {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl std::borrow::Borrow<[u8]> for Bytes {
    fn borrow(&self) -> &[u8] {
        &self.inner
    }
}

impl std::ops::Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self {
            inner: Arc::from(v.into_boxed_slice()),
        }
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Self {
            inner: Arc::from(v),
        }
    }
}

impl<const N: usize> From<&[u8; N]> for Bytes {
    fn from(v: &[u8; N]) -> Self {
        Self {
            inner: Arc::from(&v[..]),
        }
    }
}

impl From<String> for Bytes {
    fn from(v: String) -> Self {
        v.into_bytes().into()
    }
}

impl From<&str> for Bytes {
    fn from(v: &str) -> Self {
        v.as_bytes().into()
    }
}

impl std::fmt::Debug for Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bytes({} bytes)", self.len())
    }
}

/// A positioned reader over a [`Bytes`] buffer.
///
/// Mutable-loan-capable: reading advances the position, so the read surface
/// goes through `loan_mut`. Implements [`std::io::Read`] and
/// [`std::io::Seek`].
#[derive(Clone, Debug)]
pub struct BytesReader {
    data: Bytes,
    pos: usize,
}

impl BytesReader {
    /// Starts reading `data` from the beginning.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl Resource for BytesReader {
    const KIND: &'static str = "bytes_reader";
}

self_loaned!(BytesReader);
self_loaned_mut!(BytesReader);

impl Read for BytesReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = &self.data.as_slice()[self.pos.min(self.data.len())..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for BytesReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.data.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of buffer",
            ));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Owned;

    #[test]
    fn clones_alias_the_allocation() {
        let original = Bytes::from("payload");
        let alias = original.clone();
        let copy = Bytes::from("payload");

        assert_eq!(original, alias);
        assert_eq!(original, copy);
        assert!(Bytes::ptr_eq(&original, &alias));
        assert!(!Bytes::ptr_eq(&original, &copy));
    }

    #[test]
    fn owned_handle_loans_the_slice() {
        let handle = Owned::new(Bytes::from(&[1u8, 2, 3]));
        assert_eq!(handle.loan(), &[1, 2, 3]);
        assert!(handle.check());
    }

    #[test]
    fn reader_reads_in_order() {
        let mut reader = BytesReader::new(Bytes::from(&[1u8, 2, 3, 4, 5]));
        let mut buf = [0u8; 2];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(reader.remaining(), 3);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, [3, 4, 5]);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn reader_seeks_relative_and_absolute() {
        let mut reader = BytesReader::new(Bytes::from(&[10u8, 20, 30, 40]));
        reader.seek(SeekFrom::Start(2)).unwrap();
        let mut buf = [0u8; 1];
        reader.read(&mut buf).unwrap();
        assert_eq!(buf[0], 30);

        reader.seek(SeekFrom::Current(-2)).unwrap();
        reader.read(&mut buf).unwrap();
        assert_eq!(buf[0], 20);

        reader.seek(SeekFrom::End(-1)).unwrap();
        reader.read(&mut buf).unwrap();
        assert_eq!(buf[0], 40);

        assert!(reader.seek(SeekFrom::Current(-100)).is_err());
    }

    #[test]
    fn reader_is_mutable_loan_capable() {
        let mut handle = Owned::new(BytesReader::new(Bytes::from("ab")));
        let mut buf = [0u8; 1];
        handle.loan_mut().read(&mut buf).unwrap();
        assert_eq!(buf[0], b'a');
        // A later mutable loan observes the advanced position.
        assert_eq!(handle.loan_mut().position(), 1);
    }
}
