//! Fixed-width integer key encodings.
//!
//! [`int_to_key`] produces little-endian keys: equal integers always give
//! equal keys, but the engine orders keys bytewise, so iteration over
//! little-endian keys is *not* numeric order once values exceed one byte.
//! Use [`ordered_key`] when numeric iteration order matters.
//!
//! Integers of 32 bits or fewer encode to 4 bytes; 64-bit integers (and
//! `usize`/`isize`) encode to 8 bytes.

mod sealed {
    pub trait Sealed {}
}

/// Integer types that can be turned into fixed-width keys.
///
/// Sealed; implemented for every primitive integer up to 64 bits.
pub trait IntKey: Copy + sealed::Sealed {
    /// The fixed-width key bytes, `[u8; 4]` or `[u8; 8]`.
    type Key: AsRef<[u8]> + Copy + Eq + std::fmt::Debug;

    /// Little-endian encoding.
    fn to_le_key(self) -> Self::Key;

    /// Big-endian encoding with the sign bit flipped for signed types, so
    /// bytewise order equals numeric order.
    fn to_ordered_key(self) -> Self::Key;
}

macro_rules! impl_unsigned_key {
    ($wide:ty, $len:expr => $($t:ty),+) => {$(
        impl sealed::Sealed for $t {}

        impl IntKey for $t {
            type Key = [u8; $len];

            #[inline]
            fn to_le_key(self) -> Self::Key {
                (self as $wide).to_le_bytes()
            }

            #[inline]
            fn to_ordered_key(self) -> Self::Key {
                (self as $wide).to_be_bytes()
            }
        }
    )+};
}

macro_rules! impl_signed_key {
    ($wide:ty, $unsigned:ty, $len:expr => $($t:ty),+) => {$(
        impl sealed::Sealed for $t {}

        impl IntKey for $t {
            type Key = [u8; $len];

            #[inline]
            fn to_le_key(self) -> Self::Key {
                (self as $wide).to_le_bytes()
            }

            #[inline]
            fn to_ordered_key(self) -> Self::Key {
                let flipped = (self as $wide as $unsigned) ^ (1 << (<$unsigned>::BITS - 1));
                flipped.to_be_bytes()
            }
        }
    )+};
}

impl_unsigned_key!(u32, 4 => u8, u16, u32);
impl_unsigned_key!(u64, 8 => u64, usize);
impl_signed_key!(i32, u32, 4 => i8, i16, i32);
impl_signed_key!(i64, u64, 8 => i64, isize);

/// Encodes an integer as a fixed-width little-endian key.
///
/// ```
/// use boltnut_core::int_to_key;
///
/// assert_eq!(int_to_key(1u64), [1, 0, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(int_to_key(258i32), [2, 1, 0, 0]);
/// ```
#[must_use]
pub fn int_to_key<T: IntKey>(n: T) -> T::Key {
    n.to_le_key()
}

/// Encodes an integer as a fixed-width key whose byte order is numeric order.
///
/// ```
/// use boltnut_core::ordered_key;
///
/// assert!(ordered_key(-1i64) < ordered_key(0i64));
/// assert!(ordered_key(255u32) < ordered_key(256u32));
/// ```
#[must_use]
pub fn ordered_key<T: IntKey>(n: T) -> T::Key {
    n.to_ordered_key()
}

/// Decodes an 8-byte little-endian key back into a `u64`.
///
/// Returns `None` if `key` is not exactly 8 bytes long.
#[must_use]
pub fn key_to_u64(key: &[u8]) -> Option<u64> {
    key.try_into().ok().map(u64::from_le_bytes)
}

/// Decodes an 8-byte little-endian key back into an `i64`.
///
/// Returns `None` if `key` is not exactly 8 bytes long.
#[must_use]
pub fn key_to_i64(key: &[u8]) -> Option<i64> {
    key.try_into().ok().map(i64::from_le_bytes)
}
