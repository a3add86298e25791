//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub`;
//! `LinkId` and `NodeId` double as direct indices into the network's
//! link/node arrays via `.index()`.
//!
//! On the wire (feature `serde`) every id is a decimal string, because the
//! optimizer treats ids as opaque strings.  Plain JSON integers are accepted
//! on input as well.

use std::fmt;
use std::str::FromStr;

/// Generate a typed ID wrapper around `u32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub u32);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            #[inline(always)]
            fn from(raw: u32) -> $name {
                $name(raw)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;
            fn from_str(s: &str) -> Result<$name, Self::Err> {
                s.trim().parse::<u32>().map($name)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<$name, D::Error> {
                deserializer.deserialize_any(wire::IdVisitor::<$name>::new())
            }
        }
    };
}

typed_id! {
    /// Identity of a fleet vehicle.
    pub struct VehicleId;
}

typed_id! {
    /// Identity of a passenger request.
    pub struct RequestId;
}

typed_id! {
    /// Index of a directed network link.
    pub struct LinkId;
}

typed_id! {
    /// Index of a network node.
    pub struct NodeId;
}

#[cfg(feature = "serde")]
mod wire {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{self, Unexpected, Visitor};

    /// Accepts `"42"` and `42` alike.
    pub(super) struct IdVisitor<T>(PhantomData<T>);

    impl<T> IdVisitor<T> {
        pub(super) fn new() -> Self {
            Self(PhantomData)
        }
    }

    impl<'de, T: From<u32>> Visitor<'de> for IdVisitor<T> {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an id as a decimal string or unsigned integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            v.trim()
                .parse::<u32>()
                .map(T::from)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            u32::try_from(v)
                .map(T::from)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }
    }
}
