//! Newtype wrappers for string identifiers.
//!
//! Newtypes serialize/deserialize as plain strings so they can sit directly in
//! registry JSON documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Content digest of a registry blob, in `algorithm:hex` form.
    ///
    /// Equality is exact string equality. An empty digest means "absent",
    /// which is how a manifest without a config blob decodes.
    Digest
);

impl Digest {
    /// The part before the first `:`, or the whole digest if there is none.
    pub fn algorithm(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(algo, _)| algo)
    }

    /// The part after the first `:`, or an empty string if there is none.
    pub fn hex(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, hex)| hex)
    }

    /// Filesystem-safe token: every `:` replaced with `-`, nothing else changed.
    pub fn to_filename(&self) -> String {
        self.0.replace(':', "-")
    }
}
