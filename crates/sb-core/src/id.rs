use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by all identifier kinds.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Process-wide counter backing `fresh` id generation.
static FRESH_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_fresh(prefix: &str) -> Spur {
    let n = FRESH_COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

macro_rules! interned_id {
    ($(#[$doc:meta])* $name:ident, $sigil:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string, or return the existing id if already interned.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($sigil, "{}"), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a single canvas node. Globally unique and immutable
    /// once minted; an interned `Spur` index — 4 bytes, `Copy`, O(1) Eq/Hash.
    NodeId,
    "#"
);

interned_id!(
    /// Identifier of a screen within a project.
    ScreenId,
    "$"
);

interned_id!(
    /// A component-type tag from the palette (e.g. `button`, `container`).
    /// What a tag *means* (container or leaf) is the catalog's business.
    ComponentTag,
    "<"
);

impl NodeId {
    /// Mint a unique id with a type prefix, e.g. `button_17`.
    /// Fresh ids never collide within a process.
    pub fn fresh(prefix: &str) -> Self {
        Self(next_fresh(prefix))
    }
}

impl ScreenId {
    /// Mint a unique screen id.
    pub fn fresh() -> Self {
        Self(next_fresh("screen"))
    }
}
