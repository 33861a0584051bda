use std::borrow::Cow;
use std::fmt;

/// Token selecting one entity collection inside a store.
///
/// ```
/// use memoentity::EntitiesRef;
///
/// const UI_ENTITIES: EntitiesRef = EntitiesRef::new("UIEntities");
/// assert!(!UI_ENTITIES.is_default());
/// assert!(EntitiesRef::default().is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntitiesRef(Cow<'static, str>);

impl EntitiesRef {
    /// The store's primary collection.
    pub const DEFAULT: EntitiesRef = EntitiesRef(Cow::Borrowed("entities"));

    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Ref with a name only known at runtime.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for EntitiesRef {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for EntitiesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
