use std::fmt::{Display, Formatter, Result as FmtResult};

/// Preservation and access flags written on a `<file>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileAttributes {
    /// Keep the file in preservation storage.
    #[cfg_attr(feature = "serde", serde(with = "yes_no"))]
    pub preserve: bool,
    /// Publish the file's metadata.
    #[cfg_attr(feature = "serde", serde(with = "yes_no"))]
    pub publish: bool,
    /// Make the file available for delivery.
    #[cfg_attr(feature = "serde", serde(with = "yes_no"))]
    pub shelve: bool,
}
impl FileAttributes {
    pub const fn new(preserve: bool, publish: bool, shelve: bool) -> Self {
        Self { preserve, publish, shelve }
    }

    /// The `(name, "yes"|"no")` pairs in document order.
    pub fn pairs(&self) -> [(&'static str, &'static str); 3] {
        [
            ("preserve", as_yes_no(self.preserve)),
            ("publish", as_yes_no(self.publish)),
            ("shelve", as_yes_no(self.shelve)),
        ]
    }
}
impl Display for FileAttributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let [(_, preserve), (_, publish), (_, shelve)] = self.pairs();
        write!(f, "preserve={preserve} publish={publish} shelve={shelve}")
    }
}

pub(crate) fn as_yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Accepts `"yes"`/`"no"` (any case) or plain booleans; always writes
/// `"yes"`/`"no"`.
#[cfg(feature = "serde")]
mod yes_no {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub(super) fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::as_yes_no(*value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Text(s) => match s.trim().to_lowercase().as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" => Ok(false),
                _ => Err(D::Error::invalid_value(Unexpected::Str(&s), &"\"yes\" or \"no\"")),
            },
        }
    }
}
