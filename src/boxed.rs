//! Conversion helper for the `Box<str>` payloads used in error variants.

/// Extension trait converting string-like values into `Box<str>` without
/// clutter at the call site.
pub trait BoxedStr {
    fn boxed(self) -> Box<str>;
}

impl BoxedStr for String {
    fn boxed(self) -> Box<str> {
        self.into_boxed_str()
    }
}

impl BoxedStr for &str {
    fn boxed(self) -> Box<str> {
        self.into()
    }
}
