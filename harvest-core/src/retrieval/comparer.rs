//! Equality used for uniqueness checks, chosen when a list is built.

use std::borrow::Cow;
use std::sync::Arc;

/// Decides whether two values count as the same item.
pub trait ValueComparer<T: ?Sized>: Send + Sync {
    /// `true` if `a` and `b` are duplicates.
    fn same(&self, a: &T, b: &T) -> bool;
}

/// Plain `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueEq;

impl<T: PartialEq + ?Sized> ValueComparer<T> for ValueEq {
    fn same(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Text comparison, optionally ignoring case (full Unicode lowercasing).
#[derive(Debug, Clone, Copy, Default)]
pub struct TextComparer {
    ignore_case: bool,
}

impl TextComparer {
    /// A text comparer.
    #[must_use]
    pub const fn new(ignore_case: bool) -> Self {
        Self { ignore_case }
    }

    /// Whether case is ignored.
    #[must_use]
    pub const fn ignores_case(&self) -> bool {
        self.ignore_case
    }
}

impl<T: AsRef<str> + ?Sized> ValueComparer<T> for TextComparer {
    fn same(&self, a: &T, b: &T) -> bool {
        let (a, b) = (a.as_ref(), b.as_ref());
        if self.ignore_case {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        } else {
            a == b
        }
    }
}

/// Adapts a closure into a comparer.
pub struct FnComparer<F>(pub F);

impl<T: ?Sized, F> ValueComparer<T> for FnComparer<F>
where
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    fn same(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// Values a list can compare without a caller-supplied comparer.
///
/// Text types honour `ListConfig::ignore_case`. Every other type compares
/// with `PartialEq` and has no notion of case.
pub trait ListValue: Sized + 'static {
    /// Whether `ignore_case` means anything for this type.
    const TEXTUAL: bool;

    /// The comparer for a list whose config sets `ignore_case`.
    fn comparer(ignore_case: bool) -> Box<dyn ValueComparer<Self>>;
}

macro_rules! text_list_value {
    ($($ty:ty),* $(,)?) => {$(
        impl ListValue for $ty {
            const TEXTUAL: bool = true;

            fn comparer(ignore_case: bool) -> Box<dyn ValueComparer<Self>> {
                Box::new(TextComparer::new(ignore_case))
            }
        }
    )*};
}

macro_rules! plain_list_value {
    ($($ty:ty),* $(,)?) => {$(
        impl ListValue for $ty {
            const TEXTUAL: bool = false;

            fn comparer(_ignore_case: bool) -> Box<dyn ValueComparer<Self>> {
                Box::new(ValueEq)
            }
        }
    )*};
}

text_list_value!(String, &'static str, Box<str>, Arc<str>, Cow<'static, str>);
plain_list_value!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char
);
