//! Validation and the required-value policy.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    path::{Path, PathBuf},
};

/// Message shown when a required prompt is submitted empty.
pub const REQUIRED_MESSAGE: &str = "Value is required! Please enter a value.";

/// Whether a value counts as "nothing entered" for the required policy.
///
/// Booleans are never empty. Numbers are empty only when zero.
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

impl IsEmpty for str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for Path {
    fn is_empty_value(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl IsEmpty for PathBuf {
    fn is_empty_value(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl IsEmpty for bool {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl<T> IsEmpty for [T] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> IsEmpty for HashMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> IsEmpty for HashSet<T, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for BTreeSet<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl<T: IsEmpty + ?Sized> IsEmpty for &T {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: IsEmpty + ?Sized> IsEmpty for Box<T> {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

macro_rules! impl_is_empty_for_int {
    ($($t:ty),*) => {
        $(impl IsEmpty for $t {
            fn is_empty_value(&self) -> bool {
                *self == 0
            }
        })*
    };
}

impl_is_empty_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[allow(clippy::float_cmp)]
impl IsEmpty for f32 {
    fn is_empty_value(&self) -> bool {
        *self == 0.0
    }
}

#[allow(clippy::float_cmp)]
impl IsEmpty for f64 {
    fn is_empty_value(&self) -> bool {
        *self == 0.0
    }
}

/// A user validation callback. `Err` carries the message to display.
pub type Validator<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

/// Required flag plus an optional validator, checked on Enter.
pub struct Validation<V> {
    required: bool,
    validator: Option<Validator<V>>,
}

impl<V> Default for Validation<V> {
    fn default() -> Self {
        Self {
            required: false,
            validator: None,
        }
    }
}

impl<V> Validation<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_validator<F>(&mut self, validator: F)
    where
        F: Fn(&V) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl<V: IsEmpty> Validation<V> {
    /// Applies the required policy first, then the validator.
    pub fn check(&self, value: &V) -> Result<(), String> {
        if self.required && value.is_empty_value() {
            return Err(REQUIRED_MESSAGE.to_string());
        }

        self.validator.as_ref().map_or(Ok(()), |validate| validate(value))
    }
}
