use alloc::{collections::VecDeque, vec::Vec};
use core::any::type_name;

use crate::{
    any::Object,
    errors::InstantiateErrorKind,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

/// Positional arguments for constructors, factories, methods and protected factories.
///
/// The container fills autowired slots and merges caller-supplied values in between.
/// An empty slot stands for an optional parameter that nothing was supplied for.
/// Accessors consume slots left to right.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    slots: VecDeque<Option<Object>>,
    position: usize,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            position: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn with<T: SendSafety + SyncSafety + 'static>(mut self, value: T) -> Self {
        self.push(Object::new(value));
        self
    }

    #[inline]
    pub fn push(&mut self, value: Object) {
        self.slots.push_back(Some(value));
    }

    #[inline]
    pub(crate) fn push_empty(&mut self) {
        self.slots.push_back(None);
    }

    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<Option<Object>> {
        self.slots.pop_front()
    }

    #[inline]
    pub(crate) fn append(&mut self, mut other: Arguments) {
        self.slots.append(&mut other.slots);
    }

    /// Number of slots not consumed yet.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Takes the next slot as a raw object.
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if there are no slots left or the slot is empty.
    pub fn next_object(&mut self) -> Result<Object, InstantiateErrorKind> {
        let position = self.position;
        self.next_object_optional()?
            .ok_or(InstantiateErrorKind::MissingArgument { position })
    }

    /// Takes the next slot as a raw object, `None` for an empty or missing slot.
    #[allow(clippy::unnecessary_wraps)]
    pub fn next_object_optional(&mut self) -> Result<Option<Object>, InstantiateErrorKind> {
        self.position += 1;
        Ok(self.slots.pop_front().flatten())
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if the slot is missing or empty
    /// - Returns [`InstantiateErrorKind::IncorrectArgument`] if the slot holds another type
    pub fn next<T: SendSafety + SyncSafety + 'static>(&mut self) -> Result<RcThreadSafety<T>, InstantiateErrorKind> {
        let position = self.position;
        let object = self.next_object()?;
        downcast(&object, position)
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::IncorrectArgument`] if the slot holds another type
    pub fn next_optional<T: SendSafety + SyncSafety + 'static>(&mut self) -> Result<Option<RcThreadSafety<T>>, InstantiateErrorKind> {
        let position = self.position;
        match self.next_object_optional()? {
            Some(object) => downcast(&object, position).map(Some),
            None => Ok(None),
        }
    }

    /// Same as [`Self::next`], but clones the value out, handy for primitives.
    ///
    /// # Errors
    /// See [`Self::next`]
    pub fn next_value<T: Clone + 'static>(&mut self) -> Result<T, InstantiateErrorKind> {
        let position = self.position;
        let object = self.next_object()?;
        value(&object, position)
    }

    /// # Errors
    /// See [`Self::next_optional`]
    pub fn next_optional_value<T: Clone + 'static>(&mut self) -> Result<Option<T>, InstantiateErrorKind> {
        let position = self.position;
        match self.next_object_optional()? {
            Some(object) => value(&object, position).map(Some),
            None => Ok(None),
        }
    }
}

fn downcast<T: SendSafety + SyncSafety + 'static>(object: &Object, position: usize) -> Result<RcThreadSafety<T>, InstantiateErrorKind> {
    object.downcast().ok_or(InstantiateErrorKind::IncorrectArgument {
        position,
        expected: type_name::<T>(),
        actual: object.type_info().name,
    })
}

fn value<T: Clone + 'static>(object: &Object, position: usize) -> Result<T, InstantiateErrorKind> {
    object.downcast_ref::<T>().cloned().ok_or(InstantiateErrorKind::IncorrectArgument {
        position,
        expected: type_name::<T>(),
        actual: object.type_info().name,
    })
}

impl From<Vec<Object>> for Arguments {
    fn from(values: Vec<Object>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
            position: 0,
        }
    }
}

impl FromIterator<Object> for Arguments {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Some).collect(),
            position: 0,
        }
    }
}

/// Builds [`Arguments`] from a list of values.
///
/// # Examples
/// ```rust
/// use illusion::args;
///
/// let mut arguments = args![2i64, "two"];
/// assert_eq!(arguments.next_value::<i64>().unwrap(), 2);
/// assert_eq!(arguments.next_value::<&str>().unwrap(), "two");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Arguments::new()
    };
    ($($val:expr),+ $(,)?) => {
        $crate::Arguments::new()$(.with($val))+
    };
}
