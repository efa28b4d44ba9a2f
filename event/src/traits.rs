/// `EmitResult` indicates the success or failure of an `event emit`.
/// * `Delivered` means the event was buffered for at least one listener.
/// * `Undelivered` means nobody was listening; the event is handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitResult<T> {
    Delivered,
    Undelivered(T),
}

impl<T> EmitResult<T> {
    /// Returns true if the result is `Delivered`, otherwise false.
    pub fn was_delivered(&self) -> bool {
        matches!(self, EmitResult::Delivered)
    }

    /// Returns true if the result is `Undelivered`, otherwise false.
    pub fn was_undelivered(&self) -> bool {
        !self.was_delivered()
    }

    /// Converts this `EmitResult` into `std::result::Result`.
    pub fn into_result(self) -> Result<(), T> {
        self.into()
    }
}

impl<T> From<EmitResult<T>> for Result<(), T> {
    fn from(result: EmitResult<T>) -> Self {
        match result {
            EmitResult::Delivered => Ok(()),
            EmitResult::Undelivered(x) => Err(x),
        }
    }
}

/// Queues that accept events through a shared reference.
pub trait Emitter {
    type Item;

    /// Pushes/emits an event
    fn emit_owned(&self, event: Self::Item) -> EmitResult<Self::Item>;

    /// Pushes/emits a clone of `event`
    #[inline]
    fn emit_borrowed(&self, event: &Self::Item) -> EmitResult<Self::Item>
    where
        Self::Item: Clone,
    {
        self.emit_owned(event.clone())
    }
}

/// Event queues with the ability to create new listeners implement this trait
pub trait QueueInterfaceListable: Emitter {
    type Listener: Listen<Item = Self::Item>;

    /// Returns a handle to a new listener
    fn listen(&self) -> Self::Listener;
}

pub trait Listen {
    type Item;

    /// Applies a function to the list of new events since last `with` or `peek`
    /// without cloning T
    ///
    /// It holds a borrow on the queue while called, which means that emitting
    /// into the same queue from `f` will panic.
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Self::Item]) -> R;

    /// Applies a function to each new event since last `with` or `peek`
    #[inline]
    fn map<F, R>(&self, mut f: F) -> Vec<R>
    where
        F: FnMut(&Self::Item) -> R,
    {
        self.with(|slc| slc.iter().map(|i| f(i)).collect())
    }

    /// Returns a list of new events since last `peek`
    #[inline]
    fn peek(&self) -> Vec<Self::Item>
    where
        Self::Item: Clone,
    {
        self.with(<[Self::Item]>::to_vec)
    }
}
