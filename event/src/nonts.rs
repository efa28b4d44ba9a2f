use crate::*;
use std::{cell::RefCell, ops::Deref, rc::Rc};

type Intern<T> = Rc<RefCell<RawEventQueue<T>>>;

/// Non-thread-safe queue shared by `Rc`; listeners unsubscribe on drop.
#[derive(Debug)]
pub struct Queue<T>(pub Intern<T>);

impl<T> Queue<T> {
    #[inline]
    pub fn new() -> Self {
        Queue(Default::default())
    }

    /// Buffers `event` for every listener, returning whether anyone was listening.
    #[inline]
    pub fn push(&self, event: T) -> bool {
        self.0.borrow_mut().push(event)
    }

    /// Number of live listeners
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.0.borrow().listener_count()
    }
}

impl<T> Default for Queue<T> {
    #[inline]
    fn default() -> Self {
        Queue(Default::default())
    }
}

impl<T> Clone for Queue<T> {
    #[inline]
    fn clone(&self) -> Self {
        Queue(self.0.clone())
    }
}

impl<T> Deref for Queue<T> {
    type Target = Intern<T>;

    #[inline]
    fn deref(&self) -> &Intern<T> {
        &self.0
    }
}

impl<T> Emitter for Queue<T> {
    type Item = T;

    #[inline]
    fn emit_owned(&self, event: T) -> EmitResult<T> {
        let mut inner = self.0.borrow_mut();
        if inner.listener_count() == 0 {
            return EmitResult::Undelivered(event);
        }
        inner.push(event);
        EmitResult::Delivered
    }
}

impl<T> QueueInterfaceListable for Queue<T> {
    type Listener = Listener<T>;

    #[inline]
    fn listen(&self) -> Listener<T> {
        Listener::new(self.0.clone())
    }
}

#[derive(Debug)]
pub struct Listener<T>(ListenerKey, Intern<T>);

impl<T> Listen for Listener<T> {
    type Item = T;

    #[inline]
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Self::Item]) -> R,
    {
        self.1.borrow_mut().pull_with(self.0, f)
    }
}

impl<T> Drop for Listener<T> {
    fn drop(&mut self) {
        self.1.borrow_mut().remove_listener(self.0)
    }
}

impl<T> Listener<T> {
    fn new(event: Intern<T>) -> Self {
        let id = event.borrow_mut().create_listener();
        Listener(id, event)
    }
}
