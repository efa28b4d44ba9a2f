pub(crate) type ListenerKey = slotmap::DefaultKey;

/// Buffered event storage with one read cursor per listener.
///
/// Cursors are indices into `events`; the smallest cursor marks how much of the
/// buffer is still needed.
#[derive(Debug)]
pub struct Queue<T> {
    pub(crate) listeners: slotmap::SlotMap<ListenerKey, usize>,
    pub(crate) events: Vec<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self { listeners: Default::default(), events: Vec::new() }
    }
}

impl<T> Queue<T> {
    /// Create a new event queue
    pub fn new() -> Self {
        Default::default()
    }

    /// Removes all events that have been already seen by all listeners
    fn cleanup(&mut self) {
        let min_idx = match self.listeners.values().min() {
            Some(&idx) => idx,
            None => self.events.len(),
        };
        if min_idx == 0 {
            return;
        }

        for idx in self.listeners.values_mut() {
            *idx -= min_idx;
        }

        self.events.drain(0..min_idx);
    }

    /// Buffers `x` for every current listener.
    ///
    /// Returns `false` (and drops the event) if nobody is listening.
    pub fn push(&mut self, x: T) -> bool {
        if self.listeners.is_empty() {
            return false;
        }
        self.events.push(x);
        true
    }

    /// Creates a subscription starting after the last buffered event
    pub fn create_listener(&mut self) -> ListenerKey {
        let maxidx = self.events.len();
        self.listeners.insert(maxidx)
    }

    /// Removes a subscription
    pub fn remove_listener(&mut self, key: ListenerKey) {
        // oldidx != 0 --> this is not a blocker
        if self.listeners.remove(key) == Some(0) || self.listeners.is_empty() {
            self.cleanup();
        }
    }

    /// Number of live subscriptions
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Moves the cursor of `key` to the end, returning where it was.
    /// Unknown keys behave like an up-to-date listener.
    fn pull(&mut self, key: ListenerKey) -> usize {
        let maxidx = self.events.len();
        match self.listeners.get_mut(key) {
            Some(idx) => std::mem::replace(idx, maxidx),
            None => maxidx,
        }
    }

    /// Applies a function to the list of new events since last `pull_with`
    #[inline]
    pub fn pull_with<F, R>(&mut self, key: ListenerKey, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        let idx = self.pull(key);
        let ret = f(&self.events[idx..]);
        if idx == 0 {
            // this was a blocker
            self.cleanup();
        }
        ret
    }

    #[cfg(test)]
    #[inline]
    pub(crate) fn event_len(&self) -> usize {
        self.events.len()
    }
}

impl<A> std::iter::Extend<A> for Queue<A> {
    #[inline]
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = A>,
    {
        if !self.listeners.is_empty() {
            self.events.extend(iter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Queue;

    #[test]
    fn test_unheard_events_are_dropped() {
        let mut queue = Queue::new();
        assert!(!queue.push("lost"));
        assert_eq!(queue.event_len(), 0);

        let listener = queue.create_listener();
        assert!(queue.push("kept"));
        queue.pull_with(listener, |x| assert_eq!(x, &["kept"]));
    }

    #[test]
    fn test_event_cleanup() {
        let mut queue = Queue::new();

        let overlay = queue.create_listener();

        queue.push(10i32);

        assert_eq!(queue.event_len(), 1);

        let page = queue.create_listener();

        queue.push(20i32);

        queue.pull_with(overlay, |x| assert_eq!(x, &[10i32, 20i32]));
        queue.pull_with(page, |x| assert_eq!(x, &[20i32]));
        queue.pull_with(page, |x| assert!(x.is_empty()));

        assert_eq!(queue.event_len(), 0);

        queue.extend(std::iter::repeat(30i32).take(10));

        queue.pull_with(page, |x| assert_eq!(x, &[30i32; 10]));

        queue.remove_listener(overlay);

        assert_eq!(queue.event_len(), 0);
        assert_eq!(queue.listener_count(), 1);
    }

    #[test]
    fn test_last_listener_removal_clears_buffer() {
        let mut queue = Queue::new();
        let listener = queue.create_listener();
        queue.push(1u8);
        queue.push(2u8);
        queue.pull_with(listener, |_| ());
        queue.push(3u8);
        queue.remove_listener(listener);
        assert_eq!(queue.event_len(), 0);
    }
}
