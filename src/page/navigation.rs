use {super::PageManager, dashr_ui_core::tree::UiTree};

/// LIFO page history layered over a [`PageManager`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStack {
    history: Vec<String>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Default::default()
    }

    /// Remembers the current page and switches to `id`.
    pub fn push(&mut self, pages: &mut PageManager, tree: &mut UiTree, id: &str, immediate: bool) -> bool {
        if pages.get(id).is_none() {
            return false;
        }
        if let Some(current) = pages.current_id() {
            if current != id {
                self.history.push(current.to_owned());
            }
        }
        pages.set_current_page(tree, id, immediate)
    }

    /// Returns to the most recently pushed page.
    pub fn pop(&mut self, pages: &mut PageManager, tree: &mut UiTree, immediate: bool) -> bool {
        match self.history.pop() {
            Some(id) => pages.set_current_page(tree, &id, immediate),
            None => false,
        }
    }

    /// Unwinds to `id`. If it is not in the history, navigates to it directly.
    pub fn pop_to(&mut self, pages: &mut PageManager, tree: &mut UiTree, id: &str, immediate: bool) -> bool {
        while let Some(top) = self.history.last() {
            if top == id {
                return self.pop(pages, tree, immediate);
            }
            self.history.pop();
        }
        pages.set_current_page(tree, id, immediate)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}
