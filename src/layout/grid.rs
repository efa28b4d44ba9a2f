use {
    dashr_ui_core::{
        display::{Point, Rect, Size},
        tree::{NodeCx, NodeId, UiTree, Widget},
    },
    std::collections::HashMap,
};

/// Cell origin and span of a grid child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPlacement {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl GridPlacement {
    pub fn cell(row: usize, col: usize) -> Self {
        GridPlacement { row, col, row_span: 1, col_span: 1 }
    }

    pub fn spanning(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        GridPlacement { row, col, row_span, col_span }
    }

    fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.row..self.row + self.row_span)
            .flat_map(move |r| (self.col..self.col + self.col_span).map(move |c| (r, c)))
    }
}

/// Fixed rows x columns of uniform cells; children may span several cells.
#[derive(Debug, Clone)]
pub struct GridLayout {
    rows: usize,
    cols: usize,
    pub spacing: f32,
    pub padding: f32,
    cells: Vec<Option<NodeId>>,
    placements: HashMap<NodeId, GridPlacement>,
}

impl GridLayout {
    pub fn new(rows: usize, cols: usize) -> Self {
        GridLayout {
            rows,
            cols,
            spacing: 0.0,
            padding: 0.0,
            cells: vec![None; rows * cols],
            placements: HashMap::new(),
        }
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Occupant of a cell; spanning children occupy every covered cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<NodeId> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    pub fn placement(&self, child: NodeId) -> Option<GridPlacement> {
        self.placements.get(&child).copied()
    }

    /// Whether `child` could be placed at `placement`. Cells held by `child`
    /// itself count as free.
    pub fn can_place(&self, placement: GridPlacement, child: NodeId) -> bool {
        placement.row_span > 0
            && placement.col_span > 0
            && placement.row + placement.row_span <= self.rows
            && placement.col + placement.col_span <= self.cols
            && placement.cells().all(|(r, c)| self.cell(r, c).map_or(true, |occupant| occupant == child))
    }

    /// Size of a single cell for a container of `size`, floored to whole pixels.
    pub fn cell_size(&self, size: Size) -> Size {
        let axis = |available: f32, count: usize| {
            if count == 0 {
                return 0.0;
            }
            let gaps = self.spacing * (count - 1) as f32;
            ((available - self.padding * 2.0 - gaps) / count as f32).floor().max(0.0)
        };
        Size::new(axis(size.width, self.cols), axis(size.height, self.rows))
    }

    /// Geometry of `placement` relative to the container.
    pub fn placement_rect(&self, size: Size, placement: GridPlacement) -> Rect {
        let cell = self.cell_size(size);
        let span = |cell: f32, count: usize| cell * count as f32 + self.spacing * (count as f32 - 1.0);
        Rect::new(
            Point::new(
                self.padding + placement.col as f32 * (cell.width + self.spacing),
                self.padding + placement.row as f32 * (cell.height + self.spacing),
            ),
            Size::new(span(cell.width, placement.col_span), span(cell.height, placement.row_span)),
        )
    }

    /// Puts `child` into `grid` at `placement`.
    ///
    /// Returns `false` without changing anything when the placement is out of
    /// range or any target cell is taken.
    pub fn place(tree: &mut UiTree, grid: NodeId, child: NodeId, placement: GridPlacement) -> bool {
        match tree.widget::<GridLayout>(grid) {
            Some(layout) if layout.can_place(placement, child) && tree.contains(child) => {}
            _ => return false,
        }
        if !tree.add_child(grid, child) {
            return false;
        }
        tree.modify(grid, |layout: &mut GridLayout| {
            for (r, c) in placement.cells() {
                layout.cells[r * layout.cols + c] = Some(child);
            }
            layout.placements.insert(child, placement);
        })
        .is_some()
    }

    /// Detaches whatever occupies `(row, col)`, freeing all of its cells.
    pub fn remove_at(tree: &mut UiTree, grid: NodeId, row: usize, col: usize) -> Option<NodeId> {
        let child = tree.widget::<GridLayout>(grid)?.cell(row, col)?;
        tree.remove_child(grid, child);
        Some(child)
    }
}

impl Widget for GridLayout {
    fn arrange(&mut self, cx: &mut NodeCx<'_>) {
        let size = cx.rect().size;
        for child in cx.children() {
            if let Some(placement) = self.placement(child) {
                cx.place(child, self.placement_rect(size, placement));
            }
        }
    }

    fn child_removed(&mut self, child: NodeId) {
        if self.placements.remove(&child).is_some() {
            for cell in self.cells.iter_mut().filter(|cell| **cell == Some(child)) {
                *cell = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, dashr_ui_core::tree::Container};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    fn child(tree: &mut UiTree) -> NodeId {
        tree.insert(Container, rect(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn test_uniform_cells() {
        let mut tree = UiTree::new();
        let grid = tree.insert(GridLayout::new(2, 2), rect(0.0, 0.0, 200.0, 200.0));
        let cells: Vec<_> = (0..4).map(|_| child(&mut tree)).collect();
        for (i, &c) in cells.iter().enumerate() {
            assert!(GridLayout::place(&mut tree, grid, c, GridPlacement::cell(i / 2, i % 2)));
        }
        assert_eq!(tree.rect(cells[0]), Some(rect(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(tree.rect(cells[3]), Some(rect(100.0, 100.0, 100.0, 100.0)));
    }

    #[test]
    fn test_span_absorbs_gaps() {
        let mut tree = UiTree::new();
        let grid = tree.insert(GridLayout::new(2, 2), rect(0.0, 0.0, 200.0, 200.0));
        let wide = child(&mut tree);
        assert!(GridLayout::place(&mut tree, grid, wide, GridPlacement::spanning(0, 0, 1, 2)));
        assert_eq!(tree.rect(wide), Some(rect(0.0, 0.0, 200.0, 100.0)));

        let mut tree = UiTree::new();
        let grid = tree.insert(GridLayout::new(2, 2).with_spacing(10.0), rect(0.0, 0.0, 210.0, 210.0));
        let wide = child(&mut tree);
        let below = child(&mut tree);
        assert!(GridLayout::place(&mut tree, grid, wide, GridPlacement::spanning(0, 0, 1, 2)));
        assert!(GridLayout::place(&mut tree, grid, below, GridPlacement::cell(1, 1)));
        assert_eq!(tree.rect(wide), Some(rect(0.0, 0.0, 210.0, 100.0)));
        assert_eq!(tree.rect(below), Some(rect(110.0, 110.0, 100.0, 100.0)));
    }

    #[test]
    fn test_rejected_placements_change_nothing() {
        let mut tree = UiTree::new();
        let grid = tree.insert(GridLayout::new(2, 3).with_padding(4.0), rect(0.0, 0.0, 100.0, 100.0));
        let a = child(&mut tree);
        let b = child(&mut tree);
        assert!(GridLayout::place(&mut tree, grid, a, GridPlacement::spanning(0, 1, 2, 1)));

        assert!(!GridLayout::place(&mut tree, grid, b, GridPlacement::cell(1, 1)));
        assert!(!GridLayout::place(&mut tree, grid, b, GridPlacement::cell(2, 0)));
        assert!(!GridLayout::place(&mut tree, grid, b, GridPlacement::spanning(0, 2, 1, 2)));
        assert!(!GridLayout::place(&mut tree, grid, b, GridPlacement::spanning(0, 0, 0, 1)));
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.children(grid), &[a]);

        assert!(GridLayout::place(&mut tree, grid, b, GridPlacement::cell(1, 2)));
    }

    #[test]
    fn test_remove_frees_every_spanned_cell() {
        let mut tree = UiTree::new();
        let grid = tree.insert(GridLayout::new(3, 3), rect(0.0, 0.0, 90.0, 90.0));
        let big = child(&mut tree);
        assert!(GridLayout::place(&mut tree, grid, big, GridPlacement::spanning(1, 1, 2, 2)));
        let layout = tree.widget::<GridLayout>(grid).unwrap();
        assert_eq!(layout.cell(2, 2), Some(big));
        assert_eq!(layout.cell(0, 0), None);

        assert_eq!(GridLayout::remove_at(&mut tree, grid, 2, 1), Some(big));
        let layout = tree.widget::<GridLayout>(grid).unwrap();
        assert!((0..3).all(|r| (0..3).all(|c| layout.cell(r, c).is_none())));
        assert_eq!(layout.placement(big), None);
        assert_eq!(GridLayout::remove_at(&mut tree, grid, 2, 1), None);
    }

    #[test]
    fn test_replacing_within_grid() {
        let mut tree = UiTree::new();
        let grid = tree.insert(GridLayout::new(1, 2), rect(0.0, 0.0, 100.0, 50.0));
        let a = child(&mut tree);
        assert!(GridLayout::place(&mut tree, grid, a, GridPlacement::cell(0, 0)));
        assert!(GridLayout::place(&mut tree, grid, a, GridPlacement::spanning(0, 0, 1, 2)));
        assert_eq!(tree.rect(a), Some(rect(0.0, 0.0, 100.0, 50.0)));
    }
}
