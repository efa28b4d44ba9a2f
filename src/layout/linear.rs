use {
    super::{align_cross, Align, Direction},
    dashr_ui_core::{
        display::Rect,
        tree::{NodeCx, NodeId, UiTree, Widget},
    },
    std::collections::HashMap,
};

/// Main-axis sizes for a single row/column.
///
/// `children` holds `(current main size, weight)`. Children with a weight of
/// zero or less keep their size; the rest share what is left after the fixed
/// children and the gaps, in proportion to their weight (truncated to whole
/// pixels). Nothing is shared when the total weight is zero.
pub fn linear_sizes(children: &[(f32, f32)], available: f32, spacing: f32) -> Vec<f32> {
    let gaps = spacing * children.len().saturating_sub(1) as f32;
    let fixed: f32 = children.iter().filter(|(_, w)| *w <= 0.0).map(|(size, _)| size).sum();
    let total_weight: f32 = children.iter().filter(|(_, w)| *w > 0.0).map(|(_, w)| w).sum();
    let remaining = (available - fixed - gaps).max(0.0);

    children
        .iter()
        .map(|&(size, weight)| {
            if weight <= 0.0 {
                size
            } else if total_weight > 0.0 {
                (remaining * weight / total_weight).trunc()
            } else {
                0.0
            }
        })
        .collect()
}

/// Stacks children along one axis.
#[derive(Debug, Clone)]
pub struct LinearLayout {
    pub direction: Direction,
    pub spacing: f32,
    pub padding: f32,
    pub align: Align,
    weights: HashMap<NodeId, f32>,
}

impl LinearLayout {
    pub fn new(direction: Direction) -> Self {
        LinearLayout { direction, spacing: 0.0, padding: 0.0, align: Align::Start, weights: HashMap::new() }
    }

    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Weight recorded for `child`; zero when none.
    pub fn weight(&self, child: NodeId) -> f32 {
        self.weights.get(&child).copied().unwrap_or(0.0)
    }

    /// Appends `child` to `layout` with the given weight.
    pub fn add(tree: &mut UiTree, layout: NodeId, child: NodeId, weight: f32) -> bool {
        tree.widget::<LinearLayout>(layout).is_some()
            && tree.add_child(layout, child)
            && Self::set_weight(tree, layout, child, weight)
    }

    /// Changes the weight of a child already in `layout`.
    pub fn set_weight(tree: &mut UiTree, layout: NodeId, child: NodeId, weight: f32) -> bool {
        if tree.parent(child) != Some(layout) {
            return false;
        }
        tree.modify(layout, |l: &mut LinearLayout| l.weights.insert(child, weight)).is_some()
    }
}

impl Widget for LinearLayout {
    fn arrange(&mut self, cx: &mut NodeCx<'_>) {
        let size = cx.rect().size;
        let children = cx.children();
        let available_main = self.direction.main(size) - self.padding * 2.0;
        let available_cross = self.direction.cross(size) - self.padding * 2.0;

        let current: Vec<(f32, Rect)> =
            children.iter().map(|&c| (self.weight(c), cx.tree.rect(c).unwrap_or_default())).collect();
        let sizes = linear_sizes(
            &current.iter().map(|(w, r)| (self.direction.main(r.size), *w)).collect::<Vec<_>>(),
            available_main,
            self.spacing,
        );

        let mut pos = self.padding;
        for ((&child, (_, rect)), main) in children.iter().zip(&current).zip(sizes) {
            let (offset, cross) = align_cross(self.align, available_cross, self.direction.cross(rect.size));
            cx.place(child, self.direction.rect(pos, self.padding + offset, main, cross));
            pos += main + self.spacing;
        }
    }

    fn child_removed(&mut self, child: NodeId) {
        self.weights.remove(&child);
    }
}
