use {
    super::{align_cross, Align, Direction},
    dashr_ui_core::{
        display::Size,
        tree::{NodeCx, NodeId, UiTree, Widget},
    },
    std::collections::HashMap,
};

/// Flex factors of one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    pub grow: f32,
    pub shrink: f32,
    /// Starting main size; the child's size when it joined the layout when unset.
    pub basis: Option<f32>,
}

impl Default for FlexItem {
    fn default() -> Self {
        FlexItem { grow: 0.0, shrink: 1.0, basis: None }
    }
}

impl FlexItem {
    pub fn grow(grow: f32) -> Self {
        FlexItem { grow, ..Default::default() }
    }

    pub fn with_basis(mut self, basis: f32) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn with_shrink(mut self, shrink: f32) -> Self {
        self.shrink = shrink;
        self
    }
}

/// Main-axis placement of the packed children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Justify {
    Start,
    Center,
    End,
}

/// Main-axis sizes for flex children given `(basis, item)` pairs.
///
/// Positive free space is handed out by `grow` (truncated to whole pixels).
/// A deficit is taken back in proportion to `shrink * basis`, rounded so the
/// shares add up to the deficit, never sizing a child below zero.
pub fn flex_sizes(children: &[(f32, FlexItem)], available: f32, spacing: f32) -> Vec<f32> {
    let gaps = spacing * children.len().saturating_sub(1) as f32;
    let total_basis: f32 = children.iter().map(|(basis, _)| basis).sum();
    let remaining = available - total_basis - gaps;

    let total_grow: f32 = children.iter().map(|(_, item)| item.grow.max(0.0)).sum();
    let total_shrink: f32 = children.iter().map(|(basis, item)| item.shrink.max(0.0) * basis).sum();

    if remaining < 0.0 && total_shrink > 0.0 {
        // rounding the running total keeps the shares summing to the deficit
        let mut weighted = 0.0;
        let mut taken = 0.0;
        return children
            .iter()
            .map(|&(basis, item)| {
                weighted += item.shrink.max(0.0) * basis;
                let share = (-remaining * weighted / total_shrink).round() - taken;
                taken += share;
                (basis - share).max(0.0)
            })
            .collect();
    }

    children
        .iter()
        .map(|&(basis, item)| {
            if remaining > 0.0 && total_grow > 0.0 {
                basis + (remaining * item.grow.max(0.0) / total_grow).trunc()
            } else {
                basis
            }
        })
        .collect()
}

/// Flexbox-style single-line container.
#[derive(Debug, Clone)]
pub struct FlexLayout {
    pub direction: Direction,
    pub spacing: f32,
    pub padding: f32,
    pub justify: Justify,
    pub align_items: Align,
    items: HashMap<NodeId, FlexItem>,
    /// Size of each child when it first got laid out here.
    natural: HashMap<NodeId, Size>,
}

impl FlexLayout {
    pub fn new(direction: Direction) -> Self {
        FlexLayout {
            direction,
            spacing: 0.0,
            padding: 0.0,
            justify: Justify::Start,
            align_items: Align::Stretch,
            items: HashMap::new(),
            natural: HashMap::new(),
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

    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_align_items(mut self, align_items: Align) -> Self {
        self.align_items = align_items;
        self
    }

    pub fn item(&self, child: NodeId) -> FlexItem {
        self.items.get(&child).copied().unwrap_or_default()
    }

    /// Appends `child` to `layout` with the given factors.
    pub fn add(tree: &mut UiTree, layout: NodeId, child: NodeId, item: FlexItem) -> bool {
        tree.widget::<FlexLayout>(layout).is_some()
            && tree.add_child(layout, child)
            && Self::set_item(tree, layout, child, item)
    }

    pub fn set_item(tree: &mut UiTree, layout: NodeId, child: NodeId, item: FlexItem) -> bool {
        if tree.parent(child) != Some(layout) {
            return false;
        }
        tree.modify(layout, |l: &mut FlexLayout| l.items.insert(child, item)).is_some()
    }
}

impl Widget for FlexLayout {
    fn arrange(&mut self, cx: &mut NodeCx<'_>) {
        let size = cx.rect().size;
        let children = cx.children();
        let available_main = self.direction.main(size) - self.padding * 2.0;
        let available_cross = self.direction.cross(size) - self.padding * 2.0;

        for &child in &children {
            if !self.natural.contains_key(&child) {
                let size = cx.tree.rect(child).map_or_else(Size::zero, |r| r.size);
                self.natural.insert(child, size);
            }
        }
        let natural = |child: NodeId| self.natural.get(&child).copied().unwrap_or_else(Size::zero);

        let inputs: Vec<(f32, FlexItem)> = children
            .iter()
            .map(|&c| {
                let item = self.item(c);
                (item.basis.unwrap_or_else(|| self.direction.main(natural(c))), item)
            })
            .collect();
        let sizes = flex_sizes(&inputs, available_main, self.spacing);

        let content = sizes.iter().sum::<f32>() + self.spacing * sizes.len().saturating_sub(1) as f32;
        let mut pos = self.padding
            + match self.justify {
                Justify::Start => 0.0,
                Justify::Center => ((available_main - content) / 2.0).floor(),
                Justify::End => available_main - content,
            };

        for (&child, main) in children.iter().zip(sizes) {
            let cross_size = self.direction.cross(natural(child));
            let (offset, cross) = align_cross(self.align_items, available_cross, cross_size);
            cx.place(child, self.direction.rect(pos, self.padding + offset, main, cross));
            pos += main + self.spacing;
        }
    }

    fn child_removed(&mut self, child: NodeId) {
        self.items.remove(&child);
        self.natural.remove(&child);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        dashr_ui_core::{
            display::{Point, Rect},
            tree::Container,
        },
    };

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_grow_distribution() {
        let sizes = flex_sizes(&[(50.0, FlexItem::grow(1.0)), (50.0, FlexItem::grow(2.0))], 200.0, 10.0);
        // 90 free: 30 and 60
        assert_eq!(sizes, vec![80.0, 110.0]);

        let rigid = flex_sizes(&[(50.0, FlexItem::default()), (20.0, FlexItem::default())], 200.0, 0.0);
        assert_eq!(rigid, vec![50.0, 20.0]);
    }

    #[test]
    fn test_proportional_shrink() {
        // 40px deficit shared by shrink * basis (100 : 300)
        let sizes = flex_sizes(&[(100.0, FlexItem::default()), (100.0, FlexItem::default().with_shrink(3.0))], 160.0, 0.0);
        assert_eq!(sizes, vec![90.0, 70.0]);

        let pinned = flex_sizes(&[(100.0, FlexItem::default().with_shrink(0.0)), (100.0, FlexItem::default())], 150.0, 0.0);
        assert_eq!(pinned, vec![100.0, 50.0]);

        let stuck = flex_sizes(&[(100.0, FlexItem::default().with_shrink(0.0))], 50.0, 0.0);
        assert_eq!(stuck, vec![100.0]);

        // 100px deficit split 33.3 : 66.7 still fills exactly 200
        let thirds = flex_sizes(&[(100.0, FlexItem::default()), (200.0, FlexItem::default())], 200.0, 0.0);
        assert_eq!(thirds, vec![67.0, 133.0]);
    }

    #[test]
    fn test_sizes_do_not_depend_on_resize_history() {
        let mut tree = UiTree::new();
        let flex = tree.insert(FlexLayout::new(Direction::Horizontal), rect(0.0, 0.0, 200.0, 20.0));
        let a = tree.insert(Container, rect(0.0, 0.0, 50.0, 20.0));
        let b = tree.insert(Container, rect(0.0, 0.0, 50.0, 20.0));
        FlexLayout::add(&mut tree, flex, a, FlexItem::default());
        FlexLayout::add(&mut tree, flex, b, FlexItem::grow(1.0));
        assert_eq!(tree.rect(a), Some(rect(0.0, 0.0, 50.0, 20.0)));
        assert_eq!(tree.rect(b), Some(rect(50.0, 0.0, 150.0, 20.0)));

        tree.set_size(flex, Size::new(60.0, 20.0));
        assert_eq!(tree.rect(a), Some(rect(0.0, 0.0, 30.0, 20.0)));
        assert_eq!(tree.rect(b), Some(rect(30.0, 0.0, 30.0, 20.0)));

        tree.set_size(flex, Size::new(100.0, 20.0));
        tree.set_size(flex, Size::new(300.0, 20.0));
        tree.set_size(flex, Size::new(200.0, 20.0));
        assert_eq!(tree.rect(a), Some(rect(0.0, 0.0, 50.0, 20.0)));
        assert_eq!(tree.rect(b), Some(rect(50.0, 0.0, 150.0, 20.0)));
    }

    #[test]
    fn test_justify_and_align() {
        let mut tree = UiTree::new();
        let flex = tree.insert(
            FlexLayout::new(Direction::Horizontal).with_justify(Justify::Center).with_align_items(Align::Center),
            rect(0.0, 0.0, 100.0, 40.0),
        );
        let a = tree.insert(Container, rect(0.0, 0.0, 20.0, 10.0));
        let b = tree.insert(Container, rect(0.0, 0.0, 30.0, 20.0));
        FlexLayout::add(&mut tree, flex, a, FlexItem::default());
        FlexLayout::add(&mut tree, flex, b, FlexItem::default());

        // content 50, centered in 100
        assert_eq!(tree.rect(a), Some(rect(25.0, 15.0, 20.0, 10.0)));
        assert_eq!(tree.rect(b), Some(rect(45.0, 10.0, 30.0, 20.0)));

        tree.modify(flex, |l: &mut FlexLayout| {
            l.justify = Justify::End;
            l.align_items = Align::Stretch;
            l.padding = 5.0;
        });
        assert_eq!(tree.rect(a), Some(rect(45.0, 5.0, 20.0, 30.0)));
        assert_eq!(tree.rect(b), Some(rect(65.0, 5.0, 30.0, 30.0)));
    }

    #[test]
    fn test_basis_and_grow_in_tree() {
        let mut tree = UiTree::new();
        let flex = tree.insert(FlexLayout::new(Direction::Vertical).with_spacing(4.0), rect(0.0, 0.0, 30.0, 100.0));
        let header = tree.insert(Container, rect(0.0, 0.0, 30.0, 99.0));
        let body = tree.insert(Container, rect(0.0, 0.0, 30.0, 0.0));
        FlexLayout::add(&mut tree, flex, header, FlexItem::default().with_basis(16.0).with_shrink(0.0));
        FlexLayout::add(&mut tree, flex, body, FlexItem::grow(1.0).with_basis(0.0));
        assert_eq!(tree.rect(header), Some(rect(0.0, 0.0, 30.0, 16.0)));
        assert_eq!(tree.rect(body), Some(rect(0.0, 20.0, 30.0, 80.0)));
    }
}
