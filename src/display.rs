use std::fmt::Write;

use crate::noderef::NodeRef;

/// Box-drawing renderer for trees and forests.
///
/// Nodes are printed in stored order, one per line, with each child prefixed
/// by the side of its parent it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TreeDisplay {
    column_width: usize,
    show_sides: bool,
}

impl Default for TreeDisplay {
    fn default() -> Self {
        Self {
            column_width: 2,
            show_sides: true,
        }
    }
}

impl TreeDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of each indentation level. Clamped to at least 1.
    pub fn column_width(mut self, column_width: usize) -> Self {
        self.column_width = column_width.max(1);
        self
    }

    pub fn show_sides(mut self, show_sides: bool) -> Self {
        self.show_sides = show_sides;
        self
    }

    pub fn format<T>(&self, node: &NodeRef<T>, f: &mut impl Write) -> std::fmt::Result
    where
        T: std::fmt::Display,
    {
        self.format_node(node, f)
    }

    pub fn format_forest<T>(&self, roots: &[NodeRef<T>], f: &mut impl Write) -> std::fmt::Result
    where
        T: std::fmt::Display,
    {
        for root in roots {
            self.format_node(root, f)?;
        }
        Ok(())
    }

    /// Render into a new `String`.
    pub fn render<T>(&self, node: &NodeRef<T>) -> String
    where
        T: std::fmt::Display,
    {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.format(node, &mut out);
        out
    }

    fn format_node<T>(&self, node: &NodeRef<T>, f: &mut impl Write) -> std::fmt::Result
    where
        T: std::fmt::Display,
    {
        // Pending rows as (node, depth, last sibling), children pushed in reverse
        let mut stack = vec![(node.clone(), 0, true)];
        while let Some((node, depth, last)) = stack.pop() {
            self.format_row(&node, depth, last, f)?;

            let children = node.children();
            let count = children.len();
            for (index, child) in children.into_iter().enumerate().rev() {
                stack.push((child, depth + 1, index + 1 == count));
            }
        }
        Ok(())
    }

    fn format_row<T>(
        &self,
        node: &NodeRef<T>,
        depth: usize,
        last: bool,
        f: &mut impl Write,
    ) -> std::fmt::Result
    where
        T: std::fmt::Display,
    {
        let has_children = node.num_children() > 0;

        if depth == 0 {
            if has_children {
                f.write_char('┏')?;
            } else {
                f.write_char('━')?;
            }
        } else {
            // The position of the first character of the payload from the previous row
            let pos = depth * self.column_width;
            for i in 0..pos {
                if i % self.column_width == 0 {
                    f.write_char('┃')?;
                } else {
                    f.write_char(' ')?;
                }
            }

            if has_children || !last {
                f.write_char('┣')?;
            } else {
                f.write_char('┗')?;
            }

            if self.show_sides {
                if let Some(side) = node.position() {
                    write!(f, "{}:", side)?;
                }
            }
        }

        writeln!(f, "{}", *node.value())
    }
}
