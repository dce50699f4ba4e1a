//! Form layout solver.
//!
//! Each child of a container carries a [`FormData`]. Edges attach either to
//! a percentage of the container's client extent or to an edge of a sibling.
//! Sibling dependencies are resolved by repeated passes until the geometry
//! is stable.
//!
//! # Edge Rules
//!
//! - Percent: `percent * extent / 100 + offset`.
//! - Sibling, [`Alignment::Adjacent`]: a left/top edge attaches to the
//!   sibling's right/bottom edge, a right/bottom edge to its left/top edge.
//! - Sibling, explicit alignment: `Left`/`Top` name the sibling's leading
//!   edge and `Right`/`Bottom` its trailing edge on the axis being solved.
//!   `Center` centers this control on the sibling.
//! - Both edges attached: the control spans them. One edge: the control
//!   keeps its preferred size (or the `width`/`height` override). No edge:
//!   the control sits at the origin.

use std::collections::HashMap;

use horizon_foundation_core::logging::targets;

use super::attachment::{Alignment, AttachTarget, Attachment, FormData};
use crate::geometry::{Rect, Size};
use crate::widget::ControlId;

/// A child as seen by the solver.
#[derive(Debug, Clone, Copy)]
pub struct LayoutChild {
    /// The control.
    pub id: ControlId,
    /// Its layout data (default when none was set).
    pub data: FormData,
    /// Its preferred size.
    pub preferred: Size,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Spanned controls stretch between their edges.
    Arrange,
    /// Spanned controls keep their preferred size; used to measure.
    Measure,
}

/// Compute the bounds of every child inside a client area of `client`.
///
/// The result is index-aligned with `children`.
pub fn solve(client: Size, children: &[LayoutChild]) -> Vec<Rect> {
    solve_with_mode(client, children, Mode::Arrange)
}

/// The smallest client size that holds every child at its preferred size.
pub fn compute_size(children: &[LayoutChild]) -> Size {
    let rects = solve_with_mode(Size::ZERO, children, Mode::Measure);
    let mut size = Size::ZERO;
    for (child, rect) in children.iter().zip(&rects) {
        let width = (rect.right() + trailing_margin(child.data.right)).max(rect.width);
        let height = (rect.bottom() + trailing_margin(child.data.bottom)).max(rect.height);
        size.width = size.width.max(width);
        size.height = size.height.max(height);
    }
    size
}

/// Space kept after a child attached to the far side of the parent.
fn trailing_margin(edge: Option<Attachment>) -> i32 {
    match edge {
        Some(Attachment {
            target: AttachTarget::Percent(p),
            offset,
        }) if p > 0 && offset < 0 => -offset,
        _ => 0,
    }
}

fn solve_with_mode(client: Size, children: &[LayoutChild], mode: Mode) -> Vec<Rect> {
    let index: HashMap<ControlId, usize> = children
        .iter()
        .enumerate()
        .map(|(i, child)| (child.id, i))
        .collect();

    let mut rects: Vec<Rect> = children
        .iter()
        .map(|child| Rect::from_parts(Default::default(), preferred_of(child)))
        .collect();

    let max_passes = (children.len() + 1).max(10);
    for pass in 0..max_passes {
        let mut changed = false;

        for (i, child) in children.iter().enumerate() {
            let preferred = preferred_of(child);
            let resolver = EdgeResolver {
                rects: &rects,
                index: &index,
                report_missing: pass == 0,
            };

            let (x, width) = resolver.axis(
                Axis::Horizontal,
                child.data.left,
                child.data.right,
                client.width,
                preferred.width,
                mode,
            );
            let (y, height) = resolver.axis(
                Axis::Vertical,
                child.data.top,
                child.data.bottom,
                client.height,
                preferred.height,
                mode,
            );

            let rect = Rect::new(x, y, width, height);
            if rects[i] != rect {
                rects[i] = rect;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    rects
}

fn preferred_of(child: &LayoutChild) -> Size {
    Size::new(
        child.data.width.unwrap_or(child.preferred.width),
        child.data.height.unwrap_or(child.preferred.height),
    )
}

struct EdgeResolver<'a> {
    rects: &'a [Rect],
    index: &'a HashMap<ControlId, usize>,
    report_missing: bool,
}

impl EdgeResolver<'_> {
    fn axis(
        &self,
        axis: Axis,
        leading: Option<Attachment>,
        trailing: Option<Attachment>,
        extent: i32,
        preferred: i32,
        mode: Mode,
    ) -> (i32, i32) {
        let lead = leading.and_then(|a| self.edge(axis, &a, true, extent, preferred));
        let trail = trailing.and_then(|a| self.edge(axis, &a, false, extent, preferred));

        match (lead, trail) {
            (Some(start), Some(end)) if mode == Mode::Arrange => (start, (end - start).max(0)),
            (Some(start), _) => (start, preferred),
            (None, Some(end)) => (end - preferred, preferred),
            (None, None) => (0, preferred),
        }
    }

    /// Position of one edge, or `None` when the sibling is not laid out here.
    fn edge(
        &self,
        axis: Axis,
        attachment: &Attachment,
        leading: bool,
        extent: i32,
        own_size: i32,
    ) -> Option<i32> {
        let base = match attachment.target {
            AttachTarget::Percent(percent) => percent * extent / 100,
            AttachTarget::Control { id, align } => {
                let Some(&sibling) = self.index.get(&id) else {
                    if self.report_missing {
                        tracing::debug!(target: targets::LAYOUT, ?id, "attachment to a control outside this container ignored");
                    }
                    return None;
                };
                let rect = self.rects[sibling];
                let (start, size) = match axis {
                    Axis::Horizontal => (rect.x, rect.width),
                    Axis::Vertical => (rect.y, rect.height),
                };
                match align {
                    Alignment::Adjacent if leading => start + size,
                    Alignment::Adjacent => start,
                    Alignment::Left | Alignment::Top => start,
                    Alignment::Right | Alignment::Bottom => start + size,
                    Alignment::Center => {
                        let centered = start + (size - own_size) / 2;
                        if leading { centered } else { centered + own_size }
                    }
                }
            }
        };
        Some(base + attachment.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<ControlId> {
        let mut map: SlotMap<ControlId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn child(id: ControlId, data: FormData, w: i32, h: i32) -> LayoutChild {
        LayoutChild {
            id,
            data,
            preferred: Size::new(w, h),
        }
    }

    #[test]
    fn test_fill_with_margin() {
        let id = ids(1)[0];
        let rects = solve(
            Size::new(200, 100),
            &[child(id, FormData::filled(5), 10, 10)],
        );
        assert_eq!(rects[0], Rect::new(5, 5, 190, 90));
    }

    #[test]
    fn test_unattached_sits_at_origin() {
        let id = ids(1)[0];
        let rects = solve(Size::new(200, 100), &[child(id, FormData::new(), 40, 20)]);
        assert_eq!(rects[0], Rect::new(0, 0, 40, 20));
    }

    #[test]
    fn test_trailing_edge_only() {
        let id = ids(1)[0];
        let data = FormData {
            right: Some(Attachment::percent(100, -2)),
            bottom: Some(Attachment::percent(100, -2)),
            ..FormData::default()
        };
        let rects = solve(Size::new(200, 100), &[child(id, data, 40, 20)]);
        assert_eq!(rects[0], Rect::new(158, 78, 40, 20));
    }

    #[test]
    fn test_adjacent_sibling_resolves_regardless_of_order() {
        let ids = ids(2);
        let label = ids[0];
        let field = ids[1];

        // The dependent control comes first so a second pass is required.
        let field_data = FormData {
            left: Some(Attachment::control(label, 5)),
            right: Some(Attachment::percent(100, -5)),
            top: Some(Attachment::aligned(label, 0, Alignment::Top)),
            ..FormData::default()
        };
        let label_data = FormData {
            left: Some(Attachment::percent(0, 5)),
            top: Some(Attachment::percent(0, 20)),
            ..FormData::default()
        };
        let rects = solve(
            Size::new(300, 200),
            &[child(field, field_data, 80, 21), child(label, label_data, 50, 21)],
        );

        assert_eq!(rects[1], Rect::new(5, 20, 50, 21));
        assert_eq!(rects[0], Rect::new(60, 20, 235, 21));
    }

    #[test]
    fn test_bottom_attached_above_sibling() {
        let ids = ids(2);
        let status = ids[0];
        let body = ids[1];

        let status_data = FormData {
            left: Some(Attachment::percent(0, 2)),
            right: Some(Attachment::percent(100, -2)),
            bottom: Some(Attachment::percent(100, -2)),
            ..FormData::default()
        };
        let mut body_data = FormData::filled(5);
        body_data.bottom = Some(Attachment::control(status, -5));

        let rects = solve(
            Size::new(400, 300),
            &[child(status, status_data, 10, 21), child(body, body_data, 10, 10)],
        );
        assert_eq!(rects[0], Rect::new(2, 277, 396, 21));
        assert_eq!(rects[1], Rect::new(5, 5, 390, 267));
    }

    #[test]
    fn test_center_alignment() {
        let ids = ids(2);
        let anchor = ids[0];
        let other = ids[1];

        let anchor_data = FormData {
            left: Some(Attachment::percent(0, 100)),
            ..FormData::default()
        };
        let other_data = FormData {
            left: Some(Attachment::aligned(anchor, 0, Alignment::Center)),
            ..FormData::default()
        };
        let rects = solve(
            Size::new(400, 300),
            &[child(anchor, anchor_data, 100, 10), child(other, other_data, 40, 10)],
        );
        assert_eq!(rects[1].x, 130);
    }

    #[test]
    fn test_size_overrides() {
        let id = ids(1)[0];
        let data = FormData {
            top: Some(Attachment::percent(0, 0)),
            height: Some(200),
            ..FormData::default()
        };
        let rects = solve(Size::new(400, 300), &[child(id, data, 30, 15)]);
        assert_eq!(rects[0].height, 200);
        assert_eq!(rects[0].width, 30);
    }

    #[test]
    fn test_missing_sibling_is_ignored() {
        let ids = ids(2);
        let data = FormData {
            left: Some(Attachment::control(ids[1], 10)),
            ..FormData::default()
        };
        let rects = solve(Size::new(100, 100), &[child(ids[0], data, 30, 15)]);
        assert_eq!(rects[0], Rect::new(0, 0, 30, 15));
    }

    #[test]
    fn test_compute_size_of_stacked_children() {
        let ids = ids(2);
        let label_data = FormData {
            left: Some(Attachment::percent(0, 10)),
            top: Some(Attachment::percent(0, 10)),
            ..FormData::default()
        };
        let button_data = FormData {
            left: Some(Attachment::percent(0, 10)),
            top: Some(Attachment::control(ids[0], 10)),
            right: Some(Attachment::percent(100, -10)),
            bottom: Some(Attachment::percent(100, -10)),
            ..FormData::default()
        };
        let size = compute_size(&[
            child(ids[0], label_data, 120, 21),
            child(ids[1], button_data, 40, 21),
        ]);
        assert_eq!(size, Size::new(130, 72));
    }
}
