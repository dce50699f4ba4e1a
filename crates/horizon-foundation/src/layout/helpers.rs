//! One-call layout recipes for form-layout containers.
//!
//! Each helper writes the control's layout data and returns it. The
//! centering helpers also return a [`CenterLayout`] that must be adjusted
//! once the control has been measured; [`crate::window::MainFrame`] does this
//! automatically for adjusters registered with it.

use std::sync::Arc;

use super::attachment::{Attachment, FormData, form_attachment};
use super::center::CenterLayout;
use crate::environment::Environment;
use crate::error::ControlResult;
use crate::widget::ControlId;

/// Loose description of one edge for [`layout`].
///
/// A sibling takes precedence over the percentage. An edge whose fields are
/// all default is left unattached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSpec {
    /// Sibling to attach to.
    pub sibling: Option<ControlId>,
    /// Percentage of the parent, used without a sibling.
    pub percent: i32,
    /// Offset in pixels.
    pub offset: i32,
}

impl EdgeSpec {
    /// Leave the edge unattached.
    pub const NONE: Self = Self {
        sibling: None,
        percent: 0,
        offset: 0,
    };

    /// Attach at `percent` of the parent plus `offset`.
    pub fn percent(percent: i32, offset: i32) -> Self {
        Self {
            sibling: None,
            percent,
            offset,
        }
    }

    /// Attach to the facing edge of `sibling` plus `offset`.
    pub fn sibling(sibling: ControlId, offset: i32) -> Self {
        Self {
            sibling: Some(sibling),
            percent: 0,
            offset,
        }
    }

    /// The resulting attachment, `None` for an unattached edge.
    pub fn attachment(&self) -> Option<Attachment> {
        form_attachment(self.sibling, self.percent, self.offset)
    }
}

/// Stretch `control` over its parent with the configured margin.
///
/// With a `status` control the bottom edge stops above it instead of at the
/// parent's bottom.
pub fn fill(env: &Environment, control: ControlId, status: Option<ControlId>) -> ControlResult<FormData> {
    let margin = env.config().layout.fill_margin;
    let mut data = FormData::filled(margin);
    if let Some(status) = status {
        data.bottom = Some(Attachment::control(status, -margin));
    }
    env.controls().set_layout_data(control, Some(data))?;
    Ok(data)
}

/// Center `control` horizontally on `x_center` percent, `y_offset` above
/// the parent's bottom.
pub fn center_near_bottom(
    env: &Arc<Environment>,
    control: ControlId,
    x_center: i32,
    y_offset: i32,
) -> ControlResult<(FormData, CenterLayout)> {
    let data = FormData {
        left: Some(Attachment::percent(0, x_center)),
        bottom: Some(Attachment::percent(100, -y_offset)),
        ..FormData::default()
    };
    env.controls().set_layout_data(control, Some(data))?;
    Ok((data, CenterLayout::new(Arc::clone(env), control, x_center)))
}

/// Center `control` horizontally on `x_center` percent with its bottom edge
/// `y_offset` below the parent's top.
pub fn center_near_top(
    env: &Arc<Environment>,
    control: ControlId,
    x_center: i32,
    y_offset: i32,
) -> ControlResult<(FormData, CenterLayout)> {
    let data = FormData {
        left: Some(Attachment::percent(0, x_center)),
        bottom: Some(Attachment::percent(0, y_offset)),
        ..FormData::default()
    };
    env.controls().set_layout_data(control, Some(data))?;
    Ok((data, CenterLayout::new(Arc::clone(env), control, x_center)))
}

/// Center `control` horizontally in its parent, `y_offset` below `above`.
pub fn center_below(
    env: &Arc<Environment>,
    control: ControlId,
    above: ControlId,
    y_offset: i32,
) -> ControlResult<(FormData, CenterLayout)> {
    let data = FormData {
        left: Some(Attachment::percent(50, 0)),
        top: Some(Attachment::control(above, y_offset)),
        ..FormData::default()
    };
    env.controls().set_layout_data(control, Some(data))?;
    Ok((data, CenterLayout::new(Arc::clone(env), control, 50)))
}

/// Set all four edges of `control` in one call.
pub fn layout(
    env: &Environment,
    control: ControlId,
    left: EdgeSpec,
    right: EdgeSpec,
    top: EdgeSpec,
    bottom: EdgeSpec,
) -> ControlResult<FormData> {
    let data = FormData {
        left: left.attachment(),
        right: right.attachment(),
        top: top.attachment(),
        bottom: bottom.attachment(),
        ..FormData::default()
    };
    env.controls().set_layout_data(control, Some(data))?;
    Ok(data)
}

/// Override the height of a control that already has layout data.
///
/// Controls without layout data are left alone.
pub fn set_height(env: &Environment, control: ControlId, height: i32) -> ControlResult<()> {
    let controls = env.controls();
    if let Some(mut data) = controls.layout_data(control)? {
        data.height = Some(height);
        controls.set_layout_data(control, Some(data))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::layout::adjust::{AdjustPhase, LayoutAdjuster};
    use crate::widget::{ControlKind, Style};

    fn shell_with_child(env: &Environment, kind: ControlKind) -> (ControlId, ControlId) {
        let shell = env.controls().create(ControlKind::Shell, None, Style::NONE).unwrap();
        let child = env.controls().create(kind, Some(shell), Style::NONE).unwrap();
        env.controls().set_size(shell, Size::new(400, 300)).unwrap();
        (shell, child)
    }

    #[test]
    fn test_fill_without_status() {
        let env = Environment::with_defaults();
        let (shell, body) = shell_with_child(&env, ControlKind::Composite);

        let data = fill(&env, body, None).unwrap();
        assert_eq!(data, FormData::filled(5));

        env.controls().layout(shell).unwrap();
        assert_eq!(env.controls().bounds(body).unwrap(), Rect::new(5, 5, 390, 290));
    }

    #[test]
    fn test_fill_above_status() {
        let env = Environment::with_defaults();
        let (shell, body) = shell_with_child(&env, ControlKind::Composite);
        let status = env.controls().create(ControlKind::Text, Some(shell), Style::READ_ONLY).unwrap();
        let data = fill(&env, body, Some(status)).unwrap();
        assert_eq!(data.bottom, Some(Attachment::control(status, -5)));
    }

    #[test]
    fn test_layout_leaves_default_edges_unattached() {
        let env = Environment::with_defaults();
        let (_, child) = shell_with_child(&env, ControlKind::Label);
        let (_, sibling) = shell_with_child(&env, ControlKind::Label);

        let data = layout(
            &env,
            child,
            EdgeSpec::percent(0, 10),
            EdgeSpec::NONE,
            EdgeSpec::sibling(sibling, 4),
            EdgeSpec::percent(100, 0),
        )
        .unwrap();

        assert_eq!(data.left, Some(Attachment::percent(0, 10)));
        assert_eq!(data.right, None);
        assert_eq!(data.top, Some(Attachment::control(sibling, 4)));
        assert_eq!(data.bottom, Some(Attachment::percent(100, 0)));
        assert_eq!(env.controls().layout_data(child).unwrap(), Some(data));
    }

    #[test]
    fn test_set_height() {
        let env = Environment::with_defaults();
        let (_, child) = shell_with_child(&env, ControlKind::Table);

        set_height(&env, child, 200).unwrap();
        assert_eq!(env.controls().layout_data(child).unwrap(), None);

        fill(&env, child, None).unwrap();
        set_height(&env, child, 200).unwrap();
        assert_eq!(
            env.controls().layout_data(child).unwrap().unwrap().height,
            Some(200)
        );
    }

    #[test]
    fn test_center_below() {
        let env = Environment::with_defaults();
        let (shell, title) = shell_with_child(&env, ControlKind::Label);
        let button = env.controls().create(ControlKind::Button, Some(shell), Style::NONE).unwrap();
        env.controls().set_size_hint(title, Some(Size::new(100, 20))).unwrap();
        env.controls().set_size_hint(button, Some(Size::new(60, 25))).unwrap();

        let (data, center) = center_below(&env, button, title, 10).unwrap();
        assert_eq!(data.top, Some(Attachment::control(title, 10)));

        env.controls().layout(shell).unwrap();
        assert_eq!(center.adjust(), AdjustPhase::Adjusted);
        assert_eq!(env.controls().bounds(button).unwrap(), Rect::new(170, 30, 60, 25));
    }

    #[test]
    fn test_center_near_bottom() {
        let env = Environment::with_defaults();
        let (shell, button) = shell_with_child(&env, ControlKind::Button);
        env.controls().set_size_hint(button, Some(Size::new(60, 25))).unwrap();

        let (_, center) = center_near_bottom(&env, button, 50, 10).unwrap();
        env.controls().layout(shell).unwrap();
        center.adjust();

        assert_eq!(env.controls().bounds(button).unwrap(), Rect::new(170, 265, 60, 25));
    }
}
