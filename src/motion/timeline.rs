//! Timeline - resolves a parent/children reveal into explicit start times.
//!
//! Stagger is never implied by tree position. A timeline lists each target
//! with the offset (relative to activation) at which its animation starts,
//! in declared child order, so the scheduler only has to queue timers.

use std::rc::Rc;

use super::variant::VariantSpec;
use crate::types::ElementId;

/// One scheduled animation inside a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub target: ElementId,
    pub variant: Rc<VariantSpec>,
    /// Offset from activation.
    pub start_ms: u64,
}

impl TimelineEntry {
    pub fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.variant.duration_ms())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// A lone element, honoring its own delay.
    pub fn single(target: ElementId, variant: Rc<VariantSpec>) -> Self {
        let start_ms = variant.delay_ms();
        Self { entries: vec![TimelineEntry { target, variant, start_ms }] }
    }

    /// Parent first, then each child at `parent.child_offset_ms(i)` after
    /// the parent starts, plus the child variant's own delay.
    pub fn staggered(
        parent: ElementId,
        parent_variant: Rc<VariantSpec>,
        children: &[ElementId],
        child_variant: Rc<VariantSpec>,
    ) -> Self {
        let parent_start = parent_variant.delay_ms();
        let mut entries = Vec::with_capacity(children.len() + 1);

        for (index, child) in children.iter().enumerate() {
            entries.push(TimelineEntry {
                target: *child,
                variant: child_variant.clone(),
                start_ms: parent_start
                    .saturating_add(parent_variant.child_offset_ms(index))
                    .saturating_add(child_variant.delay_ms()),
            });
        }
        entries.insert(0, TimelineEntry { target: parent, variant: parent_variant, start_ms: parent_start });

        Self { entries }
    }

    /// Children only, spaced by `container`'s stagger policy. Used for
    /// lists whose container does not animate itself.
    pub fn list(children: &[ElementId], container: &VariantSpec, child_variant: Rc<VariantSpec>) -> Self {
        let entries = children
            .iter()
            .enumerate()
            .map(|(index, child)| TimelineEntry {
                target: *child,
                variant: child_variant.clone(),
                start_ms: container
                    .child_offset_ms(index)
                    .saturating_add(child_variant.delay_ms()),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time from activation until the last entry settles.
    pub fn total_duration_ms(&self) -> u64 {
        self.entries.iter().map(TimelineEntry::end_ms).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{mount_element, reset_registry};
    use crate::motion::presets;

    #[test]
    fn test_staggered_order_and_offsets() {
        reset_registry();
        let parent = mount_element("ul", None);
        let children: Vec<ElementId> = (0..3).map(|_| mount_element("li", Some(parent))).collect();

        let timeline = Timeline::staggered(
            parent,
            Rc::new(presets::stagger_container()),
            &children,
            Rc::new(presets::card()),
        );

        let starts: Vec<u64> = timeline.entries().iter().map(|e| e.start_ms).collect();
        assert_eq!(starts, vec![0, 200, 300, 400]);
        assert_eq!(timeline.entries()[0].target, parent);
        assert_eq!(timeline.entries()[3].target, children[2]);
        assert_eq!(timeline.total_duration_ms(), 400 + 600);
    }

    #[test]
    fn test_child_delay_added() {
        reset_registry();
        let parent = mount_element("div", None);
        let child = mount_element("img", Some(parent));

        let timeline = Timeline::staggered(
            parent,
            Rc::new(presets::menu_stagger()),
            &[child],
            Rc::new(presets::menu_image()),
        );
        assert_eq!(timeline.entries()[1].start_ms, 200 + 300);
    }

    #[test]
    fn test_list_without_parent() {
        reset_registry();
        let items: Vec<ElementId> = (0..4).map(|_| mount_element("li", None)).collect();
        let timeline = Timeline::list(&items, &presets::feature_list(), Rc::new(presets::feature_item()));

        let starts: Vec<u64> = timeline.entries().iter().map(|e| e.start_ms).collect();
        assert_eq!(starts, vec![0, 50, 100, 150]);
    }

    #[test]
    fn test_single_honors_delay() {
        reset_registry();
        let image = mount_element("img", None);
        let timeline = Timeline::single(image, Rc::new(presets::menu_image()));
        assert_eq!(timeline.entries()[0].start_ms, 300);
        assert_eq!(timeline.total_duration_ms(), 800);
    }
}
