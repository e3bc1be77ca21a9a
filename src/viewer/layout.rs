//! Vertical layout of rendered slots in the display container
//!
//! Slots stack top to bottom: the page surface, then its label, then a gap
//! before the next slot.

use super::document::Viewport;

/// Fixed spacing around each slot
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotSpacing {
    /// Height of the "Page N" caption under each surface
    pub label_height: f32,
    /// Gap between consecutive slots
    pub gap: f32,
}

impl Default for SlotSpacing {
    fn default() -> Self {
        Self {
            label_height: 24.0,
            gap: 16.0,
        }
    }
}

/// Position of one slot in content coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotBox {
    pub page: u32,
    pub top: f32,
    pub height: f32,
}

impl SlotBox {
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Stack slots in order and return their boxes
pub fn stack_slots<I>(slots: I, spacing: SlotSpacing) -> Vec<SlotBox>
where
    I: IntoIterator<Item = (u32, Viewport)>,
{
    let mut cursor = 0.0;
    slots
        .into_iter()
        .map(|(page, viewport)| {
            let height = viewport.height + spacing.label_height;
            let slot = SlotBox {
                page,
                top: cursor,
                height,
            };
            cursor += height + spacing.gap;
            slot
        })
        .collect()
}

/// Index of the midpoint closest to `target`.
///
/// Linear scan; on a tie the earlier slot wins.
#[must_use]
pub fn closest_slot(midpoints: &[f32], target: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, midpoint) in midpoints.iter().enumerate() {
        let distance = (midpoint - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// Page whose slot midpoint is nearest the container's vertical center
#[must_use]
pub fn page_at_center(boxes: &[SlotBox], scroll_top: f32, client_height: f32) -> Option<u32> {
    let center = scroll_top + client_height / 2.0;
    let midpoints: Vec<f32> = boxes.iter().map(SlotBox::midpoint).collect();
    closest_slot(&midpoints, center).map(|index| boxes[index].page)
}
