/// Label Cloud Animator.
///
/// Per-item continuous render state advanced once per frame:
/// - Color: exponential smoothing toward highlight (hovered) or base color
/// - Scale: exponential smoothing toward hover scale (hovered) or 1.0
/// - Bob: decorative vertical sine drift, phase-shifted by rank
/// - Icon: visible only while hovered, anchored above the label
///
/// `advance` is a pure step over the whole arena; `AnimationController`
/// owns the arena, the hover set and the cursor lease, and is the only
/// writer of `RenderState`.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::cloud::CloudData;
use crate::config::CloudConfig;
use crate::render::cursor::{acquire_pointer_cursor, CursorLease, CursorSurface};
use crate::render::style::{lerp, lerp_color, Color, ItemVisual, Palette};

/// Hover state machine per item: Idle ⇄ Hovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovered,
}

/// Indices of hovered items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverSet {
    items: BTreeSet<usize>,
}

impl HoverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true on an Idle → Hovered transition
    pub fn enter(&mut self, index: usize) -> bool {
        self.items.insert(index)
    }

    /// Returns true on a Hovered → Idle transition
    pub fn leave(&mut self, index: usize) -> bool {
        self.items.remove(&index)
    }

    pub fn state(&self, index: usize) -> HoverState {
        if self.items.contains(&index) {
            HoverState::Hovered
        } else {
            HoverState::Idle
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().copied()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Time snapshot shared by every item within one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since mount
    pub elapsed: f32,
    /// Seconds since previous frame
    pub dt: f32,
}

impl FrameClock {
    pub fn advance(self, dt: f32) -> Self {
        let dt = dt.max(0.0);
        Self {
            elapsed: self.elapsed + dt,
            dt,
        }
    }
}

/// Per-item render state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub hover: HoverState,
    pub color: Color,
    /// Always within [1.0, hover_scale]
    pub scale: f32,
    pub bob_phase: f32,
    /// Vertical offset applied to the displayed position this frame
    pub bob_offset: f32,
}

impl RenderState {
    /// Resting state: base color, unit scale, no bob yet.
    pub fn at_rest(visual: &ItemVisual) -> Self {
        Self {
            hover: HoverState::Idle,
            color: visual.base_color,
            scale: 1.0,
            bob_phase: visual.bob_phase,
            bob_offset: 0.0,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hover == HoverState::Hovered
    }
}

/// Animation constants, resolved once at mount
#[derive(Debug, Clone, Copy)]
pub struct AnimationParams {
    pub color_smoothing: f32,
    pub scale_smoothing: f32,
    pub hover_scale: f32,
    pub bob_speed: f32,
    pub bob_amplitude: f32,
    pub highlight: Color,
}

impl AnimationParams {
    pub fn new(cfg: &CloudConfig, palette: &Palette) -> Self {
        Self {
            color_smoothing: cfg.color_smoothing.clamp(0.0, 1.0),
            scale_smoothing: cfg.scale_smoothing.clamp(0.0, 1.0),
            hover_scale: cfg.hover_scale.max(1.0),
            bob_speed: cfg.bob_speed,
            bob_amplitude: cfg.bob_amplitude,
            highlight: palette.highlight,
        }
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self::new(&CloudConfig::default(), &Palette::default())
    }
}

/// One animation step for a single item.
#[inline]
fn step(
    prev: &RenderState,
    visual: &ItemVisual,
    hover: HoverState,
    clock: FrameClock,
    p: &AnimationParams,
) -> RenderState {
    let hovered = hover == HoverState::Hovered;
    let (target_color, target_scale) = if hovered {
        (p.highlight, p.hover_scale)
    } else {
        (visual.base_color, 1.0)
    };

    RenderState {
        hover,
        color: lerp_color(prev.color, target_color, p.color_smoothing),
        scale: lerp(prev.scale, target_scale, p.scale_smoothing).clamp(1.0, p.hover_scale),
        bob_phase: visual.bob_phase,
        bob_offset: (clock.elapsed * p.bob_speed + visual.bob_phase).sin() * p.bob_amplitude,
    }
}

/// Advance every item by one frame into `out` (cleared first).
/// All items read the same `clock`.
pub fn advance_into(
    prev: &[RenderState],
    visuals: &[ItemVisual],
    hover: &HoverSet,
    clock: FrameClock,
    params: &AnimationParams,
    out: &mut Vec<RenderState>,
) {
    out.clear();
    out.extend(
        prev.iter()
            .zip(visuals)
            .enumerate()
            .map(|(i, (s, v))| step(s, v, hover.state(i), clock, params)),
    );
}

/// Pure per-frame step: previous arena in, next arena out.
pub fn advance(
    prev: &[RenderState],
    visuals: &[ItemVisual],
    hover: &HoverSet,
    clock: FrameClock,
    params: &AnimationParams,
) -> Vec<RenderState> {
    let mut out = Vec::with_capacity(prev.len());
    advance_into(prev, visuals, hover, clock, params, &mut out);
    out
}

// ── Render surface output ──

/// What the host draws for one item this frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameItem<'a> {
    pub index: usize,
    pub label: &'a str,
    pub rank: u32,
    /// Sphere position with the bob applied to y
    pub position: [f32; 3],
    pub font_size: f32,
    pub color: Color,
    pub scale: f32,
    /// Icon reference, only while hovered
    pub icon: Option<&'a str>,
    pub icon_anchor: Option<[f32; 3]>,
}

// ── Controller ──

/// Owns the render-state arena for one mounted cloud.
///
/// Dropping the controller is teardown: any held cursor lease is released.
pub struct AnimationController {
    data: Rc<CloudData>,
    visuals: Rc<[ItemVisual]>,
    states: Vec<RenderState>,
    scratch: Vec<RenderState>,
    hover: HoverSet,
    clock: FrameClock,
    params: AnimationParams,
    icon_offset: f32,
    cursor: Rc<dyn CursorSurface>,
    lease: Option<CursorLease>,
}

impl AnimationController {
    /// Mount over a batch build and its encoded visuals. Only the render
    /// states are created here; placements and sizes are shared.
    pub fn mount(
        data: Rc<CloudData>,
        visuals: Rc<[ItemVisual]>,
        cfg: &CloudConfig,
        palette: &Palette,
        cursor: Rc<dyn CursorSurface>,
    ) -> Self {
        if visuals.len() != data.len() {
            log::warn!(
                "Mounting {} visuals over {} items, extra entries are not drawn",
                visuals.len(),
                data.len()
            );
        }
        let states: Vec<RenderState> = visuals.iter().map(RenderState::at_rest).collect();
        log::info!("Cloud mounted with {} items", states.len());
        Self {
            scratch: Vec::with_capacity(states.len()),
            data,
            visuals,
            states,
            hover: HoverSet::new(),
            clock: FrameClock::default(),
            params: AnimationParams::new(cfg, palette),
            icon_offset: cfg.icon_offset,
            cursor,
            lease: None,
        }
    }

    /// Pointer entered item `index`. Out-of-range indices are ignored.
    pub fn pointer_enter(&mut self, index: usize) -> bool {
        if index >= self.states.len() {
            log::warn!("pointer_enter on unknown item {index} (cloud has {})", self.states.len());
            return false;
        }
        let changed = self.hover.enter(index);
        self.sync_cursor();
        changed
    }

    /// Pointer left item `index`.
    pub fn pointer_leave(&mut self, index: usize) -> bool {
        let changed = self.hover.leave(index);
        self.sync_cursor();
        changed
    }

    /// Leave every hovered item (pointer left the whole view).
    pub fn clear_hover(&mut self) {
        self.hover.clear();
        self.sync_cursor();
    }

    /// Hold the lease exactly while the hover set is non-empty.
    fn sync_cursor(&mut self) {
        match (self.hover.is_empty(), self.lease.is_some()) {
            (false, false) => self.lease = Some(acquire_pointer_cursor(&self.cursor)),
            (true, true) => self.lease = None,
            _ => {}
        }
    }

    /// Advance one frame by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.clock = self.clock.advance(dt);
        advance_into(
            &self.states,
            &self.visuals,
            &self.hover,
            self.clock,
            &self.params,
            &mut self.scratch,
        );
        std::mem::swap(&mut self.states, &mut self.scratch);
    }

    /// Per-item output for the host renderer.
    pub fn frame(&self) -> Vec<FrameItem<'_>> {
        self.data
            .items()
            .iter()
            .zip(self.visuals.iter())
            .zip(&self.states)
            .enumerate()
            .map(|(index, ((item, visual), state))| {
                let [x, y, z] = visual.position;
                let position = [x, y + state.bob_offset, z];
                let hovered = state.is_hovered();
                FrameItem {
                    index,
                    label: item.label.as_str(),
                    rank: item.rank,
                    position,
                    font_size: visual.font_size,
                    color: state.color,
                    scale: state.scale,
                    icon: hovered.then_some(item.icon.as_str()),
                    icon_anchor: hovered.then_some([x, position[1] + self.icon_offset, z]),
                }
            })
            .collect()
    }

    pub fn states(&self) -> &[RenderState] {
        &self.states
    }

    pub fn visuals(&self) -> &[ItemVisual] {
        &self.visuals
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    pub fn hovered(&self) -> impl Iterator<Item = usize> + '_ {
        self.hover.iter()
    }

    pub fn holds_cursor(&self) -> bool {
        self.lease.is_some()
    }

    /// Whether this controller animates `data` (same batch build).
    pub fn is_for(&self, data: &Rc<CloudData>) -> bool {
        Rc::ptr_eq(&self.data, data)
    }

    /// Explicit teardown; same effect as dropping.
    pub fn teardown(self) {}
}

impl Drop for AnimationController {
    fn drop(&mut self) {
        if self.lease.take().is_some() {
            log::info!("Cloud unmounted while hovered, cursor restored");
        } else {
            log::info!("Cloud unmounted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::InterestBatch;
    use crate::render::cursor::testing::RecordingCursor;
    use crate::render::cursor::{CursorCell, CursorStyle};
    use crate::render::style::encode_items;
    use proptest::prelude::*;

    fn example_data() -> Rc<CloudData> {
        let batch = InterestBatch::new(
            ["chess", "poker", "tea", "go"],
            [("chess", 9), ("poker", 8), ("tea", 7), ("go", 2)],
            ["a.png", "b.png", "c.png"],
        );
        Rc::new(CloudData::build(&batch).unwrap())
    }

    fn mount_with(data: Rc<CloudData>, cursor: Rc<dyn CursorSurface>) -> AnimationController {
        let cfg = CloudConfig::default();
        let palette = Palette::default();
        let visuals: Rc<[ItemVisual]> = encode_items(&data, &cfg, &palette).into();
        AnimationController::mount(data, visuals, &cfg, &palette, cursor)
    }

    fn controller(cursor: Rc<dyn CursorSurface>) -> AnimationController {
        mount_with(example_data(), cursor)
    }

    fn close(a: Color, b: Color, eps: f32) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < eps)
    }

    #[test]
    fn test_rest_colors_follow_rank() {
        let mut c = controller(Rc::new(CursorCell::new()));
        let p = Palette::default();
        for _ in 0..10 {
            c.tick(1.0 / 60.0);
        }
        let s = c.states();
        assert_eq!(s[0].color, p.gold);
        assert_eq!(s[1].color, p.silver);
        assert_eq!(s[2].color, p.bronze);
        assert_eq!(s[3].color, p.neutral);
        assert!(s.iter().all(|st| st.scale == 1.0));
    }

    #[test]
    fn test_hover_smooths_toward_highlight() {
        let mut c = controller(Rc::new(CursorCell::new()));
        let p = Palette::default();
        assert!(c.pointer_enter(3));
        // Transition is immediate, visual change waits for the next tick
        assert_eq!(c.states()[3].color, p.neutral);

        c.tick(1.0 / 60.0);
        let s = c.states()[3];
        assert!(s.is_hovered());
        let expected = lerp_color(p.neutral, p.highlight, 0.1);
        assert!(close(s.color, expected, 1e-6));
        assert!((s.scale - 1.03).abs() < 1e-6);

        for _ in 0..400 {
            c.tick(1.0 / 60.0);
        }
        let s = c.states()[3];
        assert!(close(s.color, p.highlight, 1e-4));
        assert!((s.scale - 1.25).abs() < 1e-4);
    }

    #[test]
    fn test_hover_reversible() {
        let mut c = controller(Rc::new(CursorCell::new()));
        let p = Palette::default();
        c.pointer_enter(0);
        for _ in 0..30 {
            c.tick(0.016);
        }
        c.pointer_leave(0);
        for _ in 0..400 {
            c.tick(0.016);
        }
        let s = c.states()[0];
        assert!(!s.is_hovered());
        assert!(close(s.color, p.gold, 1e-4));
        assert!((s.scale - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_bob_uses_shared_clock_and_rank_phase() {
        let mut c = controller(Rc::new(CursorCell::new()));
        c.tick(0.5);
        c.tick(0.25);
        let t = c.clock().elapsed;
        assert!((t - 0.75).abs() < 1e-6);
        for (item, st) in c.data.items().iter().zip(c.states()) {
            let expected = (t * 0.9 + item.rank as f32 * 0.7).sin() * 0.6;
            assert!((st.bob_offset - expected).abs() < 1e-6);
        }
        let frame = c.frame();
        let rest_y = c.visuals()[1].position[1];
        assert!((frame[1].position[1] - (rest_y + c.states()[1].bob_offset)).abs() < 1e-6);
    }

    #[test]
    fn test_icon_only_while_hovered() {
        let mut c = controller(Rc::new(CursorCell::new()));
        c.tick(0.016);
        assert!(c.frame().iter().all(|f| f.icon.is_none() && f.icon_anchor.is_none()));

        c.pointer_enter(3);
        c.tick(0.016);
        let frame = c.frame();
        // Fourth item cycles back to the first icon
        assert_eq!(frame[3].icon, Some("a.png"));
        let anchor = frame[3].icon_anchor.unwrap();
        let offset = CloudConfig::default().icon_offset;
        assert!((anchor[1] - (frame[3].position[1] + offset)).abs() < 1e-6);
        assert!(frame.iter().filter(|f| f.icon.is_some()).count() == 1);

        c.pointer_leave(3);
        c.tick(0.016);
        assert!(c.frame()[3].icon.is_none());
    }

    #[test]
    fn test_cursor_held_while_any_hovered() {
        let rec = Rc::new(RecordingCursor::default());
        let mut c = controller(rec.clone());
        c.pointer_enter(0);
        c.pointer_enter(1);
        assert_eq!(rec.current.get(), CursorStyle::Pointer);
        c.pointer_leave(0);
        assert_eq!(rec.current.get(), CursorStyle::Pointer);
        assert!(c.holds_cursor());
        c.pointer_leave(1);
        assert_eq!(rec.current.get(), CursorStyle::Default);
        // Repeated leave must not release twice
        c.pointer_leave(1);
        assert_eq!(*rec.writes.borrow(), vec![CursorStyle::Pointer, CursorStyle::Default]);
    }

    #[test]
    fn test_teardown_while_hovered_releases_once() {
        let rec = Rc::new(RecordingCursor::default());
        let mut c = controller(rec.clone());
        c.pointer_enter(2);
        c.tick(0.016);
        c.teardown();
        assert_eq!(rec.current.get(), CursorStyle::Default);
        assert_eq!(*rec.writes.borrow(), vec![CursorStyle::Pointer, CursorStyle::Default]);
    }

    #[test]
    fn test_teardown_idle_touches_nothing() {
        let rec = Rc::new(RecordingCursor::default());
        let c = controller(rec.clone());
        drop(c);
        assert!(rec.writes.borrow().is_empty());
    }

    #[test]
    fn test_clear_hover_releases() {
        let rec = Rc::new(RecordingCursor::default());
        let mut c = controller(rec.clone());
        c.pointer_enter(0);
        c.pointer_enter(3);
        c.clear_hover();
        assert!(!c.holds_cursor());
        assert_eq!(c.hovered().count(), 0);
        assert_eq!(rec.writes.borrow().len(), 2);
    }

    #[test]
    fn test_out_of_range_enter_ignored() {
        let rec = Rc::new(RecordingCursor::default());
        let mut c = controller(rec.clone());
        assert!(!c.pointer_enter(99));
        assert!(!c.holds_cursor());
        assert!(rec.writes.borrow().is_empty());
    }

    #[test]
    fn test_pure_advance_leaves_input_untouched() {
        let data = example_data();
        let visuals = encode_items(&data, &CloudConfig::default(), &Palette::default());
        let prev: Vec<RenderState> = visuals.iter().map(RenderState::at_rest).collect();
        let snapshot = prev.clone();
        let mut hover = HoverSet::new();
        hover.enter(1);
        let clock = FrameClock::default().advance(0.016);
        let a = advance(&prev, &visuals, &hover, clock, &AnimationParams::default());
        let b = advance(&prev, &visuals, &hover, clock, &AnimationParams::default());
        assert_eq!(prev, snapshot);
        assert_eq!(a, b);
        assert!(a[1].is_hovered() && !a[0].is_hovered());
    }

    #[test]
    fn test_empty_cloud() {
        let batch = InterestBatch::new(Vec::<&str>::new(), Vec::<(&str, u32)>::new(), ["a.png"]);
        let data = Rc::new(CloudData::build(&batch).unwrap());
        let mut c = mount_with(data, Rc::new(CursorCell::new()));
        c.tick(0.016);
        assert!(c.frame().is_empty());
        assert!(!c.pointer_enter(0));
    }

    proptest! {
        #[test]
        fn prop_hover_sequences_stay_bounded_and_revert(
            events in prop::collection::vec((0usize..4, any::<bool>(), 0u8..5), 0..40)
        ) {
            let rec = Rc::new(RecordingCursor::default());
            let mut c = controller(rec.clone());
            let p = Palette::default();
            for (idx, enter, frames) in events {
                if enter {
                    c.pointer_enter(idx);
                } else {
                    c.pointer_leave(idx);
                }
                for _ in 0..frames {
                    c.tick(0.016);
                    for st in c.states() {
                        prop_assert!(st.scale >= 1.0 && st.scale <= 1.25);
                    }
                }
            }
            c.clear_hover();
            prop_assert_eq!(rec.current.get(), CursorStyle::Default);
            for _ in 0..400 {
                c.tick(0.016);
            }
            let bases = [p.gold, p.silver, p.bronze, p.neutral];
            for (st, base) in c.states().iter().zip(bases) {
                prop_assert!(close(st.color, base, 1e-4));
                prop_assert!((st.scale - 1.0).abs() < 1e-4);
            }
            // Every acquire paired with exactly one release
            let writes = rec.writes.borrow();
            prop_assert_eq!(writes.len() % 2, 0);
        }
    }
}
