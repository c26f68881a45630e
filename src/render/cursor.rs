/// Ambient pointer cursor as a scoped resource.
///
/// The cursor style is the one piece of state shared outside the cloud.
/// `acquire_pointer_cursor` switches it to `Pointer` and hands back a
/// `CursorLease`; dropping the lease restores whatever style was active
/// before. Drop runs exactly once on every exit path (hover ends,
/// controller torn down, panic unwind), so the cursor cannot leak.
///
/// No egui types here: hosts implement `CursorSurface` for their toolkit.

use std::cell::Cell;
use std::rc::Rc;

/// Cursor affordances the cloud cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Host-side cursor. Single-threaded, interior mutability.
pub trait CursorSurface {
    fn style(&self) -> CursorStyle;
    fn set_style(&self, style: CursorStyle);
}

/// Plain cell-backed surface; hosts read it once per frame.
#[derive(Debug, Default)]
pub struct CursorCell {
    style: Cell<CursorStyle>,
}

impl CursorCell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CursorSurface for CursorCell {
    fn style(&self) -> CursorStyle {
        self.style.get()
    }

    fn set_style(&self, style: CursorStyle) {
        self.style.set(style);
    }
}

/// Held while at least one item is hovered. Restores the prior style on drop.
pub struct CursorLease {
    surface: Rc<dyn CursorSurface>,
    prior: CursorStyle,
}

impl CursorLease {
    /// Style that will be restored on release
    pub fn prior(&self) -> CursorStyle {
        self.prior
    }

    /// Release explicitly. Equivalent to dropping.
    pub fn release(self) {}
}

impl Drop for CursorLease {
    fn drop(&mut self) {
        log::trace!("cursor released, restoring {:?}", self.prior);
        self.surface.set_style(self.prior);
    }
}

impl std::fmt::Debug for CursorLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorLease").field("prior", &self.prior).finish()
    }
}

/// Switch `surface` to the pointer style until the returned lease is dropped.
pub fn acquire_pointer_cursor(surface: &Rc<dyn CursorSurface>) -> CursorLease {
    let prior = surface.style();
    surface.set_style(CursorStyle::Pointer);
    log::trace!("cursor acquired (prior {:?})", prior);
    CursorLease {
        surface: Rc::clone(surface),
        prior,
    }
}
