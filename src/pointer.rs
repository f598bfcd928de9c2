//! Pointer tracking and the custom cursor
//!
//! One `SharedPointer` is written by the pointer-move listener and read by the
//! background frame loop and the cursor overlay.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::lerp;

/// Elements whose clicks must not knock bricks out of the wall
pub const NO_POP_SELECTOR: &str = r#"button, a, input, textarea, select, [role="button"], .no-brick"#;
/// Elements that grow the cursor ring as buttons
pub const BUTTON_SELECTOR: &str = r#"button, a, [role="button"]"#;
/// Elements that grow the cursor ring as form fields
pub const FORM_SELECTOR: &str = "input, textarea, select, .no-brick";

/// Cursor smoothing per frame
pub const CURSOR_LERP: f32 = 0.18;
/// Half the ring and dot sizes (for centering)
pub const RING_RADIUS: f32 = 22.0;
pub const DOT_RADIUS: f32 = 6.0;

/// Latest pointer position, shared by handle
#[derive(Debug, Clone, Default)]
pub struct SharedPointer(Rc<Cell<Vec2>>);

impl SharedPointer {
    pub fn new(initial: Vec2) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn set(&self, pos: Vec2) {
        self.0.set(pos);
    }

    pub fn get(&self) -> Vec2 {
        self.0.get()
    }
}

/// What the cursor is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverKind {
    #[default]
    Default,
    Button,
    Form,
}

impl HoverKind {
    pub fn ring_scale(self) -> f32 {
        match self {
            HoverKind::Default => 1.0,
            HoverKind::Button => 1.35,
            HoverKind::Form => 1.12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HoverKind::Default => "default",
            HoverKind::Button => "button",
            HoverKind::Form => "form",
        }
    }
}

/// Ring + dot that trail the pointer
#[derive(Debug, Clone)]
pub struct CursorFollower {
    pointer: SharedPointer,
    pos: Vec2,
    pub hover: HoverKind,
}

impl CursorFollower {
    /// Starts on the pointer's current position
    pub fn new(pointer: SharedPointer) -> Self {
        let pos = pointer.get();
        Self {
            pointer,
            pos,
            hover: HoverKind::Default,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Move one frame toward the pointer
    pub fn update(&mut self) -> Vec2 {
        let target = self.pointer.get();
        self.pos = Vec2::new(
            lerp(self.pos.x, target.x, CURSOR_LERP),
            lerp(self.pos.y, target.y, CURSOR_LERP),
        );
        self.pos
    }

    /// CSS transform for the ring
    pub fn ring_transform(&self) -> String {
        format!(
            "translate3d({:.1}px, {:.1}px, 0) scale({})",
            self.pos.x - RING_RADIUS,
            self.pos.y - RING_RADIUS,
            self.hover.ring_scale()
        )
    }

    /// CSS transform for the dot
    pub fn dot_transform(&self) -> String {
        format!(
            "translate3d({:.1}px, {:.1}px, 0)",
            self.pos.x - DOT_RADIUS,
            self.pos.y - DOT_RADIUS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_between_handles() {
        let writer = SharedPointer::new(Vec2::new(5.0, 5.0));
        let reader = writer.clone();
        writer.set(Vec2::new(100.0, 40.0));
        assert_eq!(reader.get(), Vec2::new(100.0, 40.0));
    }

    #[test]
    fn test_follower_converges() {
        let pointer = SharedPointer::new(Vec2::ZERO);
        let mut cursor = CursorFollower::new(pointer.clone());
        pointer.set(Vec2::new(100.0, 0.0));
        let first = cursor.update();
        assert!((first.x - 18.0).abs() < 1e-4);
        for _ in 0..100 {
            cursor.update();
        }
        assert!((cursor.position().x - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_transforms() {
        let mut cursor = CursorFollower::new(SharedPointer::new(Vec2::new(50.0, 60.0)));
        cursor.hover = HoverKind::Button;
        assert_eq!(cursor.ring_transform(), "translate3d(28.0px, 38.0px, 0) scale(1.35)");
        assert_eq!(cursor.dot_transform(), "translate3d(44.0px, 54.0px, 0)");
    }
}
