//! CanvasRenderingContext2d backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{BACKDROP, BRICK_RADIUS, brick_rect, corner_radius};
use crate::background::TileSprite;
use crate::consts::MAX_DEVICE_PIXEL_RATIO;

/// Full-screen background canvas
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS pixels
    pub size: Vec2,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            size: Vec2::ZERO,
        })
    }

    /// Match the backing store to the viewport (pixel ratio capped)
    pub fn resize(&mut self, size: Vec2, device_pixel_ratio: f64) -> Result<(), JsValue> {
        let dpr = device_pixel_ratio.clamp(1.0, MAX_DEVICE_PIXEL_RATIO);
        self.size = size;
        self.canvas.set_width((size.x as f64 * dpr) as u32);
        self.canvas.set_height((size.y as f64 * dpr) as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", size.x))?;
        style.set_property("height", &format!("{}px", size.y))?;
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.ctx.scale(dpr, dpr)?;
        Ok(())
    }

    /// Clear and redraw the whole wall
    pub fn draw(&self, sprites: impl Iterator<Item = TileSprite>) -> Result<(), JsValue> {
        let (w, h) = (self.size.x as f64, self.size.y as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(BACKDROP);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        for sprite in sprites {
            self.draw_brick(&sprite)?;
        }
        Ok(())
    }

    fn draw_brick(&self, sprite: &TileSprite) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (pos, size) = brick_rect(sprite.pos, sprite.size);
        if size.x <= 0.0 || size.y <= 0.0 {
            return Ok(());
        }

        ctx.save();
        if sprite.rotation != 0.0 {
            let center = sprite.pos + sprite.size / 2.0;
            ctx.translate(center.x as f64, center.y as f64)?;
            ctx.rotate(sprite.rotation as f64)?;
            ctx.translate(-center.x as f64, -center.y as f64)?;
        }

        let gradient = ctx.create_linear_gradient(
            pos.x as f64,
            pos.y as f64,
            (pos.x + size.x) as f64,
            (pos.y + size.y) as f64,
        );
        gradient.add_color_stop(0.0, &sprite.shade.css(sprite.alpha))?;
        gradient.add_color_stop(1.0, &sprite.color.css(sprite.alpha))?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        self.round_rect(pos, size, corner_radius(BRICK_RADIUS, size))?;
        ctx.fill();

        if let Some(highlight) = sprite.highlight {
            ctx.set_fill_style_str(&format!("rgba(255,255,255,{:.3})", highlight.alpha));
            ctx.fill_rect(
                (sprite.pos.x + 12.0) as f64,
                (sprite.pos.y + 10.0) as f64,
                (sprite.size.x - 24.0).max(0.0) as f64,
                highlight.height as f64,
            );
        }
        ctx.restore();
        Ok(())
    }

    fn round_rect(&self, pos: Vec2, size: Vec2, r: f32) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y, w, h, r) = (
            pos.x as f64,
            pos.y as f64,
            size.x as f64,
            size.y as f64,
            r as f64,
        );
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r)?;
        ctx.arc_to(x + w, y + h, x, y + h, r)?;
        ctx.arc_to(x, y + h, x, y, r)?;
        ctx.arc_to(x, y, x + w, y, r)?;
        ctx.close_path();
        Ok(())
    }
}
