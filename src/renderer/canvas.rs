//! `Surface` backed by a browser `CanvasRenderingContext2d`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::Surface;
use crate::assets::{AssetTracker, ImageId};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<ImageId, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            images: HashMap::new(),
        })
    }

    /// Kick off every image load; the tracker is updated from the callbacks
    pub fn load_images(&mut self, tracker: Rc<RefCell<AssetTracker>>) -> Result<(), JsValue> {
        for id in ImageId::all() {
            let img = HtmlImageElement::new()?;

            {
                let tracker = tracker.clone();
                let onload = Closure::<dyn FnMut()>::new(move || {
                    tracker.borrow_mut().mark_loaded(id);
                });
                img.set_onload(Some(onload.as_ref().unchecked_ref()));
                onload.forget();
            }
            {
                let tracker = tracker.clone();
                let onerror = Closure::<dyn FnMut()>::new(move || {
                    tracker.borrow_mut().mark_failed(id);
                });
                img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
                onerror.forget();
            }

            img.set_src(&id.path());
            self.images.insert(id, img);
        }

        log::info!("Loading {} images", self.images.len());
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, w: f32, h: f32) {
        if let Some(img) = self.images.get(&image) {
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    img, x as f64, y as f64, w as f64, h as f64,
                )
                .ok();
        }
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.ctx.translate(offset.x as f64, offset.y as f64).ok();
    }

    fn rotate(&mut self, angle: f32) {
        self.ctx.rotate(angle as f64).ok();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }
}
