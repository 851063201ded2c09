// Swaptile – A picture swapping puzzle
// Copyright (C) 2023, 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use wasm_bindgen::prelude::*;
use web_sys::console;
use super::geometry::Geometry;
use super::prepare;
use super::puzzle::Puzzle;
use super::session::{DropResult, PuzzleSession};

const BORDER_COLOR: &'static str = "#000";
const IMAGE_INPUT_ID: &'static str = "image-input";
const CANVAS_ID: &'static str = "puzzle-canvas";
const CLEAR_MESSAGE_ID: &'static str = "clear-message";

fn show_error(message: &str) {
    console::log_1(&message.into());

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(message_elem) = document.get_element_by_id("message")
    else {
        return;
    };

    message_elem.set_text_content(Some("An error occurred"));
}

struct Context {
    document: web_sys::Document,
    message: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
        else {
            return Err("failed to get document".to_string());
        };

        let Some(message) = document.get_element_by_id("message")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get message div".to_string());
        };

        Ok(Context {
            document,
            message,
        })
    }
}

type EventClosure = Closure::<dyn Fn(JsValue)>;

// An uploaded image that the browser is still decoding
struct PendingImage {
    generation: u64,
    image: web_sys::HtmlImageElement,
    url: String,
    _load_closure: EventClosure,
    _error_closure: EventClosure,
}

impl PendingImage {
    // Stops the callbacks from firing and releases the object URL
    fn abandon(self) {
        self.image.set_onload(None);
        self.image.set_onerror(None);
        let _ = web_sys::Url::revoke_object_url(&self.url);
    }
}

struct Swaptile {
    context: Context,
    change_closure: Option<EventClosure>,
    pointerdown_closure: Option<EventClosure>,
    pointerup_closure: Option<EventClosure>,
    pointercancel_closure: Option<EventClosure>,
    image_input: web_sys::HtmlInputElement,
    canvas: web_sys::HtmlCanvasElement,
    canvas_context: web_sys::CanvasRenderingContext2d,
    clear_message: web_sys::HtmlElement,
    geometry: Geometry,
    next_generation: u64,
    pending_image: Option<PendingImage>,
    session: Option<PuzzleSession<web_sys::HtmlCanvasElement>>,
}

impl Swaptile {
    fn new(context: Context) -> Result<Box<Swaptile>, String> {
        let Some(image_input) =
            context.document.get_element_by_id(IMAGE_INPUT_ID)
            .and_then(|c| c.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return Err("failed to get image input".to_string());
        };

        let Some(canvas) = context.document.get_element_by_id(CANVAS_ID)
            .and_then(|c| c.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            return Err("failed to get puzzle canvas".to_string());
        };

        let Some(clear_message) =
            context.document.get_element_by_id(CLEAR_MESSAGE_ID)
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get clear message".to_string());
        };

        let geometry = Geometry::default();

        canvas.set_width(geometry.working_size());
        canvas.set_height(geometry.working_size());

        let canvas_context = context_2d(&canvas)?;

        canvas_context.set_stroke_style(&BORDER_COLOR.into());
        canvas_context.set_line_width(1.0);

        let mut swaptile = Box::new(Swaptile {
            context,
            change_closure: None,
            pointerdown_closure: None,
            pointerup_closure: None,
            pointercancel_closure: None,
            image_input,
            canvas,
            canvas_context,
            clear_message,
            geometry,
            next_generation: 0,
            pending_image: None,
            session: None,
        });

        swaptile.create_closures();
        swaptile.set_clear_message_visibility(false);
        swaptile.show_message("Choose a picture to start");

        Ok(swaptile)
    }

    fn create_closures(&mut self) {
        let swaptile_pointer = self as *mut Swaptile;

        let change_closure = EventClosure::new(
            move |_event: JsValue| {
                let swaptile = unsafe { &mut *swaptile_pointer };
                swaptile.handle_image_input_change();
            }
        );

        let _ = self.image_input.add_event_listener_with_callback(
            "change",
            change_closure.as_ref().unchecked_ref(),
        );

        self.change_closure = Some(change_closure);

        let pointerdown_closure = EventClosure::new(
            move |event: JsValue| {
                let swaptile = unsafe { &mut *swaptile_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                swaptile.handle_pointerdown_event(event);
            }
        );

        let _ = self.canvas.add_event_listener_with_callback(
            "pointerdown",
            pointerdown_closure.as_ref().unchecked_ref(),
        );

        self.pointerdown_closure = Some(pointerdown_closure);

        let pointerup_closure = EventClosure::new(
            move |event: JsValue| {
                let swaptile = unsafe { &mut *swaptile_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                swaptile.handle_pointerup_event(event);
            }
        );

        let _ = self.canvas.add_event_listener_with_callback(
            "pointerup",
            pointerup_closure.as_ref().unchecked_ref(),
        );

        self.pointerup_closure = Some(pointerup_closure);

        let pointercancel_closure = EventClosure::new(
            move |event: JsValue| {
                let swaptile = unsafe { &mut *swaptile_pointer };
                let event: web_sys::PointerEvent = event.dyn_into().unwrap();
                swaptile.handle_pointercancel_event(event);
            }
        );

        let _ = self.canvas.add_event_listener_with_callback(
            "pointercancel",
            pointercancel_closure.as_ref().unchecked_ref(),
        );

        self.pointercancel_closure = Some(pointercancel_closure);
    }

    fn show_message(&self, text: &str) {
        self.context.message.set_text_content(Some(text));
        let _ = self.context.message.style().set_property("display", "block");
    }

    fn hide_message(&self) {
        let _ = self.context.message.style().set_property("display", "none");
    }

    fn set_clear_message_visibility(&self, visibility: bool) {
        let _ = self.clear_message.style().set_property(
            "display",
            if visibility { "block" } else { "none" },
        );
    }

    fn handle_image_input_change(&mut self) {
        let Some(file) = self.image_input.files().and_then(|files| files.get(0))
        else {
            return;
        };

        let url = match web_sys::Url::create_object_url_with_blob(&file) {
            Ok(url) => url,
            Err(_) => {
                show_error("Error creating URL for the image");
                return;
            },
        };

        let image = match web_sys::HtmlImageElement::new() {
            Ok(image) => image,
            Err(_) => {
                let _ = web_sys::Url::revoke_object_url(&url);
                show_error("Error creating image element");
                return;
            },
        };

        // Only the most recent upload is allowed to become the puzzle
        if let Some(old_image) = self.pending_image.take() {
            old_image.abandon();
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let swaptile_pointer = self as *mut Swaptile;

        let load_closure = EventClosure::new(move |_event: JsValue| {
            let swaptile = unsafe { &mut *swaptile_pointer };
            swaptile.image_loaded(generation);
        });

        let error_closure = EventClosure::new(move |_event: JsValue| {
            let swaptile = unsafe { &mut *swaptile_pointer };
            swaptile.image_failed(generation);
        });

        image.set_onload(Some(load_closure.as_ref().unchecked_ref()));
        image.set_onerror(Some(error_closure.as_ref().unchecked_ref()));
        image.set_src(&url);

        self.show_message("Loading…");

        self.pending_image = Some(PendingImage {
            generation,
            image,
            url,
            _load_closure: load_closure,
            _error_closure: error_closure,
        });
    }

    fn take_pending_image(&mut self, generation: u64) -> Option<PendingImage> {
        if self.pending_image.as_ref()
            .map(|pending| pending.generation) == Some(generation)
        {
            self.pending_image.take()
        } else {
            console::log_1(
                &format!("Ignoring stale image {}", generation).into()
            );
            None
        }
    }

    fn image_failed(&mut self, generation: u64) {
        if let Some(pending) = self.take_pending_image(generation) {
            pending.abandon();
            self.show_message("The picture couldn’t be loaded");
        }
    }

    fn image_loaded(&mut self, generation: u64) {
        let Some(pending) = self.take_pending_image(generation)
        else {
            return;
        };

        let bitmap = self.prepare_bitmap(&pending.image);

        pending.abandon();

        let bitmap = match bitmap {
            Ok(bitmap) => bitmap,
            Err(e) => {
                console::log_1(&e.into());
                self.show_message("The picture couldn’t be used");
                return;
            },
        };

        let mut puzzle = match Puzzle::new(self.geometry.grid_size()) {
            Ok(puzzle) => puzzle,
            Err(e) => {
                show_error(&e.to_string());
                return;
            },
        };

        puzzle.shuffle_unsolved(&mut rand::thread_rng());

        match PuzzleSession::new(generation, bitmap, self.geometry, puzzle) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                show_error(&e.to_string());
                return;
            },
        }

        self.hide_message();
        self.set_clear_message_visibility(false);
        self.flush_puzzle_changes();
    }

    // Draws the middle square of the image scaled to the working size
    // onto a canvas that isn’t part of the document
    fn prepare_bitmap(
        &self,
        image: &web_sys::HtmlImageElement,
    ) -> Result<web_sys::HtmlCanvasElement, String> {
        let crop = prepare::square_crop(
            image.natural_width(),
            image.natural_height(),
        ).map_err(|e| e.to_string())?;

        let Some(bitmap) = self.context.document.create_element("canvas").ok()
            .and_then(|c| c.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            return Err("failed to create bitmap canvas".to_string());
        };

        let size = self.geometry.working_size();

        bitmap.set_width(size);
        bitmap.set_height(size);

        let bitmap_context = context_2d(&bitmap)?;

        bitmap_context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                crop.x as f64,
                crop.y as f64,
                crop.side as f64,
                crop.side as f64,
                0.0,
                0.0,
                size as f64,
                size as f64,
            )
            .map_err(|_| "failed to draw the image".to_string())?;

        Ok(bitmap)
    }

    fn flush_puzzle_changes(&mut self) {
        let Some(session) = self.session.as_mut()
        else {
            return;
        };

        for (x, y) in session.puzzle_mut().changed_cells() {
            draw_cell(&self.canvas_context, session, x, y);
        }
    }

    fn position_for_event(
        &self,
        event: &web_sys::PointerEvent,
    ) -> Option<(f32, f32)> {
        let Some(target) = event.target()
        else {
            return None;
        };

        let Ok(element) = target.dyn_into::<web_sys::HtmlCanvasElement>()
        else {
            return None;
        };

        if element != self.canvas {
            return None;
        }

        let client_width = element.client_width();

        if client_width <= 0 {
            return None;
        }

        // Convert the pointer coordinates to the pixels of the
        // working bitmap in case the canvas is scaled by the page
        let scale = self.geometry.working_size() as f32 / client_width as f32;

        Some((
            event.offset_x() as f32 * scale,
            event.offset_y() as f32 * scale,
        ))
    }

    fn handle_pointerdown_event(&mut self, event: web_sys::PointerEvent) {
        if !event.is_primary() || event.button() != 0 {
            return;
        }

        event.prevent_default();

        let Some((x, y)) = self.position_for_event(&event)
        else {
            return;
        };

        let Some(session) = self.session.as_mut()
        else {
            return;
        };

        session.pointer_down(x, y);

        if session.is_dragging() {
            let _ = self.canvas.set_pointer_capture(event.pointer_id());
        }
    }

    fn handle_pointerup_event(&mut self, event: web_sys::PointerEvent) {
        if !event.is_primary() || event.button() != 0 {
            return;
        }

        event.prevent_default();

        let position = self.position_for_event(&event);

        let Some(session) = self.session.as_mut()
        else {
            return;
        };

        if !session.is_dragging() {
            return;
        }

        let _ = self.canvas.release_pointer_capture(event.pointer_id());

        let result = match position {
            Some((x, y)) => session.pointer_up(x, y),
            None => {
                session.pointer_cancel();
                DropResult::Cancelled
            },
        };

        if let DropResult::Swapped { solved } = result {
            self.flush_puzzle_changes();
            self.set_clear_message_visibility(solved);
        }
    }

    fn handle_pointercancel_event(&mut self, event: web_sys::PointerEvent) {
        if !event.is_primary() {
            return;
        }

        if let Some(session) = self.session.as_mut() {
            session.pointer_cancel();
        }
    }
}

fn context_2d(
    canvas: &web_sys::HtmlCanvasElement,
) -> Result<web_sys::CanvasRenderingContext2d, String> {
    canvas.get_context("2d").ok()
        .flatten()
        .and_then(|c| c.dyn_into::<web_sys::CanvasRenderingContext2d>().ok())
        .ok_or_else(|| "failed to get 2d context".to_string())
}

fn draw_cell(
    canvas_context: &web_sys::CanvasRenderingContext2d,
    session: &PuzzleSession<web_sys::HtmlCanvasElement>,
    x: u32,
    y: u32,
) {
    let puzzle = session.puzzle();

    let Some(tile) = puzzle.tile_at(x, y).and_then(|id| puzzle.tile(id))
    else {
        return;
    };

    let geometry = session.geometry();
    let (src_x, src_y) = tile.correct_position();
    let (sx, sy, sw, sh) = geometry.cell_bounds(src_x, src_y);
    let (dx, dy, dw, dh) = geometry.cell_bounds(x, y);

    let _ = canvas_context
        .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            session.bitmap(),
            sx as f64,
            sy as f64,
            sw as f64,
            sh as f64,
            dx as f64,
            dy as f64,
            dw as f64,
            dh as f64,
        );

    // Keep the border inside the cell so that redrawing a cell
    // doesn’t leave parts of the border of its neighbours
    canvas_context.stroke_rect(
        dx as f64 + 0.5,
        dy as f64 + 0.5,
        dw as f64 - 1.0,
        dh as f64 - 1.0,
    );
}

#[wasm_bindgen]
pub fn init_swaptile() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let context = match Context::new() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    match Swaptile::new(context) {
        Ok(swaptile) => {
            // Leak the main swaptile object so that it will live as
            // long as the web page
            std::mem::forget(swaptile);
        },
        Err(e) => show_error(&e),
    }
}
