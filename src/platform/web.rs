//! Browser host: DOM play area, window timers, Web Audio
//!
//! Expected page elements:
//! - `#game-area`: positioned container balloons and effects are added to
//! - `#hud-score`, `#hud-time`: text displays
//! - `#start-btn`, `#restart-btn`: round controls
//! - `#game-over` (toggled with the `hidden` class) containing `#final-score`
//!
//! Pointer and animation events are caught once on `#game-area` and mapped
//! back to balloons through their `data-balloon-id` attribute.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use super::{Host, HostEvent, TimerHandle, TimerKind};
use crate::audio::SoundEngine;
use crate::sim::GameLoop;
use crate::sim::effects::{Particle, Ring};
use crate::sim::state::{Balloon, BalloonId};
use crate::sound::SoundError;

const BALLOON_ID_ATTR: &str = "data-balloon-id";

pub type SharedGame = Rc<RefCell<GameLoop<WebHost>>>;
type Dispatch = Rc<dyn Fn(HostEvent)>;

pub struct WebHost {
    window: Window,
    document: Document,
    area: HtmlElement,
    score: Option<Element>,
    time: Option<Element>,
    panel: Option<Element>,
    final_score: Option<Element>,
    balloons: HashMap<BalloonId, HtmlElement>,
    /// Repeating timer callbacks, dropped on cancel
    intervals: HashMap<i32, Closure<dyn FnMut()>>,
    dispatch: Option<Dispatch>,
    sound: SoundEngine,
}

impl WebHost {
    pub fn new(seed: u64) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let area: HtmlElement = document
            .get_element_by_id("game-area")
            .ok_or("missing #game-area")?
            .dyn_into()?;

        let lookup = |id: &str| {
            let el = document.get_element_by_id(id);
            if el.is_none() {
                log::warn!("#{id} not found, display disabled");
            }
            el
        };

        Ok(Self {
            score: lookup("hud-score"),
            time: lookup("hud-time"),
            panel: lookup("game-over"),
            final_score: lookup("final-score"),
            window,
            document,
            area,
            balloons: HashMap::new(),
            intervals: HashMap::new(),
            dispatch: None,
            sound: SoundEngine::new(seed),
        })
    }

    fn create_div(&self, class: &str) -> Option<HtmlElement> {
        let el: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name(class);
        Some(el)
    }

    fn attach(&self, el: &HtmlElement) -> bool {
        match self.area.append_child(el) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Failed to attach element: {e:?}");
                false
            }
        }
    }

    /// Remove `el` after `delay_ms`
    fn expire(&self, el: HtmlElement, delay_ms: u32) {
        let callback = Closure::once_into_js(move || el.remove());
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            );
    }
}

fn set_styles(el: &HtmlElement, styles: &[(&str, String)]) {
    let style = el.style();
    for (name, value) in styles {
        let _ = style.set_property(name, value);
    }
}

impl Host for WebHost {
    fn schedule(&mut self, kind: TimerKind, period_ms: u32) -> Option<TimerHandle> {
        let Some(dispatch) = self.dispatch.clone() else {
            log::warn!("Timer {kind:?} scheduled before the host was installed");
            return None;
        };
        // The browser assigns the id after the callback is built
        let id = Rc::new(Cell::new(0));
        let fired = {
            let id = id.clone();
            move || (*dispatch)(HostEvent::Timer(kind, TimerHandle(id.get())))
        };

        let result = if kind.repeats() {
            let closure = Closure::<dyn FnMut()>::new(fired);
            let result = self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period_ms as i32,
                );
            if let Ok(handle) = &result {
                self.intervals.insert(*handle, closure);
            }
            result
        } else {
            let callback = Closure::once_into_js(fired);
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    period_ms as i32,
                )
        };

        match result {
            Ok(handle) => {
                id.set(handle);
                Some(TimerHandle(handle))
            }
            Err(e) => {
                log::warn!("Failed to schedule {kind:?}: {e:?}");
                None
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.intervals.remove(&handle.0).is_some() {
            self.window.clear_interval_with_handle(handle.0);
        } else {
            self.window.clear_timeout_with_handle(handle.0);
        }
    }

    fn clear_surface(&mut self) {
        self.area.set_inner_html("");
        self.balloons.clear();
    }

    fn show_balloon(&mut self, balloon: &Balloon) {
        let Some(el) = self.create_div("balloon") else {
            return;
        };
        let _ = el.set_attribute(BALLOON_ID_ATTR, &balloon.id.to_string());
        let size = format!("{}px", balloon.size_px);
        set_styles(
            &el,
            &[
                ("width", size.clone()),
                ("height", size),
                ("left", format!("{}%", balloon.left_percent)),
                ("background", balloon.color.to_hex()),
                ("color", "#fff".to_string()),
                ("animation", format!("floatUp {}ms linear forwards", balloon.rise_ms)),
                ("transform-origin", "50% 80%".to_string()),
            ],
        );
        if self.attach(&el) {
            self.balloons.insert(balloon.id, el);
        }
    }

    fn remove_balloon(&mut self, id: BalloonId) {
        if let Some(el) = self.balloons.remove(&id) {
            el.remove();
        }
    }

    fn balloon_center(&self, id: BalloonId) -> Option<Vec2> {
        let el = self.balloons.get(&id)?;
        let rect = el.get_bounding_client_rect();
        let area = self.area.get_bounding_client_rect();
        Some(Vec2::new(
            (rect.left() - area.left() + rect.width() / 2.0) as f32,
            (rect.top() - area.top() + rect.height() / 2.0) as f32,
        ))
    }

    fn freeze_balloons(&mut self) {
        for el in self.balloons.values() {
            let _ = el.style().set_property("pointer-events", "none");
        }
    }

    fn show_ring(&mut self, ring: &Ring) {
        let Some(el) = self.create_div("pop-ring") else {
            return;
        };
        let size = format!("{}px", ring.size);
        set_styles(
            &el,
            &[
                ("left", format!("{}px", ring.top_left.x)),
                ("top", format!("{}px", ring.top_left.y)),
                ("width", size.clone()),
                ("height", size),
                ("border-color", ring.border.to_hex()),
            ],
        );
        if self.attach(&el) {
            self.expire(el, ring.lifetime_ms);
        }
    }

    fn show_particle(&mut self, particle: &Particle) {
        let Some(el) = self.create_div("particle") else {
            return;
        };
        set_styles(
            &el,
            &[
                ("left", format!("{}px", particle.top_left.x)),
                ("top", format!("{}px", particle.top_left.y)),
                ("background", particle.color.to_hex()),
                ("--dx", format!("{}px", particle.dx)),
                ("--dy", format!("{}px", particle.dy)),
            ],
        );
        if self.attach(&el) {
            self.expire(el, particle.lifetime_ms);
        }
    }

    fn set_score(&mut self, score: u32) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn set_time_left(&mut self, secs: i32) {
        if let Some(el) = &self.time {
            el.set_text_content(Some(&secs.to_string()));
        }
    }

    fn show_game_over(&mut self, final_score: u32) {
        if let Some(el) = &self.final_score {
            el.set_text_content(Some(&final_score.to_string()));
        }
        if let Some(panel) = &self.panel {
            let _ = panel.class_list().remove_1("hidden");
            let _ = panel.set_attribute("aria-hidden", "false");
        }
    }

    fn hide_game_over(&mut self) {
        if let Some(panel) = &self.panel {
            let _ = panel.class_list().add_1("hidden");
            let _ = panel.set_attribute("aria-hidden", "true");
        }
    }

    fn play_pop(&mut self) -> Result<(), SoundError> {
        self.sound.play_pop()
    }
}

/// Balloon the event landed on, if any
fn balloon_under(event: &web_sys::Event) -> Option<BalloonId> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let balloon = target.closest(".balloon").ok()??;
    balloon.get_attribute(BALLOON_ID_ATTR)?.parse().ok().map(BalloonId)
}

/// Wire timers, play area, controls and visibility handling to `game`
pub fn install(game: &SharedGame) {
    let dispatch: Dispatch = {
        let weak = Rc::downgrade(game);
        Rc::new(move |event: HostEvent| {
            let Some(game) = weak.upgrade() else { return };
            match game.try_borrow_mut() {
                Ok(mut g) => g.handle(event),
                Err(_) => log::warn!("Dropped {event:?}: game busy"),
            };
        })
    };
    game.borrow_mut().host_mut().dispatch = Some(dispatch.clone());

    setup_play_area(game, dispatch);
    setup_controls(game);
    setup_visibility(game);
}

fn setup_play_area(game: &SharedGame, dispatch: Dispatch) {
    let area = game.borrow().host().area.clone();

    // Pop on pointer-down or touch-start; a touch fires both, the second is a no-op
    for event_name in ["pointerdown", "touchstart"] {
        let dispatch = dispatch.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            if let Some(id) = balloon_under(&event) {
                event.stop_propagation();
                (*dispatch)(HostEvent::Pop(id));
            }
        });
        let _ = area.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Rise finished (particle and ring animations are not balloons)
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            if let Some(id) = balloon_under(&event) {
                (*dispatch)(HostEvent::RiseEnded(id));
            }
        });
        let _ = area.add_event_listener_with_callback("animationend", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_controls(game: &SharedGame) {
    let document = game.borrow().host().document.clone();

    for id in ["start-btn", "restart-btn"] {
        let Some(btn) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("#{id} not found");
            continue;
        };

        // Click starts a round (no-op while one is running)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Enter on a focused control acts like a click
        {
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    btn_clone.click();
                }
            });
            let _ = btn.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

fn setup_visibility(game: &SharedGame) {
    let document = game.borrow().host().document.clone();
    let document_clone = document.clone();
    let game = game.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
        game.borrow_mut().visibility_changed(hidden);
    });
    let _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}
