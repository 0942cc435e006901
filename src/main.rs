//! Balloon Pop entry point
//!
//! On the web this wires the game to the page. Natively it plays one headless
//! round against the virtual clock and prints the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use balloon_pop::Tuning;
    use balloon_pop::platform::web::{self, WebHost};
    use balloon_pop::sim::GameLoop;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Balloon Pop starting...");

        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;
        let host = WebHost::new(seed)?;
        let game = Rc::new(RefCell::new(GameLoop::new(host, tuning, seed)));

        web::install(&game);

        log::info!("Balloon Pop ready (seed {seed})");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use balloon_pop::Tuning;
    use balloon_pop::platform::HeadlessHost;
    use balloon_pop::sim::GameLoop;

    env_logger::init();
    log::info!("Balloon Pop (native) starting...");
    log::info!("Native mode plays a simulated round - run with `trunk serve` for the web version");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut game = GameLoop::new(HeadlessHost::default(), Tuning::load(), seed);
    game.start();

    // A steady player: sweeps the screen every 1.5s
    while game.state().running {
        game.advance(1500);
        game.press_all();
    }

    let stats = game.host().stats();
    println!("\nRound over");
    println!("  score:     {}", game.state().score);
    println!("  balloons:  {}", stats.balloons_shown);
    println!("  rings:     {}", stats.rings_shown);
    println!("  particles: {}", stats.particles_shown);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
