use wasm_bindgen::prelude::*;

mod utils;
mod error;
mod config;
mod assets;
mod loading;
mod texels;
mod geometry;
mod material;
mod controls;
mod gui;
mod scene;
mod renderer;


#[wasm_bindgen(start)]
pub fn dummy_main() {
}


#[wasm_bindgen]
pub async fn run() {
    utils::set_panic_hook();
    if let Err(e) = renderer::main().await {
        log!("run(): {}", e);
    }
}
