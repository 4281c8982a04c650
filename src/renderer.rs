use std::{
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}},
};
use three_d::*;

use crate::log; // macro import
use crate::assets::{default_bindings, environment_urls};
use crate::config::SceneConfig;
use crate::controls::OrbitControl;
use crate::error::Result;
use crate::gui::{show_error, DebugPanel, PanelInfo};
use crate::loading::{logging_manager, TextureLoader};
use crate::scene::DemoScene;
use crate::utils::*;


/// Keeps the camera projection in step with the canvas size
#[derive(Default)]
pub struct ViewportTracker {
    last: Option<Viewport>,
}
impl ViewportTracker {
    /// Returns true when the viewport differs from the previous frame
    pub fn update(&mut self, camera: &mut Camera, viewport: Viewport) -> bool {
        if self.last == Some(viewport) {
            return false;
        }
        self.last = Some(viewport);
        camera.set_viewport(viewport);
        true
    }
}


#[cfg(target_arch = "wasm32")]
fn find_canvas(selector: &str) -> Result<web_sys::HtmlCanvasElement> {
    use wasm_bindgen::JsCast;

    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector(selector).ok().flatten())
        .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or_else(|| crate::error::DemoError::CanvasNotFound(selector.to_string()))
}


pub async fn main() -> Result<()> {
    let config = SceneConfig::default();
    let error_flag = Arc::new(AtomicBool::new(false));
    let error_msg = Arc::new(Mutex::new(String::new()));

    log!("main(): canvas size: {}x{}", get_canvas_width(), get_canvas_height());

    let window = Window::new(WindowSettings {
        title: "Textured primitives".to_string(),
        #[cfg(target_arch = "wasm32")]
        canvas: Some(find_canvas(&config.canvas_selector)?),
        ..Default::default()
    })?;
    let context = window.gl();
    log!("main(): OpenGL version: {:?}", context.version());

    // every request is registered before the first frame so the progress bar knows the total
    let manager = Rc::new(RefCell::new(logging_manager()));
    let bindings = default_bindings();
    let (loader, mut rx_loaded) = TextureLoader::new(Rc::clone(&manager), bindings.len() + 1);
    for binding in bindings {
        loader.load(binding);
    }
    loader.load_cube(environment_urls());

    let mut scene = DemoScene::new(&context, &config);

    let mut camera = Camera::new_perspective(
        window.viewport(),
        config.camera.position,
        config.camera.target,
        vec3(0.0, 1.0, 0.0),
        degrees(config.camera.fov_degrees),
        config.camera.z_near,
        config.camera.z_far,
    );
    let mut orbit_control = OrbitControl::new(config.camera.target, config.orbit.clone());
    let mut viewport_tracker = ViewportTracker::default();

    let mut gui = three_d::GUI::new(&context);
    let mut panel = DebugPanel::default();
    let mut pointer_over_gui = false;
    let mut frame_prev = get_time_milliseconds();
    let mut fps_ma = IncrementalMA::new(100);
    scene.apply_panel(&panel);

    let [r, g, b, a] = config.clear_color;

    window.render_loop(move |mut frame_input| {
        let now = get_time_milliseconds();
        let fps = fps_ma.add(1000.0 / (now - frame_prev));
        frame_prev = now;

        // window resize
        if viewport_tracker.update(&mut camera, frame_input.viewport) {
            log!(
                "main(): viewport {}x{}, aspect {:.3}",
                frame_input.viewport.width,
                frame_input.viewport.height,
                frame_input.viewport.aspect()
            );
        }

        // non-blocking (i.e., no atomic.wait)
        while let Ok(loaded) = rx_loaded.try_recv() {
            if let Err(e) = scene.receive(loaded) {
                log!("main(): {}", e);
                set_error_for_egui(&error_flag, &error_msg, e.to_string());
            }
        }

        let info = PanelInfo {
            loading: manager.borrow().status(),
            fps,
            environment_ready: scene.has_environment(),
            viewport: (frame_input.viewport.width, frame_input.viewport.height),
        };
        let mut panel_changed = false;
        gui.update(
            &mut frame_input.events,
            frame_input.accumulated_time,
            frame_input.viewport,
            frame_input.device_pixel_ratio,
            |gui_context| {
                pointer_over_gui = gui_context.is_using_pointer();

                if error_flag.load(Ordering::Relaxed) {
                    if let Ok(msg) = error_msg.lock() {
                        show_error(gui_context, &msg);
                    }
                }
                panel_changed = panel.show(gui_context, &info);
            },
        );
        if panel_changed {
            scene.apply_panel(&panel);
        }

        if !pointer_over_gui {
            orbit_control.handle_events(&camera, &mut frame_input.events);
        }
        orbit_control.update(&mut camera);

        scene.update((frame_input.accumulated_time / 1000.0) as f32);

        let screen = frame_input.screen();
        screen.clear(ClearState::color_and_depth(r, g, b, a, 1.0));
        scene.render(&screen, &camera, panel.show_environment);
        gui.render();

        // Returns default frame output to end the frame
        FrameOutput::default()
    });

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new_perspective(
            Viewport::new_at_origo(800, 600),
            vec3(0.0, 0.0, 10.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            degrees(50.0),
            0.1,
            100.0,
        )
    }

    #[test]
    fn resize_updates_aspect_and_projection() {
        let mut camera = camera();
        let mut tracker = ViewportTracker::default();
        assert!(tracker.update(&mut camera, Viewport::new_at_origo(800, 600)));

        let before = *camera.projection();
        assert!(tracker.update(&mut camera, Viewport::new_at_origo(1920, 1080)));
        assert_eq!(camera.viewport().width, 1920);
        assert_eq!(camera.viewport().height, 1080);
        assert!((camera.viewport().aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        assert_ne!(*camera.projection(), before);
    }

    #[test]
    fn unchanged_viewport_is_not_reported() {
        let mut camera = camera();
        let mut tracker = ViewportTracker::default();
        tracker.update(&mut camera, Viewport::new_at_origo(640, 480));
        assert!(!tracker.update(&mut camera, Viewport::new_at_origo(640, 480)));
    }
}
