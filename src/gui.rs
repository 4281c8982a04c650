use three_d::egui;

use crate::assets::MeshId;
use crate::loading::LoadingStatus;
use crate::material::{roughness_from_shininess, MaterialSpec};


const SHININESS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=200.0;


/// Read-only values shown next to the sliders
pub struct PanelInfo {
    pub loading: LoadingStatus,
    pub fps: f64,
    pub environment_ready: bool,
    pub viewport: (u32, u32),
}


/// Slider state of the debug panel, one folder per mesh
#[derive(Clone, Debug, PartialEq)]
pub struct DebugPanel {
    pub cube_metalness: f32,
    pub cube_roughness: f32,
    pub sphere_shininess: f32,
    pub cylinder_shininess: f32,
    pub show_environment: bool,
}
impl Default for DebugPanel {
    fn default() -> Self {
        let cube = MaterialSpec::for_mesh(MeshId::Cube);
        Self {
            cube_metalness: cube.metalness,
            cube_roughness: cube.roughness,
            sphere_shininess: 100.0,
            cylinder_shininess: 100.0,
            show_environment: false,
        }
    }
}
impl DebugPanel {
    /// Copies the slider values of one mesh into its material parameters
    pub fn write_to(&self, mesh: MeshId, spec: &mut MaterialSpec) {
        match mesh {
            MeshId::Cube => {
                spec.metalness = self.cube_metalness.clamp(0.0, 1.0);
                spec.roughness = self.cube_roughness.clamp(0.0, 1.0);
            }
            MeshId::Sphere => spec.roughness = roughness_from_shininess(self.sphere_shininess),
            MeshId::Cylinder => spec.roughness = roughness_from_shininess(self.cylinder_shininess),
        }
    }

    /// Draws the panel. Returns true when a value changed.
    pub fn show(&mut self, gui_context: &egui::Context, info: &PanelInfo) -> bool {
        let mut changed = false;

        if !info.loading.is_done() {
            egui::Window::new("Loading...")
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(gui_context, |ui| {
                    let progress_bar = egui::ProgressBar::new(info.loading.fraction())
                        .show_percentage()
                        .animate(false);
                    ui.add(progress_bar);
                });
        }

        egui::Window::new("Debug")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .show(gui_context, |ui| {
                egui::CollapsingHeader::new(MeshId::Cube.label())
                    .default_open(true)
                    .show(ui, |ui| {
                        changed |= ui.add(
                            egui::Slider::new(&mut self.cube_metalness, 0.0..=1.0)
                                .step_by(0.001)
                                .text("metalness"),
                        ).changed();
                        changed |= ui.add(
                            egui::Slider::new(&mut self.cube_roughness, 0.0..=1.0)
                                .step_by(0.001)
                                .text("roughness"),
                        ).changed();
                    });

                egui::CollapsingHeader::new(MeshId::Sphere.label()).show(ui, |ui| {
                    changed |= ui.add(
                        egui::Slider::new(&mut self.sphere_shininess, SHININESS_RANGE).text("shininess"),
                    ).changed();
                });

                egui::CollapsingHeader::new(MeshId::Cylinder.label()).show(ui, |ui| {
                    changed |= ui.add(
                        egui::Slider::new(&mut self.cylinder_shininess, SHININESS_RANGE).text("shininess"),
                    ).changed();
                });

                ui.separator();
                changed |= ui.add_enabled(
                    info.environment_ready,
                    egui::Checkbox::new(&mut self.show_environment, "Environment"),
                ).changed();

                egui::Grid::new("stats_grid")
                    .num_columns(2)
                    .spacing([40.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.add(egui::Label::new("FPS"));
                        ui.label(format!("{:.2}", info.fps));
                        ui.end_row();

                        ui.add(egui::Label::new("Textures"));
                        ui.label(format!("{}/{}", info.loading.loaded, info.loading.total));
                        ui.end_row();

                        if info.loading.failed > 0 {
                            ui.add(egui::Label::new("Failed"));
                            ui.colored_label(egui::Color32::RED, format!("{}", info.loading.failed));
                            ui.end_row();
                        }

                        ui.add(egui::Label::new("Window Size"));
                        ui.label(format!("{}x{}", info.viewport.0, info.viewport.1));
                        ui.end_row();
                    });
            });

        changed
    }
}


/// Centred window listing fatal errors
pub fn show_error(gui_context: &egui::Context, message: &str) {
    egui::Window::new("Error")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(gui_context, |ui| {
            ui.colored_label(egui::Color32::RED, message);
        });
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_scene_materials() {
        let panel = DebugPanel::default();
        assert_eq!(panel.cube_metalness, 0.45);
        assert_eq!(panel.cube_roughness, 0.65);
        assert!(!panel.show_environment);

        for mesh in [MeshId::Sphere, MeshId::Cube, MeshId::Cylinder] {
            let original = MaterialSpec::for_mesh(mesh);
            let mut spec = original.clone();
            panel.write_to(mesh, &mut spec);
            assert!((spec.roughness - original.roughness).abs() < 1e-6, "{:?}", mesh);
        }
    }

    #[test]
    fn cube_sliders_write_clamped_values() {
        let panel = DebugPanel { cube_metalness: 1.5, cube_roughness: -0.2, ..DebugPanel::default() };
        let mut spec = MaterialSpec::for_mesh(MeshId::Cube);
        panel.write_to(MeshId::Cube, &mut spec);
        assert_eq!((spec.metalness, spec.roughness), (1.0, 0.0));
    }

    #[test]
    fn shininess_only_touches_its_own_mesh() {
        let panel = DebugPanel { sphere_shininess: 1.0, ..DebugPanel::default() };
        let mut sphere = MaterialSpec::for_mesh(MeshId::Sphere);
        let mut cylinder = MaterialSpec::for_mesh(MeshId::Cylinder);
        panel.write_to(MeshId::Sphere, &mut sphere);
        panel.write_to(MeshId::Cylinder, &mut cylinder);
        assert!(sphere.roughness > cylinder.roughness);
        assert_eq!(cylinder, MaterialSpec::for_mesh(MeshId::Cylinder));
    }
}
