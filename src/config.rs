use three_d::{vec3, Srgba, Vec3};


/// Perspective camera placement
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub position: Vec3,
    pub target: Vec3,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            z_near: 0.1,
            z_far: 100.0,
            position: vec3(0.0, 0.0, 10.0),
            target: vec3(0.0, 0.0, 0.0),
        }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub intensity: f32,
    pub color: Srgba,
    /// Ignored for ambient light
    pub position: Vec3,
}


#[derive(Clone, Debug, PartialEq)]
pub struct OrbitConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// World units per pixel of drag, scaled by the distance to the target
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}
impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            pan_speed: 0.001,
            zoom_speed: 0.001,
            min_distance: 1.0,
            max_distance: 50.0,
        }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub position: Vec3,
}


#[derive(Clone, Debug, PartialEq)]
pub struct CuboidConfig {
    pub size: Vec3,
    pub segments: [u32; 3],
    pub position: Vec3,
}


#[derive(Clone, Debug, PartialEq)]
pub struct CylinderConfig {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub position: Vec3,
}


/// All constants of the demo scene
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub canvas_selector: String,
    pub camera: CameraConfig,
    pub ambient_light: LightConfig,
    pub point_light: LightConfig,
    pub orbit: OrbitConfig,
    /// Rotation about +y in radians per second
    pub spin_speed: f32,
    pub sphere: SphereConfig,
    pub cube: CuboidConfig,
    pub cylinder: CylinderConfig,
    pub clear_color: [f32; 4],
}
impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_selector: ".webgl".to_string(),
            camera: CameraConfig::default(),
            ambient_light: LightConfig {
                intensity: 0.5,
                color: Srgba::WHITE,
                position: vec3(0.0, 0.0, 0.0),
            },
            point_light: LightConfig {
                intensity: 0.5,
                color: Srgba::WHITE,
                position: vec3(5.0, 4.0, 5.0),
            },
            orbit: OrbitConfig::default(),
            spin_speed: 0.2,
            sphere: SphereConfig {
                radius: 1.5,
                width_segments: 16,
                height_segments: 16,
                position: vec3(-4.0, 0.0, 0.0),
            },
            cube: CuboidConfig {
                size: vec3(2.5, 2.5, 2.5),
                segments: [180, 180, 180],
                position: vec3(4.0, 0.0, 0.0),
            },
            cylinder: CylinderConfig {
                radius_top: 1.5,
                radius_bottom: 1.5,
                height: 3.0,
                radial_segments: 32,
                height_segments: 64,
                position: vec3(0.0, 0.0, 0.0),
            },
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use three_d::InnerSpace;

    #[test]
    fn objects_sit_side_by_side_on_the_x_axis() {
        let config = SceneConfig::default();
        assert!(config.sphere.position.x < config.cylinder.position.x);
        assert!(config.cylinder.position.x < config.cube.position.x);
        assert_eq!(config.camera.position, vec3(0.0, 0.0, 10.0));
    }

    #[test]
    fn camera_starts_inside_the_zoom_range() {
        let config = SceneConfig::default();
        let distance = (config.camera.position - config.camera.target).magnitude();
        assert!(distance >= config.orbit.min_distance);
        assert!(distance <= config.orbit.max_distance);
    }
}
