use three_d::*;

use crate::log; // macro import
use crate::assets::{MeshId, TextureSlot};
use crate::config::SceneConfig;
use crate::error::Result;
use crate::geometry::{self, Geometry};
use crate::gui::DebugPanel;
use crate::loading::Loaded;
use crate::material::{tune_sampling, MaterialMaps, MaterialSpec};
use crate::texels::Texels;


/// Rotation about +y after `elapsed` seconds
pub fn spin_angle(speed: f32, elapsed: f32) -> Radians {
    radians(speed * elapsed)
}


/// Places a mesh at `position`, spun in place by `angle`
pub fn object_transform(position: Vec3, angle: Radians) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_angle_y(angle)
}


/// One mesh with the CPU data needed to rebuild its geometry and material maps
struct SceneObject {
    id: MeshId,
    position: Vec3,
    base: Geometry,
    spec: MaterialSpec,
    maps: MaterialMaps,
    model: Gm<Mesh, PhysicalMaterial>,
}
impl SceneObject {
    fn new(context: &Context, id: MeshId, position: Vec3, base: Geometry) -> Self {
        let spec = MaterialSpec::for_mesh(id);
        let model = Gm::new(
            Mesh::new(context, &base.to_cpu_mesh()),
            PhysicalMaterial::new_opaque(context, &spec.to_cpu_material()),
        );
        log!(
            "SceneObject::new(): {} with {} vertices, {} triangles",
            id.label(),
            base.vertex_count(),
            base.triangle_count()
        );
        Self {
            id,
            position,
            base,
            spec,
            maps: MaterialMaps::default(),
            model,
        }
    }

    fn bind(&mut self, context: &Context, slot: TextureSlot, texture: &CpuTexture) -> Result<()> {
        let material = &mut self.model.material;
        match slot {
            TextureSlot::Color => {
                material.albedo_texture = Some(Texture2DRef::from_cpu_texture(context, texture));
            }
            TextureSlot::AmbientOcclusion => {
                material.occlusion_texture = Some(Texture2DRef::from_cpu_texture(context, texture));
            }
            TextureSlot::Normal => {
                material.normal_texture = Some(Texture2DRef::from_cpu_texture(context, texture));
            }
            TextureSlot::Height => {
                let height = Texels::from_cpu_texture(texture)?;
                let displaced = self.base.displaced(
                    &height,
                    self.spec.displacement_scale,
                    self.spec.displacement_bias,
                );
                self.model.geometry = Mesh::new(context, &displaced.to_cpu_mesh());
            }
            TextureSlot::Metalness | TextureSlot::Roughness => {
                let texels = Texels::from_cpu_texture(texture)?;
                if let Some(packed) = self.maps.insert(slot, texels) {
                    material.metallic_roughness_texture =
                        Some(Texture2DRef::from_cpu_texture(context, &packed));
                }
            }
        }
        Ok(())
    }
}


/// Three spinning primitives, two lights and an optional environment box
pub struct DemoScene {
    context: Context,
    objects: Vec<SceneObject>,
    ambient: AmbientLight,
    point: PointLight,
    skybox: Option<Skybox>,
    spin_speed: f32,
}
impl DemoScene {
    pub fn new(context: &Context, config: &SceneConfig) -> Self {
        let sphere = &config.sphere;
        let cube = &config.cube;
        let cylinder = &config.cylinder;

        let objects = vec![
            SceneObject::new(
                context,
                MeshId::Sphere,
                sphere.position,
                geometry::sphere(sphere.radius, sphere.width_segments, sphere.height_segments),
            ),
            SceneObject::new(
                context,
                MeshId::Cube,
                cube.position,
                geometry::cuboid(cube.size.x, cube.size.y, cube.size.z, cube.segments),
            ),
            SceneObject::new(
                context,
                MeshId::Cylinder,
                cylinder.position,
                geometry::cylinder(
                    cylinder.radius_top,
                    cylinder.radius_bottom,
                    cylinder.height,
                    cylinder.radial_segments,
                    cylinder.height_segments,
                ),
            ),
        ];

        let ambient = AmbientLight::new(
            context,
            config.ambient_light.intensity,
            config.ambient_light.color,
        );
        let point = PointLight::new(
            context,
            config.point_light.intensity,
            config.point_light.color,
            &config.point_light.position,
            Attenuation::default(),
        );

        let mut scene = Self {
            context: context.clone(),
            objects,
            ambient,
            point,
            skybox: None,
            spin_speed: config.spin_speed,
        };
        scene.update(0.0);
        scene
    }

    pub fn has_environment(&self) -> bool {
        self.skybox.is_some()
    }

    /// Spins every object to its pose at `elapsed` seconds
    pub fn update(&mut self, elapsed: f32) {
        let angle = spin_angle(self.spin_speed, elapsed);
        for object in self.objects.iter_mut() {
            object.model.set_transformation(object_transform(object.position, angle));
        }
    }

    pub fn apply_panel(&mut self, panel: &DebugPanel) {
        for object in self.objects.iter_mut() {
            panel.write_to(object.id, &mut object.spec);
            object.spec.apply_to(&mut object.model.material);
        }
    }

    /// Hands a finished download to the mesh it belongs to
    pub fn receive(&mut self, loaded: Loaded) -> Result<()> {
        match loaded {
            Loaded::Texture { binding, texture } => {
                let Some(object) = self.objects.iter_mut().find(|o| o.id == binding.mesh) else {
                    return Ok(());
                };
                let mut texture = (*texture).clone();
                tune_sampling(&binding, &mut texture);
                object.bind(&self.context, binding.slot, &texture)?;
                log!("DemoScene::receive(): {:?} map bound to {}", binding.slot, binding.mesh.label());
            }
            Loaded::Environment { faces } => {
                let [right, left, top, bottom, front, back] = &*faces;
                self.skybox = Some(Skybox::new(&self.context, right, left, top, bottom, front, back));
                log!("DemoScene::receive(): environment map ready");
            }
        }
        Ok(())
    }

    pub fn render(&self, target: &RenderTarget, camera: &Camera, show_environment: bool) {
        if show_environment {
            if let Some(skybox) = self.skybox.as_ref() {
                target.render(camera, std::iter::once(skybox), &[]);
            }
        }
        let lights: [&dyn Light; 2] = [&self.ambient, &self.point];
        target.render(camera, self.objects.iter().map(|o| &o.model), &lights);
    }
}
