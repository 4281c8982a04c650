use three_d::{
    CpuMaterial, CpuTexture, Interpolation, LightingModel, PhysicalMaterial, Srgba, TextureData,
};

use crate::assets::{MeshId, TextureBinding, TextureSet, TextureSlot};
use crate::texels::Texels;


/// Blinn-Phong specular exponent to microfacet roughness, `sqrt(2 / (n + 2))`
pub fn roughness_from_shininess(shininess: f32) -> f32 {
    (2.0 / (shininess.max(0.0) + 2.0)).sqrt().clamp(0.0, 1.0)
}


/// Surface parameters of one mesh
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSpec {
    pub name: String,
    pub albedo: Srgba,
    pub metalness: f32,
    pub roughness: f32,
    pub ao_intensity: f32,
    pub normal_scale: f32,
    pub displacement_scale: f32,
    pub displacement_bias: f32,
}
impl MaterialSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            albedo: Srgba::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            ao_intensity: 1.0,
            normal_scale: 1.0,
            displacement_scale: 1.0,
            displacement_bias: 0.0,
        }
    }

    /// Shiny dielectric described by a specular exponent
    pub fn phong(name: &str, shininess: f32) -> Self {
        Self {
            roughness: roughness_from_shininess(shininess),
            ..Self::new(name)
        }
    }

    pub fn for_mesh(mesh: MeshId) -> Self {
        match mesh {
            MeshId::Cube => Self {
                metalness: 0.45,
                roughness: 0.65,
                ao_intensity: 0.1,
                normal_scale: 0.5,
                displacement_scale: 0.1,
                displacement_bias: -0.03,
                ..Self::new("cube")
            },
            MeshId::Cylinder => Self {
                ao_intensity: 0.1,
                displacement_scale: 0.01,
                ..Self::phong("cylinder", 100.0)
            },
            MeshId::Sphere => Self::phong("sphere", 100.0),
        }
    }

    pub fn to_cpu_material(&self) -> CpuMaterial {
        CpuMaterial {
            name: self.name.clone(),
            albedo: self.albedo,
            metallic: self.metalness,
            roughness: self.roughness,
            occlusion_strength: self.ao_intensity,
            normal_scale: self.normal_scale,
            lighting_model: LightingModel::Phong,
            ..Default::default()
        }
    }

    /// Pushes the scalar parameters into a live GPU material
    pub fn apply_to(&self, material: &mut PhysicalMaterial) {
        material.albedo = self.albedo;
        material.metallic = self.metalness;
        material.roughness = self.roughness;
        material.occlusion_strength = self.ao_intensity;
        material.normal_scale = self.normal_scale;
    }
}


/// The wood colour map is sampled without mipmaps and with nearest minification
pub fn tune_sampling(binding: &TextureBinding, texture: &mut CpuTexture) {
    if binding.set == TextureSet::Wood && binding.slot == TextureSlot::Color {
        texture.mip_map_filter = None;
        texture.min_filter = Interpolation::Nearest;
    }
}


/// Builds the combined map `three-d` expects: green = roughness, blue = metalness.
/// A missing map contributes full intensity so the scalar factor alone applies.
pub fn pack_metallic_roughness(
    metalness: Option<&Texels>,
    roughness: Option<&Texels>,
) -> Option<CpuTexture> {
    let width = metalness.iter().chain(roughness.iter()).map(|t| t.width()).max()?;
    let height = metalness.iter().chain(roughness.iter()).map(|t| t.height()).max()?;
    let channel = |texels: Option<&Texels>| match texels {
        Some(t) => t.resampled(width, height).to_u8(),
        None => vec![255; (width * height) as usize],
    };
    let (blue, green) = (channel(metalness), channel(roughness));

    let data = green
        .iter()
        .zip(&blue)
        .map(|(&g, &b)| [255, g, b, 255])
        .collect();
    Some(CpuTexture {
        name: "metallic_roughness".to_string(),
        data: TextureData::RgbaU8(data),
        width,
        height,
        ..Default::default()
    })
}


/// Latest metalness and roughness maps of one mesh; either may arrive first
#[derive(Default)]
pub struct MaterialMaps {
    metalness: Option<Texels>,
    roughness: Option<Texels>,
}
impl MaterialMaps {
    /// Stores the map and returns the repacked texture, or `None` for other slots
    pub fn insert(&mut self, slot: TextureSlot, texels: Texels) -> Option<CpuTexture> {
        match slot {
            TextureSlot::Metalness => self.metalness = Some(texels),
            TextureSlot::Roughness => self.roughness = Some(texels),
            _ => return None,
        }
        pack_metallic_roughness(self.metalness.as_ref(), self.roughness.as_ref())
    }
}
