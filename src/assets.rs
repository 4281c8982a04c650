//! Fixed texture files served next to the wasm module and the table that
//! binds each of them to a mesh slot.

/// A set of PBR-style maps exported for one material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSet {
    Wood,
    Glass,
    Honeycomb,
}
impl TextureSet {
    pub fn dir(self) -> &'static str {
        match self {
            TextureSet::Wood => "wood",
            TextureSet::Glass => "glass",
            TextureSet::Honeycomb => "honeycomb",
        }
    }

    /// Only the wood set ships a metalness map
    pub fn has_slot(self, slot: TextureSlot) -> bool {
        match slot {
            TextureSlot::Metalness => self == TextureSet::Wood,
            _ => true,
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Color,
    AmbientOcclusion,
    Height,
    Normal,
    Roughness,
    Metalness,
}
impl TextureSlot {
    fn file_name(self) -> &'static str {
        match self {
            TextureSlot::Color => "basecolor.jpg",
            TextureSlot::AmbientOcclusion => "ambientOcclusion.jpg",
            TextureSlot::Height => "height.png",
            TextureSlot::Normal => "normal.jpg",
            TextureSlot::Roughness => "roughness.jpg",
            TextureSlot::Metalness => "metallic.jpg",
        }
    }
}


/// URL of one map of a texture set, if the set has it.
/// Paths are relative so the loader resolves them against the page.
pub fn texture_url(set: TextureSet, slot: TextureSlot) -> Option<String> {
    if !set.has_slot(slot) {
        return None;
    }
    Some(format!("{}/{}", set.dir(), slot.file_name()))
}


/// Cube map faces in +x, -x, +y, -y, +z, -z order
pub fn environment_urls() -> [String; 6] {
    ["px", "nx", "py", "ny", "pz", "nz"].map(|face| format!("environmentMaps/1/{}.jpg", face))
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshId {
    Sphere,
    Cube,
    Cylinder,
}
impl MeshId {
    pub fn label(self) -> &'static str {
        match self {
            MeshId::Sphere => "Sphere",
            MeshId::Cube => "Cube",
            MeshId::Cylinder => "Cylinder",
        }
    }
}


/// One texture file feeding one material slot of one mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    pub mesh: MeshId,
    pub slot: TextureSlot,
    pub set: TextureSet,
}
impl TextureBinding {
    pub fn url(&self) -> Option<String> {
        texture_url(self.set, self.slot)
    }
}


/// Which maps each mesh actually samples
pub fn default_bindings() -> Vec<TextureBinding> {
    use TextureSlot::*;

    let cube = [Color, AmbientOcclusion, Height, Metalness, Roughness, Normal]
        .map(|slot| TextureBinding { mesh: MeshId::Cube, slot, set: TextureSet::Wood });
    let cylinder = [Color, AmbientOcclusion, Height]
        .map(|slot| TextureBinding { mesh: MeshId::Cylinder, slot, set: TextureSet::Glass });
    let sphere = [Color]
        .map(|slot| TextureBinding { mesh: MeshId::Sphere, slot, set: TextureSet::Honeycomb });

    cube.into_iter()
        .chain(cylinder)
        .chain(sphere)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn height_maps_are_png_and_the_rest_jpg() {
        assert_eq!(texture_url(TextureSet::Glass, TextureSlot::Height).as_deref(), Some("glass/height.png"));
        assert_eq!(texture_url(TextureSet::Wood, TextureSlot::Color).as_deref(), Some("wood/basecolor.jpg"));
        assert_eq!(
            texture_url(TextureSet::Honeycomb, TextureSlot::AmbientOcclusion).as_deref(),
            Some("honeycomb/ambientOcclusion.jpg")
        );
    }

    #[test]
    fn metalness_exists_only_for_wood() {
        assert!(texture_url(TextureSet::Wood, TextureSlot::Metalness).is_some());
        assert!(texture_url(TextureSet::Glass, TextureSlot::Metalness).is_none());
        assert!(texture_url(TextureSet::Honeycomb, TextureSlot::Metalness).is_none());
    }

    #[test]
    fn environment_faces_follow_cube_map_order() {
        let urls = environment_urls();
        assert_eq!(urls[0], "environmentMaps/1/px.jpg");
        assert_eq!(urls[3], "environmentMaps/1/ny.jpg");
        assert_eq!(urls[5], "environmentMaps/1/nz.jpg");
    }

    #[test]
    fn urls_keep_the_page_base_when_joined() {
        // the wasm loader joins each path onto the page's base url
        let base = PathBuf::from("http://localhost:8080");
        let bindings = default_bindings();
        let urls = bindings
            .iter()
            .filter_map(|b| b.url())
            .chain(environment_urls());
        for url in urls {
            let joined = base.join(&url);
            assert!(joined.starts_with(&base), "{} dropped the base", url);
            assert!(joined.ends_with(&url));
        }
    }

    #[test]
    fn every_binding_resolves_to_a_unique_file() {
        let bindings = default_bindings();
        assert_eq!(bindings.len(), 10);
        let urls: HashSet<String> = bindings.iter().filter_map(|b| b.url()).collect();
        assert_eq!(urls.len(), bindings.len());
    }

    #[test]
    fn sphere_only_gets_a_color_map() {
        let sphere: Vec<_> = default_bindings()
            .into_iter()
            .filter(|b| b.mesh == MeshId::Sphere)
            .collect();
        assert_eq!(sphere.len(), 1);
        assert_eq!(sphere[0].slot, TextureSlot::Color);
    }
}
