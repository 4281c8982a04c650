use thiserror::Error;


/// Everything that can go wrong while setting up or feeding the scene
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("no canvas element matches `{0}`")]
    CanvasNotFound(String),

    #[error("could not create the render window: {0}")]
    Window(#[from] three_d::WindowError),

    #[error("could not load `{url}`: {source}")]
    Asset {
        url: String,
        #[source]
        source: three_d_asset::Error,
    },

    #[error("`{0}` has a texel format that cannot be read as a single channel")]
    UnsupportedTexels(String),

    #[error("`{name}` holds {actual} texels but is declared as {width}x{height}")]
    TexelCount {
        name: String,
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, DemoError>;
