use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the viewer before the first frame is drawn.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("'{}' is not a png, bmp, tga, jpg or qoi file, nor a directory", .0.display())]
    InvalidPath(PathBuf),

    #[error("could not load {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not start event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("could not create drawing surface: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
}
