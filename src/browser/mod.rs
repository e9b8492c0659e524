pub mod headless;

pub use headless::{with_render_session, RenderOptions, RenderSession};
