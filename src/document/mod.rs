mod load;
mod parse;
mod sample;
mod workspace;

pub use load::load_workspace;
pub use sample::sample_workspace;
pub use workspace::Workspace;
