//! Device descriptors and the collaborators they consult

pub mod context;
pub mod graphics;
pub mod keymap;
pub mod video;
