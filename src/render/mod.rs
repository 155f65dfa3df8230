pub(crate) mod adapter;
pub(crate) mod camera;
pub(crate) mod cpu;
pub(crate) mod screen;
pub(crate) mod vertex;
