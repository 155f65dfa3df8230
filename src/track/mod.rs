pub(crate) mod keyframe;
pub(crate) mod light;
pub(crate) mod store;
