pub(crate) mod blur;
pub(crate) mod compositor;
pub(crate) mod dream;
pub(crate) mod effect_id;
pub(crate) mod post;
