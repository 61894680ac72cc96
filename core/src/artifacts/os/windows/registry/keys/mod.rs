pub(crate) mod data;
pub(crate) mod nk;
pub(crate) mod vk;
