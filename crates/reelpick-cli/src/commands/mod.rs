//! Command handlers grouped by concern.

pub(crate) mod browse;
pub(crate) mod catalog;
pub(crate) mod game;
pub(crate) mod home;
pub(crate) mod pick;
pub(crate) mod wishlist;
