mod central;
mod dialogs;
pub(crate) mod icons;
mod info;
mod results;
mod top;
