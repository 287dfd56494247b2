//! Track catalog: the `Track` descriptor and the directory scanner that
//! produces it.

mod display;
mod model;
mod scan;

pub use model::Track;
pub use scan::scan;

#[cfg(test)]
mod tests;
