mod interaction;
mod project;
mod view;

pub use project::{NodeRole, Projection, RenderableView, kind_rank, project};

pub(in crate::app) use view::fuzzy_match_score;
