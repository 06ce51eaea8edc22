mod handler;
mod model;

pub use handler::{
    comics_by_title, hero_events, similar_by_authors, similar_by_characters, similar_by_series,
};
pub use model::{Pagination, TitleQuery};
