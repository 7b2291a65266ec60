//! Shared fixtures for the entity adapter tests.

#![allow(dead_code, unused_imports)]

use entity_store::entity::{Changes, EntityAdapter, EntityState, Policy};

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub idx: String,
    pub title: String,
}

/// Sparse patch for a [`Book`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub idx: Option<String>,
    pub title: Option<String>,
}

impl Changes<Book> for BookChanges {
    fn apply(&self, entity: &Book) -> Book {
        Book {
            idx: self.idx.clone().unwrap_or_else(|| entity.idx.clone()),
            title: self.title.clone().unwrap_or_else(|| entity.title.clone()),
        }
    }

    fn into_entity(self) -> Option<Book> {
        Some(Book {
            idx: self.idx?,
            title: self.title?,
        })
    }
}

pub fn book(idx: &str, title: &str) -> Book {
    Book {
        idx: idx.to_string(),
        title: title.to_string(),
    }
}

pub fn the_great_gatsby() -> Book {
    book("tgg", "The Great Gatsby")
}

pub fn a_clockwork_orange() -> Book {
    book("aco", "A Clockwork Orange")
}

pub fn animal_farm() -> Book {
    book("af", "Animal Farm")
}

pub fn title(title: &str) -> BookChanges {
    BookChanges {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

pub fn idx(idx: &str) -> BookChanges {
    BookChanges {
        idx: Some(idx.to_string()),
        ..Default::default()
    }
}

pub fn idx_and_title(idx: &str, title: &str) -> BookChanges {
    BookChanges {
        idx: Some(idx.to_string()),
        title: Some(title.to_string()),
    }
}

pub fn key(id: &str) -> String {
    id.to_string()
}

pub fn unsorted_adapter() -> EntityAdapter<String, Book> {
    EntityAdapter::new(Policy::new(|b: &Book| b.idx.clone()))
}

pub fn sorted_adapter() -> EntityAdapter<String, Book> {
    EntityAdapter::new(
        Policy::new(|b: &Book| b.idx.clone()).with_sort_comparer(|a, b| a.title.cmp(&b.title)),
    )
}

pub fn ids(state: &EntityState<String, Book>) -> Vec<&str> {
    state.ids().iter().map(String::as_str).collect()
}

pub fn titles(state: &EntityState<String, Book>) -> Vec<&str> {
    state.iter().map(|b| b.title.as_str()).collect()
}
