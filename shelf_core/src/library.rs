//! The in-memory catalog of publications and users.
//!
//! `Library` keeps both collections in insertion order and rejects
//! duplicates. Lookups that can legitimately miss return `Option`/`bool`
//! rather than errors.

use crate::types::{Book, Magazine, Publication, User};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Aggregate root owning every publication and user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    publications: Vec<Publication>,
    #[serde(default)]
    users: Vec<User>,
}

impl Library {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a publication
    ///
    /// Fails with `Error::DuplicateRecord` if an equal publication is
    /// already stored; the catalog is left unchanged in that case.
    pub fn add_publication(&mut self, publication: impl Into<Publication>) -> Result<()> {
        let publication = publication.into();
        if self.publications.contains(&publication) {
            return Err(Error::DuplicateRecord(publication.to_string()));
        }
        self.publications.push(publication);
        Ok(())
    }

    /// Remove the publication equal to `publication`
    ///
    /// Returns `false` if nothing matched.
    pub fn remove_publication(&mut self, publication: &Publication) -> bool {
        match self.publications.iter().position(|p| p == publication) {
            Some(index) => {
                self.publications.remove(index);
                true
            }
            None => false,
        }
    }

    /// Register a user
    ///
    /// Fails with `Error::UserAlreadyExists` if the first/last name pair
    /// is taken.
    pub fn add_user(&mut self, user: User) -> Result<()> {
        if self.users.contains(&user) {
            return Err(Error::UserAlreadyExists(user.to_string()));
        }
        self.users.push(user);
        Ok(())
    }

    /// Publications in insertion order
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    /// Users in insertion order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.publications.iter().filter_map(Publication::as_book)
    }

    pub fn magazines(&self) -> impl Iterator<Item = &Magazine> {
        self.publications.iter().filter_map(Publication::as_magazine)
    }

    /// Publications ordered by `compare`; stored order is untouched
    pub fn sorted_publications<F>(&self, mut compare: F) -> Vec<&Publication>
    where
        F: FnMut(&Publication, &Publication) -> Ordering,
    {
        let mut sorted: Vec<&Publication> = self.publications.iter().collect();
        sorted.sort_by(|a, b| compare(a, b));
        sorted
    }

    /// Users ordered by `compare`; stored order is untouched
    pub fn sorted_users<F>(&self, mut compare: F) -> Vec<&User>
    where
        F: FnMut(&User, &User) -> Ordering,
    {
        let mut sorted: Vec<&User> = self.users.iter().collect();
        sorted.sort_by(|a, b| compare(a, b));
        sorted
    }

    /// First publication whose title matches exactly (case-sensitive)
    pub fn find_publication_by_title(&self, title: &str) -> Option<&Publication> {
        self.publications.iter().find(|p| p.title() == title)
    }

    /// Total number of stored records
    pub fn len(&self) -> usize {
        self.publications.len() + self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty() && self.users.is_empty()
    }
}

/// Case-insensitive ordering on publication titles
pub fn by_title_case_insensitive(a: &Publication, b: &Publication) -> Ordering {
    cmp_ignore_case(a.title(), b.title())
}

/// Case-insensitive ordering on user last names
pub fn by_last_name_case_insensitive(a: &User, b: &User) -> Ordering {
    cmp_ignore_case(&a.last_name, &b.last_name)
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book::new("Dune", "Herbert", 1965, 412, "Ace", "ISBN1")
    }

    fn wired() -> Magazine {
        Magazine::new("Wired", "Cond Nast", 2020, 5, 1)
    }

    #[test]
    fn test_add_publication_keeps_insertion_order() {
        let mut library = Library::new();
        library.add_publication(wired()).unwrap();
        library.add_publication(dune()).unwrap();

        let titles: Vec<_> = library.publications().iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["Wired", "Dune"]);
    }

    #[test]
    fn test_duplicate_publication_rejected() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();

        let result = library.add_publication(dune());
        assert!(matches!(result, Err(Error::DuplicateRecord(_))));
        assert_eq!(library.publications().len(), 1);
    }

    #[test]
    fn test_same_title_different_fields_is_not_duplicate() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();
        library
            .add_publication(Book::new("Dune", "Herbert", 1965, 412, "Ace", "ISBN2"))
            .unwrap();
        assert_eq!(library.publications().len(), 2);
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let mut library = Library::new();
        library.add_user(User::new("Ada", "Lovelace")).unwrap();

        let result = library.add_user(User::new("Ada", "Lovelace"));
        assert!(matches!(result, Err(Error::UserAlreadyExists(_))));
        assert_eq!(library.users().len(), 1);
    }

    #[test]
    fn test_remove_publication() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();
        library.add_publication(wired()).unwrap();

        assert!(library.remove_publication(&Publication::from(dune())));
        assert_eq!(library.publications(), &[Publication::from(wired())]);
    }

    #[test]
    fn test_remove_absent_publication_is_not_an_error() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();
        let before = library.clone();

        assert!(!library.remove_publication(&Publication::from(wired())));
        assert_eq!(library, before);
    }

    #[test]
    fn test_find_by_title_is_case_sensitive() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();

        assert!(library.find_publication_by_title("Dune").is_some());
        assert!(library.find_publication_by_title("dune").is_none());
    }

    #[test]
    fn test_find_by_title_returns_first_match() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();
        library
            .add_publication(Magazine::new("Dune", "Fan Press", 1999, 1, 1))
            .unwrap();

        let found = library.find_publication_by_title("Dune").unwrap();
        assert_eq!(found.type_tag(), "Book");
    }

    #[test]
    fn test_sorted_publications_does_not_mutate_storage() {
        let mut library = Library::new();
        library.add_publication(wired()).unwrap();
        library
            .add_publication(Book::new("anathem", "Stephenson", 2008, 937, "Morrow", "ISBN3"))
            .unwrap();
        library.add_publication(dune()).unwrap();

        let first = library.sorted_publications(by_title_case_insensitive);
        let second = library.sorted_publications(by_title_case_insensitive);
        let titles: Vec<_> = first.iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["anathem", "Dune", "Wired"]);
        assert_eq!(first, second);

        let stored: Vec<_> = library.publications().iter().map(|p| p.title()).collect();
        assert_eq!(stored, vec!["Wired", "anathem", "Dune"]);
    }

    #[test]
    fn test_sorted_users_by_last_name() {
        let mut library = Library::new();
        library.add_user(User::new("Alan", "turing")).unwrap();
        library.add_user(User::new("Ada", "Lovelace")).unwrap();
        library.add_user(User::new("Grace", "Hopper")).unwrap();

        let sorted = library.sorted_users(by_last_name_case_insensitive);
        let names: Vec<_> = sorted.iter().map(|u| u.last_name.as_str()).collect();
        assert_eq!(names, vec!["Hopper", "Lovelace", "turing"]);
        assert_eq!(library.users()[0].last_name, "turing");
    }

    #[test]
    fn test_books_and_magazines_views() {
        let mut library = Library::new();
        library.add_publication(dune()).unwrap();
        library.add_publication(wired()).unwrap();

        assert_eq!(library.books().count(), 1);
        assert_eq!(library.magazines().next().map(|m| m.title.as_str()), Some("Wired"));
        assert_eq!(library.len(), 2);
        assert!(!library.is_empty());
    }
}
