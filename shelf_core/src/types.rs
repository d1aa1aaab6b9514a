//! Core domain types for the Shelf catalog.
//!
//! This module defines the records the catalog stores:
//! - Publications (books and magazines) behind one sum type
//! - Registered library users

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Publication Variants
// ============================================================================

/// A book in the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub page_count: u32,
    pub publisher: String,
    pub isbn: String,
}

impl Book {
    /// Type tag used as the first field of a serialized row
    pub const TYPE: &'static str = "Book";

    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        page_count: u32,
        publisher: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            page_count,
            publisher: publisher.into(),
            isbn: isbn.into(),
        }
    }
}

/// A magazine issue in the catalog
///
/// `month` is nominally 1-12 and `day` has no range; neither is enforced.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Magazine {
    pub title: String,
    pub publisher: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Magazine {
    /// Type tag used as the first field of a serialized row
    pub const TYPE: &'static str = "Magazine";

    pub fn new(
        title: impl Into<String>,
        publisher: impl Into<String>,
        year: i32,
        month: u32,
        day: u32,
    ) -> Self {
        Self {
            title: title.into(),
            publisher: publisher.into(),
            year,
            month,
            day,
        }
    }
}

// ============================================================================
// Publication Sum Type
// ============================================================================

/// Any catalog item
///
/// Equality is structural per variant: a book only equals a book
/// with identical fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type")]
pub enum Publication {
    Book(Book),
    Magazine(Magazine),
}

impl Publication {
    pub fn title(&self) -> &str {
        match self {
            Publication::Book(book) => &book.title,
            Publication::Magazine(magazine) => &magazine.title,
        }
    }

    pub fn publisher(&self) -> &str {
        match self {
            Publication::Book(book) => &book.publisher,
            Publication::Magazine(magazine) => &magazine.publisher,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Publication::Book(book) => book.year,
            Publication::Magazine(magazine) => magazine.year,
        }
    }

    /// The variant's type tag ("Book" or "Magazine")
    pub fn type_tag(&self) -> &'static str {
        match self {
            Publication::Book(_) => Book::TYPE,
            Publication::Magazine(_) => Magazine::TYPE,
        }
    }

    pub fn as_book(&self) -> Option<&Book> {
        match self {
            Publication::Book(book) => Some(book),
            Publication::Magazine(_) => None,
        }
    }

    pub fn as_magazine(&self) -> Option<&Magazine> {
        match self {
            Publication::Magazine(magazine) => Some(magazine),
            Publication::Book(_) => None,
        }
    }

    /// Serialized storage row, e.g. `Book;Dune;Ace;1965;Herbert;412;ISBN1`
    ///
    /// Fails with `Error::UnstorableField` if a text field holds `;` or a
    /// line break.
    pub fn to_row(&self) -> crate::Result<String> {
        crate::codec::encode_publication(self)
    }
}

impl From<Book> for Publication {
    fn from(book: Book) -> Self {
        Publication::Book(book)
    }
}

impl From<Magazine> for Publication {
    fn from(magazine: Magazine) -> Self {
        Publication::Magazine(magazine)
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} title: '{}', publisher: '{}', year: {}",
            self.type_tag(),
            self.title(),
            self.publisher(),
            self.year()
        )?;
        match self {
            Publication::Book(book) => {
                write!(f, ", {}, {}, {}", book.author, book.page_count, book.isbn)
            }
            Publication::Magazine(magazine) => {
                write!(f, ", {}, {}", magazine.month, magazine.day)
            }
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// A registered reader, identified by first and last name
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Type tag used as the first field of a serialized row
    pub const TYPE: &'static str = "User";

    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Serialized storage row, e.g. `User;Ada;Lovelace`
    pub fn to_row(&self) -> crate::Result<String> {
        crate::codec::encode_user(self)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
