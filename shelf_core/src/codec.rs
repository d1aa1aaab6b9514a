//! Line-oriented row format for persisting a `Library`.
//!
//! One record per line, fields separated by `;`, type tag first:
//!
//! ```text
//! Book;<title>;<publisher>;<year>;<author>;<pageCount>;<isbn>
//! Magazine;<title>;<publisher>;<year>;<month>;<day>
//! User;<firstName>;<lastName>
//! ```
//!
//! All publications are written before all users, each in catalog order.
//! Fields are written verbatim with no quoting, so a text field holding
//! `;` or a line break cannot be stored and is rejected on encode.

use crate::library::Library;
use crate::types::{Book, Magazine, Publication, User};
use crate::{Error, Result};
use csv::{QuoteStyle, StringRecord, Terminator, WriterBuilder};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::str::FromStr;

/// Field separator for storage rows
pub const DELIMITER: char = ';';

const BOOK_FIELDS: usize = 7;
const MAGAZINE_FIELDS: usize = 6;
const USER_FIELDS: usize = 3;

/// A decoded storage row
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    Publication(Publication),
    User(User),
}

/// True if `text` can be written as a single field
pub fn is_storable(text: &str) -> bool {
    !text.contains(|c: char| c == DELIMITER || c == '\n' || c == '\r')
}

// ============================================================================
// Encoding
// ============================================================================

fn publication_fields(publication: &Publication) -> Vec<String> {
    match publication {
        Publication::Book(book) => vec![
            Book::TYPE.to_string(),
            book.title.clone(),
            book.publisher.clone(),
            book.year.to_string(),
            book.author.clone(),
            book.page_count.to_string(),
            book.isbn.clone(),
        ],
        Publication::Magazine(magazine) => vec![
            Magazine::TYPE.to_string(),
            magazine.title.clone(),
            magazine.publisher.clone(),
            magazine.year.to_string(),
            magazine.month.to_string(),
            magazine.day.to_string(),
        ],
    }
}

fn user_fields(user: &User) -> Vec<String> {
    vec![
        User::TYPE.to_string(),
        user.first_name.clone(),
        user.last_name.clone(),
    ]
}

fn check_fields(fields: &[String]) -> Result<()> {
    match fields.iter().find(|field| !is_storable(field)) {
        Some(field) => Err(Error::UnstorableField(field.clone())),
        None => Ok(()),
    }
}

fn encode_fields(fields: &[String]) -> Result<String> {
    check_fields(fields)?;
    Ok(fields.join(";"))
}

/// Storage row for a publication, without the trailing newline
pub fn encode_publication(publication: &Publication) -> Result<String> {
    encode_fields(&publication_fields(publication))
}

/// Storage row for a user, without the trailing newline
pub fn encode_user(user: &User) -> Result<String> {
    encode_fields(&user_fields(user))
}

/// Write every publication, then every user, one row per line
///
/// Nothing is written if any record holds an unstorable field.
pub fn write_library<W: Write>(library: &Library, writer: W) -> Result<()> {
    let rows: Vec<Vec<String>> = library
        .publications()
        .iter()
        .map(publication_fields)
        .chain(library.users().iter().map(user_fields))
        .collect();
    for row in &rows {
        check_fields(row)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER as u8)
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

fn invalid(line: usize, reason: impl Into<String>) -> Error {
    Error::InvalidData {
        line,
        reason: reason.into(),
    }
}

fn split_row(row: &str) -> StringRecord {
    StringRecord::from(row.split(DELIMITER).collect::<Vec<_>>())
}

fn expect_len(fields: &StringRecord, expected: usize, tag: &str, line: usize) -> Result<()> {
    if fields.len() != expected {
        return Err(invalid(
            line,
            format!(
                "{} row needs {} fields, found {}",
                tag,
                expected,
                fields.len()
            ),
        ));
    }
    Ok(())
}

fn parse_number<T: FromStr>(fields: &StringRecord, index: usize, name: &str, line: usize) -> Result<T> {
    let raw = fields.get(index).unwrap_or_default();
    raw.parse::<T>()
        .map_err(|_| invalid(line, format!("{} '{}' is not a valid number", name, raw)))
}

fn text(fields: &StringRecord, index: usize) -> String {
    fields.get(index).unwrap_or_default().to_string()
}

/// Map one row's fields to a record
///
/// `line` is only used for error reporting.
pub fn decode_record(fields: &StringRecord, line: usize) -> Result<Record> {
    let tag = fields.get(0).unwrap_or_default();
    match tag {
        Book::TYPE => {
            expect_len(fields, BOOK_FIELDS, tag, line)?;
            let book = Book {
                title: text(fields, 1),
                publisher: text(fields, 2),
                year: parse_number(fields, 3, "year", line)?,
                author: text(fields, 4),
                page_count: parse_number(fields, 5, "page count", line)?,
                isbn: text(fields, 6),
            };
            Ok(Record::Publication(Publication::Book(book)))
        }
        Magazine::TYPE => {
            expect_len(fields, MAGAZINE_FIELDS, tag, line)?;
            let magazine = Magazine {
                title: text(fields, 1),
                publisher: text(fields, 2),
                year: parse_number(fields, 3, "year", line)?,
                month: parse_number(fields, 4, "month", line)?,
                day: parse_number(fields, 5, "day", line)?,
            };
            Ok(Record::Publication(Publication::Magazine(magazine)))
        }
        User::TYPE => {
            expect_len(fields, USER_FIELDS, tag, line)?;
            Ok(Record::User(User::new(text(fields, 1), text(fields, 2))))
        }
        other => Err(invalid(line, format!("unknown record type '{}'", other))),
    }
}

/// Decode a single storage row (no line terminator)
pub fn decode_row(row: &str) -> Result<Record> {
    decode_record(&split_row(row), 1)
}

/// Parse a complete store into a fresh `Library`
///
/// Every line is a record; a blank line has an empty type tag and is
/// invalid like any other unknown tag. The first malformed row aborts
/// the whole read, and a row repeating an earlier record counts as
/// malformed.
pub fn read_library<R: Read>(reader: R) -> Result<Library> {
    let mut library = Library::new();

    for (index, row) in BufReader::new(reader).lines().enumerate() {
        let line = index + 1;
        let row = row.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => invalid(line, "row is not valid UTF-8"),
            _ => Error::DataImport(e.to_string()),
        })?;

        let added = match decode_record(&split_row(&row), line)? {
            Record::Publication(publication) => library.add_publication(publication),
            Record::User(user) => library.add_user(user),
        };
        added.map_err(|e| invalid(line, e.to_string()))?;
    }

    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Publication {
        Publication::Book(Book::new("Dune", "Herbert", 1965, 412, "Ace", "ISBN1"))
    }

    fn wired() -> Publication {
        Publication::Magazine(Magazine::new("Wired", "Cond Nast", 2020, 5, 1))
    }

    fn read_str(contents: &str) -> Result<Library> {
        read_library(contents.as_bytes())
    }

    #[test]
    fn test_book_row_layout() {
        assert_eq!(
            encode_publication(&dune()).unwrap(),
            "Book;Dune;Ace;1965;Herbert;412;ISBN1"
        );
    }

    #[test]
    fn test_row_roundtrip_for_each_record_kind() {
        let records = vec![
            Record::Publication(dune()),
            Record::Publication(wired()),
            Record::User(User::new("Ada", "Lovelace")),
        ];
        for record in records {
            let row = match &record {
                Record::Publication(p) => encode_publication(p).unwrap(),
                Record::User(u) => encode_user(u).unwrap(),
            };
            assert_eq!(decode_row(&row).unwrap(), record, "row: {}", row);
        }
    }

    #[test]
    fn test_quotes_are_written_verbatim() {
        let single = Publication::Book(Book::new("12\" Singles", "A", 1990, 10, "Ace", "I"));
        assert_eq!(
            encode_publication(&single).unwrap(),
            "Book;12\" Singles;Ace;1990;A;10;I"
        );

        let mut library = Library::new();
        library.add_publication(single).unwrap();
        let mut out = Vec::new();
        write_library(&library, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Book;12\" Singles;Ace;1990;A;10;I\n"
        );
    }

    #[test]
    fn test_quotes_are_read_verbatim() {
        let record = decode_row("Book;\"Dune\" Messiah;Ace;1969;Herbert;256;I").unwrap();
        match record {
            Record::Publication(p) => assert_eq!(p.title(), "\"Dune\" Messiah"),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_delimiter_in_field_is_rejected() {
        let awkward = Publication::Book(Book::new("War; and Peace", "Tolstoy", 1869, 1225, "RV", ""));
        assert!(matches!(
            encode_publication(&awkward),
            Err(Error::UnstorableField(_))
        ));
        assert!(matches!(
            encode_user(&User::new("Ada\n", "Lovelace")),
            Err(Error::UnstorableField(_))
        ));

        let mut library = Library::new();
        library.add_publication(dune()).unwrap();
        library.add_publication(awkward).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            write_library(&library, &mut out),
            Err(Error::UnstorableField(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_short_book_row_is_invalid() {
        let err = decode_row("Book;Dune;Ace;1965;Herbert;412").unwrap_err();
        match err {
            Error::InvalidData { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("7 fields"), "reason: {}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_is_invalid() {
        assert!(matches!(
            decode_row("Comic;Watchmen;DC;1986"),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_non_numeric_field_is_invalid() {
        assert!(matches!(
            decode_row("Magazine;Wired;Cond Nast;twenty;5;1"),
            Err(Error::InvalidData { .. })
        ));
        assert!(matches!(
            decode_row("Book;Dune;Ace;1965;Herbert;-412;ISBN1"),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_write_puts_publications_before_users() {
        let mut library = Library::new();
        library.add_user(User::new("Ada", "Lovelace")).unwrap();
        library.add_publication(dune()).unwrap();
        library.add_publication(wired()).unwrap();

        let mut out = Vec::new();
        write_library(&library, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Book;Dune;Ace;1965;Herbert;412;ISBN1\n\
             Magazine;Wired;Cond Nast;2020;5;1\n\
             User;Ada;Lovelace\n"
        );
    }

    #[test]
    fn test_read_restores_order() {
        let library = read_str(
            "Magazine;Wired;Cond Nast;2020;5;1\n\
             Book;Dune;Ace;1965;Herbert;412;ISBN1\n\
             User;Grace;Hopper\n\
             User;Ada;Lovelace\n",
        )
        .unwrap();

        assert_eq!(library.publications(), &[wired(), dune()]);
        let names: Vec<_> = library.users().iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["Grace", "Ada"]);
    }

    #[test]
    fn test_bad_row_aborts_whole_read() {
        let err = read_str(
            "Magazine;Wired;Cond Nast;2020;5;1\n\
             Book;Dune;Ace;1965;Herbert;412\n\
             User;Ada;Lovelace\n",
        )
        .unwrap_err();
        match err {
            Error::InvalidData { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_is_invalid() {
        let err = read_str("User;Ada;Lovelace\n\nUser;Alan;Turing\n").unwrap_err();
        match err {
            Error::InvalidData { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("unknown record type ''"), "reason: {}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_crlf_rows_are_accepted() {
        let library = read_str("User;Ada;Lovelace\r\nUser;Alan;Turing\r\n").unwrap();
        assert_eq!(library.users().len(), 2);
        assert_eq!(library.users()[0].last_name, "Lovelace");
    }

    #[test]
    fn test_invalid_utf8_is_invalid_data() {
        let bytes: &[u8] = b"User;Ada;Lovelace\nUser;\xff\xfe;X\n";
        assert!(matches!(
            read_library(bytes),
            Err(Error::InvalidData { line: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_rows_are_invalid() {
        let result = read_str("User;Ada;Lovelace\nUser;Ada;Lovelace\n");
        assert!(matches!(result, Err(Error::InvalidData { line: 2, .. })));
    }

    #[test]
    fn test_empty_store_reads_as_empty_library() {
        assert!(read_str("").unwrap().is_empty());
    }
}
