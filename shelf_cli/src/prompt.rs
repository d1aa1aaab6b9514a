//! Prompts that read a whole record from the operator.
//!
//! A non-numeric or out-of-range number, or text holding the row
//! delimiter, fails the read with `Error::InputFormat`; the caller decides
//! how to report it.

use shelf_core::codec::is_storable;
use shelf_core::{Book, Error, InputSource, Magazine, OutputSink, Result, User};

fn ask<I: InputSource, O: OutputSink>(input: &mut I, output: &mut O, prompt: &str) -> Result<String> {
    output.write_line(prompt)?;
    let text = input.read_line()?;
    if !is_storable(&text) {
        return Err(Error::InputFormat(format!("'{}' must not contain ';'", text)));
    }
    Ok(text)
}

fn ask_number<T, I, O>(input: &mut I, output: &mut O, prompt: &str) -> Result<T>
where
    T: TryFrom<i64>,
    I: InputSource,
    O: OutputSink,
{
    output.write_line(prompt)?;
    let value = input.read_int()?;
    T::try_from(value).map_err(|_| Error::InputFormat(format!("{} is out of range", value)))
}

pub fn read_book<I: InputSource, O: OutputSink>(input: &mut I, output: &mut O) -> Result<Book> {
    let title = ask(input, output, "Title:")?;
    let author = ask(input, output, "Author:")?;
    let publisher = ask(input, output, "Publisher:")?;
    let isbn = ask(input, output, "ISBN:")?;
    let year = ask_number(input, output, "Year of publication:")?;
    let page_count = ask_number(input, output, "Page count:")?;
    Ok(Book::new(title, author, year, page_count, publisher, isbn))
}

pub fn read_magazine<I: InputSource, O: OutputSink>(input: &mut I, output: &mut O) -> Result<Magazine> {
    let title = ask(input, output, "Title:")?;
    let publisher = ask(input, output, "Publisher:")?;
    let year = ask_number(input, output, "Year of publication:")?;
    let month = ask_number(input, output, "Month:")?;
    let day = ask_number(input, output, "Day:")?;
    Ok(Magazine::new(title, publisher, year, month, day))
}

pub fn read_user<I: InputSource, O: OutputSink>(input: &mut I, output: &mut O) -> Result<User> {
    let first_name = ask(input, output, "First name:")?;
    let last_name = ask(input, output, "Last name:")?;
    Ok(User::new(first_name, last_name))
}

pub fn read_title<I: InputSource, O: OutputSink>(input: &mut I, output: &mut O) -> Result<String> {
    ask(input, output, "Enter publication title:")
}
