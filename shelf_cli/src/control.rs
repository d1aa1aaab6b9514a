//! Interactive controller: menu, dispatch and the import/export lifecycle.

use crate::prompt;
use shelf_core::{
    by_last_name_case_insensitive, by_title_case_insensitive, CatalogStore, Error, InputSource,
    Library, OutputSink, Publication, Result,
};

/// Menu commands, keyed by the number the operator types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Exit,
    AddBook,
    AddMagazine,
    PrintBooks,
    PrintMagazines,
    DeleteBook,
    DeleteMagazine,
    AddUser,
    PrintUsers,
    FindPublication,
}

impl Command {
    /// Menu order
    pub const ALL: [Command; 10] = [
        Command::Exit,
        Command::AddBook,
        Command::AddMagazine,
        Command::PrintBooks,
        Command::PrintMagazines,
        Command::DeleteBook,
        Command::DeleteMagazine,
        Command::AddUser,
        Command::PrintUsers,
        Command::FindPublication,
    ];

    pub fn id(self) -> i64 {
        match self {
            Command::Exit => 0,
            Command::AddBook => 1,
            Command::AddMagazine => 2,
            Command::PrintBooks => 3,
            Command::PrintMagazines => 4,
            Command::DeleteBook => 5,
            Command::DeleteMagazine => 6,
            Command::AddUser => 7,
            Command::PrintUsers => 8,
            Command::FindPublication => 9,
        }
    }

    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            0 => Ok(Command::Exit),
            1 => Ok(Command::AddBook),
            2 => Ok(Command::AddMagazine),
            3 => Ok(Command::PrintBooks),
            4 => Ok(Command::PrintMagazines),
            5 => Ok(Command::DeleteBook),
            6 => Ok(Command::DeleteMagazine),
            7 => Ok(Command::AddUser),
            8 => Ok(Command::PrintUsers),
            9 => Ok(Command::FindPublication),
            other => Err(Error::UnknownCommand(other)),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Exit => "Exit the program",
            Command::AddBook => "Add a book",
            Command::AddMagazine => "Add a magazine",
            Command::PrintBooks => "List books",
            Command::PrintMagazines => "List magazines",
            Command::DeleteBook => "Delete a book",
            Command::DeleteMagazine => "Delete a magazine",
            Command::AddUser => "Add a reader",
            Command::PrintUsers => "List readers",
            Command::FindPublication => "Find a publication by title",
        }
    }
}

/// Import the catalog, falling back to an empty one
///
/// A missing or malformed store is reported to the operator and replaced
/// by a fresh catalog; nothing is partially loaded.
pub fn load_or_fresh<O: OutputSink>(store: &dyn CatalogStore, output: &mut O) -> Result<Library> {
    match store.import() {
        Ok(library) => {
            tracing::info!(
                "Imported {} records from {:?}",
                library.len(),
                store.path()
            );
            output.write_line("Imported data from file")?;
            Ok(library)
        }
        Err(e) if e.is_recoverable_import() => {
            tracing::warn!("Import from {:?} failed: {}", store.path(), e);
            output.write_line(&e.to_string())?;
            output.write_line("Initialized a new catalog")?;
            Ok(Library::new())
        }
        Err(e) => Err(e),
    }
}

pub fn print_books<O: OutputSink>(output: &mut O, library: &Library) -> Result<()> {
    let books: Vec<&Publication> = library
        .sorted_publications(by_title_case_insensitive)
        .into_iter()
        .filter(|p| p.as_book().is_some())
        .collect();
    print_publications(output, &books, "No books in the catalog")
}

pub fn print_magazines<O: OutputSink>(output: &mut O, library: &Library) -> Result<()> {
    let magazines: Vec<&Publication> = library
        .sorted_publications(by_title_case_insensitive)
        .into_iter()
        .filter(|p| p.as_magazine().is_some())
        .collect();
    print_publications(output, &magazines, "No magazines in the catalog")
}

fn print_publications<O: OutputSink>(
    output: &mut O,
    publications: &[&Publication],
    empty_message: &str,
) -> Result<()> {
    if publications.is_empty() {
        return output.write_line(empty_message);
    }
    for publication in publications {
        output.write_line(&publication.to_string())?;
    }
    Ok(())
}

pub fn print_users<O: OutputSink>(output: &mut O, library: &Library) -> Result<()> {
    let users = library.sorted_users(by_last_name_case_insensitive);
    if users.is_empty() {
        return output.write_line("No readers registered");
    }
    for user in users {
        output.write_line(&user.to_string())?;
    }
    Ok(())
}

pub fn print_find_result<O: OutputSink>(output: &mut O, library: &Library, title: &str) -> Result<()> {
    match library.find_publication_by_title(title) {
        Some(publication) => output.write_line(&publication.to_string()),
        None => output.write_line("No publication with that title"),
    }
}

/// Owns the catalog for the duration of an interactive session
pub struct LibraryControl<I, O> {
    input: I,
    output: O,
    store: Box<dyn CatalogStore>,
    library: Library,
}

impl<I: InputSource, O: OutputSink> LibraryControl<I, O> {
    pub fn new(input: I, mut output: O, store: Box<dyn CatalogStore>) -> Result<Self> {
        let library = load_or_fresh(store.as_ref(), &mut output)?;
        Ok(Self {
            input,
            output,
            store,
            library,
        })
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Run until the operator picks Exit or input runs out, then export
    ///
    /// Any other error still exports the catalog before it is returned.
    pub fn control_loop(&mut self) -> Result<()> {
        match self.run_commands() {
            Ok(()) => self.exit(),
            Err(e) if e.is_end_of_input() => self.exit(),
            Err(e) => {
                tracing::error!("Session aborted: {}", e);
                if let Err(exit_err) = self.exit() {
                    tracing::warn!("Could not report export result: {}", exit_err);
                }
                Err(e)
            }
        }
    }

    fn run_commands(&mut self) -> Result<()> {
        loop {
            self.print_options()?;
            let command = self.read_command()?;
            tracing::debug!("Selected {:?}", command);

            if command == Command::Exit {
                return Ok(());
            }
            self.dispatch(command)?;
        }
    }

    fn print_options(&mut self) -> Result<()> {
        self.output.write_line("Choose an option:")?;
        for command in Command::ALL {
            self.output
                .write_line(&format!("{} - {}", command.id(), command.description()))?;
        }
        Ok(())
    }

    fn read_command(&mut self) -> Result<Command> {
        loop {
            match self.input.read_int().and_then(Command::from_id) {
                Ok(command) => return Ok(command),
                Err(e @ Error::UnknownCommand(_)) => {
                    self.output.write_line(&format!("{}, try again:", e))?;
                }
                Err(Error::InputFormat(_)) => {
                    self.output
                        .write_line("That is not a number, try again:")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Exit => Ok(()),
            Command::AddBook => self.add_book(),
            Command::AddMagazine => self.add_magazine(),
            Command::PrintBooks => print_books(&mut self.output, &self.library),
            Command::PrintMagazines => print_magazines(&mut self.output, &self.library),
            Command::DeleteBook => self.delete_book(),
            Command::DeleteMagazine => self.delete_magazine(),
            Command::AddUser => self.add_user(),
            Command::PrintUsers => print_users(&mut self.output, &self.library),
            Command::FindPublication => self.find_publication(),
        }
    }

    /// Report expected per-action failures; pass anything else up
    fn report(&mut self, result: Result<()>, invalid_input: &str) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(Error::InputFormat(reason)) => {
                tracing::debug!("Rejected input: {}", reason);
                self.output.write_line(invalid_input)
            }
            Err(e @ Error::DuplicateRecord(_)) | Err(e @ Error::UserAlreadyExists(_)) => {
                self.output.write_line(&e.to_string())
            }
            Err(e) => Err(e),
        }
    }

    fn add_book(&mut self) -> Result<()> {
        let result = prompt::read_book(&mut self.input, &mut self.output)
            .and_then(|book| self.library.add_publication(book));
        self.report(result, "Could not create the book, invalid data")
    }

    fn add_magazine(&mut self) -> Result<()> {
        let result = prompt::read_magazine(&mut self.input, &mut self.output)
            .and_then(|magazine| self.library.add_publication(magazine));
        self.report(result, "Could not create the magazine, invalid data")
    }

    fn add_user(&mut self) -> Result<()> {
        let result = prompt::read_user(&mut self.input, &mut self.output)
            .and_then(|user| self.library.add_user(user));
        self.report(result, "Could not create the reader, invalid data")
    }

    fn delete_book(&mut self) -> Result<()> {
        let result = prompt::read_book(&mut self.input, &mut self.output).and_then(|book| {
            let message = if self.library.remove_publication(&book.into()) {
                "Book deleted"
            } else {
                "No such book in the catalog"
            };
            self.output.write_line(message)
        });
        self.report(result, "Could not create the book, invalid data")
    }

    fn delete_magazine(&mut self) -> Result<()> {
        let result = prompt::read_magazine(&mut self.input, &mut self.output).and_then(|magazine| {
            let message = if self.library.remove_publication(&magazine.into()) {
                "Magazine deleted"
            } else {
                "No such magazine in the catalog"
            };
            self.output.write_line(message)
        });
        self.report(result, "Could not create the magazine, invalid data")
    }

    fn find_publication(&mut self) -> Result<()> {
        let title = prompt::read_title(&mut self.input, &mut self.output)?;
        print_find_result(&mut self.output, &self.library, &title)
    }

    fn exit(&mut self) -> Result<()> {
        match self.store.export(&self.library) {
            Ok(()) => {
                tracing::info!(
                    "Exported {} records to {:?}",
                    self.library.len(),
                    self.store.path()
                );
                self.output.write_line("Data exported to file")?;
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.output.write_line(&e.to_string())?;
            }
        }
        self.output.write_line("Goodbye")
    }
}
