use crate::error::Result;
use crate::models::{Book, Borrower, Loan, User};
use crate::repository::LibraryRepository;

use super::forms::TextForm;

/// Rows shown in one table plus the highlighted index.
pub(crate) struct Listing<T> {
    pub(crate) rows: Vec<T>,
    pub(crate) selected: usize,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
        }
    }
}

impl<T> Listing<T> {
    pub(crate) fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.ensure_in_bounds();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }
}

/// The four panels of the main screen, in tab-bar order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tab {
    Books,
    Borrowers,
    Borrow,
    Return,
}

impl Tab {
    pub(crate) const ALL: [Tab; 4] = [Tab::Books, Tab::Borrowers, Tab::Borrow, Tab::Return];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Books => "Manage Books",
            Tab::Borrowers => "Manage Borrowers",
            Tab::Borrow => "Borrow Book",
            Tab::Return => "Return Book",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::Books => 0,
            Tab::Borrowers => 1,
            Tab::Borrow => 2,
            Tab::Return => 3,
        }
    }

    pub(crate) fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub(crate) fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Username/password entry shown until a login succeeds.
pub(crate) struct LoginScreen {
    pub(crate) form: TextForm,
}

impl LoginScreen {
    pub(crate) fn new() -> Self {
        Self {
            form: TextForm::login(),
        }
    }
}

/// Everything the tabbed screen owns: one form per panel and the three
/// listings. Forms keep their contents when the user switches tabs.
pub(crate) struct MainScreen {
    pub(crate) user: User,
    pub(crate) tab: Tab,
    pub(crate) book_form: TextForm,
    pub(crate) borrower_form: TextForm,
    pub(crate) borrow_form: TextForm,
    pub(crate) return_form: TextForm,
    pub(crate) books: Listing<Book>,
    pub(crate) borrowers: Listing<Borrower>,
    pub(crate) loans: Listing<Loan>,
}

impl MainScreen {
    pub(crate) fn new(user: User) -> Self {
        Self {
            user,
            tab: Tab::Books,
            book_form: TextForm::book(),
            borrower_form: TextForm::borrower(),
            borrow_form: TextForm::borrow(),
            return_form: TextForm::return_book(),
            books: Listing::default(),
            borrowers: Listing::default(),
            loans: Listing::default(),
        }
    }

    pub(crate) fn active_form(&self) -> &TextForm {
        match self.tab {
            Tab::Books => &self.book_form,
            Tab::Borrowers => &self.borrower_form,
            Tab::Borrow => &self.borrow_form,
            Tab::Return => &self.return_form,
        }
    }

    pub(crate) fn active_form_mut(&mut self) -> &mut TextForm {
        match self.tab {
            Tab::Books => &mut self.book_form,
            Tab::Borrowers => &mut self.borrower_form,
            Tab::Borrow => &mut self.borrow_form,
            Tab::Return => &mut self.return_form,
        }
    }

    /// Move the highlighted row of whichever table the current tab shows.
    pub(crate) fn move_selection(&mut self, offset: isize) {
        match self.tab {
            Tab::Books | Tab::Borrow => self.books.move_selection(offset),
            Tab::Borrowers => self.borrowers.move_selection(offset),
            Tab::Return => self.loans.move_selection(offset),
        }
    }

    pub(crate) fn select_first(&mut self) {
        match self.tab {
            Tab::Books | Tab::Borrow => self.books.select_first(),
            Tab::Borrowers => self.borrowers.select_first(),
            Tab::Return => self.loans.select_first(),
        }
    }

    pub(crate) fn select_last(&mut self) {
        match self.tab {
            Tab::Books | Tab::Borrow => self.books.select_last(),
            Tab::Borrowers => self.borrowers.select_last(),
            Tab::Return => self.loans.select_last(),
        }
    }

    pub(crate) fn reload_books<R: LibraryRepository>(&mut self, repo: &R) -> Result<()> {
        self.books.set_rows(repo.list_books()?);
        Ok(())
    }

    pub(crate) fn reload_borrowers<R: LibraryRepository>(&mut self, repo: &R) -> Result<()> {
        self.borrowers.set_rows(repo.list_borrowers()?);
        Ok(())
    }

    pub(crate) fn reload_loans<R: LibraryRepository>(&mut self, repo: &R) -> Result<()> {
        self.loans.set_rows(repo.list_loans()?);
        Ok(())
    }

    /// Refresh all three listings, stopping at the first failure.
    pub(crate) fn reload_all<R: LibraryRepository>(&mut self, repo: &R) -> Result<()> {
        self.reload_books(repo)?;
        self.reload_borrowers(repo)?;
        self.reload_loans(repo)
    }
}
