use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::error;

use crate::error::{LibraryError, Result};
use crate::models::{Book, BookStatus, Borrower, Credentials, Loan, User};
use crate::repository::LibraryRepository;

use super::forms::TextForm;
use super::helpers::{centered_rect, key_hints};
use super::screens::{Listing, LoginScreen, MainScreen, Tab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar including its border.
const TAB_BAR_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown in a table.
const PAGE_STEP: isize = 5;
const APP_TITLE: &str = "Library Management System";

/// Top-level screens. The login screen is dropped entirely once a login
/// succeeds; there is no way back to it short of restarting.
enum Screen {
    Login(LoginScreen),
    Main(MainScreen),
}

/// Whether a notice currently blocks input.
enum Mode {
    Normal,
    Notice(Notice),
}

/// Modal outcome report, dismissed with Enter or Esc.
struct Notice {
    title: &'static str,
    message: String,
    kind: StatusKind,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer and notice borders.
#[derive(Copy, Clone)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Every storage call goes
/// through the repository, so the struct works the same over any backend.
pub struct App<R> {
    repo: R,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<R: LibraryRepository> App<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            screen: Screen::Login(LoginScreen::new()),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.screen, Screen::Main(_))
    }

    /// Process one plain key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Notice(notice) => match code {
                KeyCode::Enter | KeyCode::Esc => Mode::Normal,
                _ => Mode::Notice(notice),
            },
            Mode::Normal => {
                if self.is_authenticated() {
                    self.handle_main_key(code, &mut exit);
                } else {
                    self.handle_login_key(code, &mut exit);
                }
                // Handlers may have raised a notice while we held `Normal`.
                mem::replace(&mut self.mode, Mode::Normal)
            }
        };

        exit
    }

    /// Process a key pressed together with Ctrl. Returns `true` on quit.
    pub fn handle_ctrl(&mut self, code: KeyCode) -> bool {
        if matches!(code, KeyCode::Char('c') | KeyCode::Char('q')) {
            return true;
        }
        if matches!(self.mode, Mode::Notice(_)) {
            return false;
        }

        match code {
            KeyCode::Char('r') if !self.is_authenticated() => self.submit_register(),
            KeyCode::Char('n') | KeyCode::Char('p') => {
                if let Screen::Main(main) = &mut self.screen {
                    main.tab = if code == KeyCode::Char('n') {
                        main.tab.next()
                    } else {
                        main.tab.previous()
                    };
                }
            }
            _ => {}
        }
        false
    }

    fn handle_login_key(&mut self, code: KeyCode, exit: &mut bool) {
        let Screen::Login(login) = &mut self.screen else {
            return;
        };
        let form = &mut login.form;

        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if form.is_last_field() {
                    self.submit_login();
                } else {
                    form.next_field();
                }
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
    }

    fn handle_main_key(&mut self, code: KeyCode, exit: &mut bool) {
        let Screen::Main(main) = &mut self.screen else {
            return;
        };

        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::F(n @ 1..=4) => main.tab = Tab::ALL[usize::from(n) - 1],
            KeyCode::Tab => main.active_form_mut().next_field(),
            KeyCode::BackTab => main.active_form_mut().previous_field(),
            KeyCode::Up => main.move_selection(-1),
            KeyCode::Down => main.move_selection(1),
            KeyCode::PageUp => main.move_selection(-PAGE_STEP),
            KeyCode::PageDown => main.move_selection(PAGE_STEP),
            KeyCode::Home => main.select_first(),
            KeyCode::End => main.select_last(),
            KeyCode::Backspace => main.active_form_mut().backspace(),
            KeyCode::Enter => self.submit_panel(),
            KeyCode::Char(ch) => {
                main.active_form_mut().push_char(ch);
            }
            _ => {}
        }
    }

    fn login_credentials(&self) -> Option<Credentials> {
        match &self.screen {
            Screen::Login(login) => Some(login.form.to_credentials()),
            Screen::Main(_) => None,
        }
    }

    fn submit_login(&mut self) {
        let Some(credentials) = self.login_credentials() else {
            return;
        };
        match self.repo.login(&credentials) {
            Ok(user) => self.open_main_screen(user),
            Err(err) => self.notify_error(&err),
        }
    }

    fn submit_register(&mut self) {
        let Some(credentials) = self.login_credentials() else {
            return;
        };
        match self.repo.register(&credentials) {
            Ok(()) => {
                if let Screen::Login(login) = &mut self.screen {
                    login.form.clear_field(1);
                }
                self.notify_success("User registered successfully");
            }
            Err(err) => self.notify_error(&err),
        }
    }

    /// Swap the login screen for the tabbed screen and load its tables.
    fn open_main_screen(&mut self, user: User) {
        let mut main = MainScreen::new(user);
        let loaded = main.reload_all(&self.repo);
        let greeting = format!("Signed in as {}.", main.user.username);
        self.screen = Screen::Main(main);

        match loaded {
            Ok(()) => self.set_status(greeting, StatusKind::Info),
            Err(err) => self.notify_error(&err),
        }
    }

    /// Run the current panel's operation and report the outcome.
    fn submit_panel(&mut self) {
        let Screen::Main(main) = &mut self.screen else {
            return;
        };
        let outcome = match main.tab {
            Tab::Books => submit_book(&self.repo, main),
            Tab::Borrowers => submit_borrower(&self.repo, main),
            Tab::Borrow => submit_borrow(&self.repo, main),
            Tab::Return => submit_return(&self.repo, main),
        };

        match outcome {
            Ok(message) => self.notify_success(message),
            Err(err) => self.notify_error(&err),
        }
    }

    fn notify_success(&mut self, message: &str) {
        self.set_status(message, StatusKind::Info);
        self.mode = Mode::Notice(Notice {
            title: "Success",
            message: message.to_string(),
            kind: StatusKind::Info,
        });
    }

    fn notify_error(&mut self, err: &LibraryError) {
        if matches!(err, LibraryError::Storage(_) | LibraryError::Io(_)) {
            error!(error = %err, "storage failure");
        }
        let (title, kind) = if err.is_input_error() {
            ("Input Error", StatusKind::Warning)
        } else {
            ("Error", StatusKind::Error)
        };
        let message = err.to_string();
        self.set_status(message.clone(), kind);
        self.mode = Mode::Notice(Notice {
            title,
            message,
            kind,
        });
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Login(login) => self.draw_login(frame, content_area, login),
            Screen::Main(main) => self.draw_main(frame, content_area, main),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Notice(notice) = &self.mode {
            self.draw_notice(frame, area, notice);
        }
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect, login: &LoginScreen) {
        let popup_area = centered_rect(60, 50, area);
        let block = Block::default()
            .title("Login/Register")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(Span::styled(
                APP_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        let form_top = lines.len() as u16;
        lines.extend(login.form.lines());

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        self.place_cursor(frame, inner, form_top, &login.form);
    }

    fn draw_main(&self, frame: &mut Frame, area: Rect, main: &MainScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Min(0)])
            .split(area);

        let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
            .select(main.tab.index())
            .style(Style::default().fg(Color::Green))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{APP_TITLE} | {}", main.user.username)),
            );
        frame.render_widget(tabs, chunks[0]);

        let form = main.active_form();
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(form.len() as u16 + 3),
                Constraint::Min(0),
            ])
            .split(chunks[1]);

        self.draw_form(frame, body[0], main.tab.title(), form);

        match main.tab {
            Tab::Books | Tab::Borrow => self.draw_books(frame, body[1], &main.books),
            Tab::Borrowers => self.draw_borrowers(frame, body[1], &main.borrowers),
            Tab::Return => self.draw_loans(frame, body[1], &main.loans),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &TextForm) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines = form.lines();
        lines.push(Line::from(Span::styled(
            "Enter to submit • Tab to switch field",
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(Paragraph::new(lines), inner);

        self.place_cursor(frame, inner, 0, form);
    }

    /// Put the terminal cursor at the end of the focused field, unless a
    /// notice is covering the form.
    fn place_cursor(&self, frame: &mut Frame, inner: Rect, top: u16, form: &TextForm) {
        if matches!(self.mode, Mode::Notice(_)) {
            return;
        }
        let cursor_x = inner.x + (form.value_offset() + form.active_len()) as u16;
        let cursor_y = inner.y + top + form.active as u16;
        if cursor_y < inner.bottom() && cursor_x < inner.right() {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_books(&self, frame: &mut Frame, area: Rect, books: &Listing<Book>) {
        if books.rows.is_empty() {
            render_empty(frame, area, "Books", "No books yet. Add one above.");
            return;
        }

        let rows = books.rows.iter().map(|book| {
            let status_style = match book.status {
                BookStatus::Available => Style::default().fg(Color::Green),
                BookStatus::Borrowed => Style::default().fg(Color::Yellow),
            };
            Row::new(vec![
                Cell::from(book.id.clone()),
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(Span::styled(book.status.to_string(), status_style)),
            ])
        });
        let widths = [
            Constraint::Percentage(15),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(15),
        ];
        render_table(
            frame,
            area,
            "Books",
            &["Book ID", "Title", "Author", "Status"],
            rows,
            widths,
            books.selected,
        );
    }

    fn draw_borrowers(
        &self,
        frame: &mut Frame,
        area: Rect,
        borrowers: &Listing<Borrower>,
    ) {
        if borrowers.rows.is_empty() {
            render_empty(frame, area, "Borrowers", "No borrowers yet. Add one above.");
            return;
        }

        let rows = borrowers.rows.iter().map(|borrower| {
            Row::new(vec![
                borrower.id.clone(),
                borrower.last_name.clone(),
                borrower.first_name.clone(),
                borrower.middle_name.clone().unwrap_or_default(),
                borrower.course.clone(),
                borrower.contact_number.clone(),
            ])
        });
        let widths = [
            Constraint::Percentage(13),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
            Constraint::Percentage(10),
            Constraint::Percentage(20),
        ];
        render_table(
            frame,
            area,
            "Borrowers",
            &[
                "Borrower ID",
                "Last Name",
                "First Name",
                "Middle Name",
                "Course",
                "Contact Number",
            ],
            rows,
            widths,
            borrowers.selected,
        );
    }

    fn draw_loans(&self, frame: &mut Frame, area: Rect, loans: &Listing<Loan>) {
        if loans.rows.is_empty() {
            render_empty(frame, area, "Active Loans", "No books are out.");
            return;
        }

        let rows = loans.rows.iter().map(|loan| {
            Row::new(vec![
                loan.book_id.clone(),
                loan.borrower_id.clone(),
                loan.borrowed_at.format("%Y-%m-%d %H:%M").to_string(),
            ])
        });
        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ];
        render_table(
            frame,
            area,
            "Active Loans",
            &["Book ID", "Borrower ID", "Borrowed At"],
            rows,
            widths,
            loans.selected,
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Notice(_)) => &[("Enter", "Dismiss")],
            (Screen::Login(_), _) => &[
                ("Tab", "Switch Field"),
                ("Enter", "Login"),
                ("Ctrl+R", "Register"),
                ("Esc", "Quit"),
            ],
            (Screen::Main(_), _) => &[
                ("F1-F4", "Tabs"),
                ("Ctrl+N/P", "Next/Prev Tab"),
                ("Tab", "Switch Field"),
                ("Enter", "Submit"),
                ("↑↓", "Select Row"),
                ("Esc", "Quit"),
            ],
        };
        Line::from(key_hints(hints))
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.title)
            .borders(Borders::ALL)
            .border_style(notice.kind.style());
        let lines = vec![
            Line::from(""),
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to dismiss",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

fn submit_book<R: LibraryRepository>(repo: &R, main: &mut MainScreen) -> Result<&'static str> {
    repo.add_book(&main.book_form.to_new_book())?;
    main.book_form.clear();
    main.reload_books(repo)?;
    Ok("Book added successfully")
}

fn submit_borrower<R: LibraryRepository>(repo: &R, main: &mut MainScreen) -> Result<&'static str> {
    repo.add_borrower(&main.borrower_form.to_new_borrower())?;
    main.borrower_form.clear();
    main.reload_borrowers(repo)?;
    Ok("Borrower added successfully")
}

fn submit_borrow<R: LibraryRepository>(repo: &R, main: &mut MainScreen) -> Result<&'static str> {
    repo.borrow_book(&main.borrow_form.to_borrow_request())?;
    main.borrow_form.clear();
    main.reload_books(repo)?;
    main.reload_loans(repo)?;
    Ok("Book borrowed successfully")
}

fn submit_return<R: LibraryRepository>(repo: &R, main: &mut MainScreen) -> Result<&'static str> {
    repo.return_book(&main.return_form.to_return_request())?;
    main.return_form.clear();
    main.reload_books(repo)?;
    main.reload_loans(repo)?;
    Ok("Book returned successfully")
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, area);
}

fn render_table<'a, const N: usize>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    headers: &[&'static str; N],
    rows: impl IntoIterator<Item = Row<'a>>,
    widths: [Constraint; N],
    selected: usize,
) {
    let header = Row::new(headers.to_vec()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{NewBook, NewBorrower};
    use crate::repository::SqliteRepository;

    fn app() -> (TempDir, App<SqliteRepository>) {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepository::open(dir.path().join("library.db")).unwrap();
        repo.register(&Credentials::new("alice", "pw1")).unwrap();
        (dir, App::new(repo))
    }

    fn type_text<R: LibraryRepository>(app: &mut App<R>, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn log_in<R: LibraryRepository>(app: &mut App<R>, password: &str) {
        type_text(app, "alice");
        app.handle_key(KeyCode::Enter);
        type_text(app, password);
        app.handle_key(KeyCode::Enter);
    }

    fn notice_title<R>(app: &App<R>) -> Option<&'static str> {
        match &app.mode {
            Mode::Notice(notice) => Some(notice.title),
            Mode::Normal => None,
        }
    }

    fn main_screen<R>(app: &App<R>) -> &MainScreen {
        match &app.screen {
            Screen::Main(main) => main,
            Screen::Login(_) => panic!("still on the login screen"),
        }
    }

    fn rendered<R: LibraryRepository>(app: &App<R>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn wrong_password_keeps_the_login_screen() {
        let (_dir, mut app) = app();
        log_in(&mut app, "nope");

        assert!(!app.is_authenticated());
        assert_eq!(notice_title(&app), Some("Error"));
        assert!(rendered(&app).contains("Invalid credentials"));

        app.handle_key(KeyCode::Enter);
        assert_eq!(notice_title(&app), None);
        assert!(!app.is_authenticated());
    }

    #[test]
    fn correct_password_opens_the_main_screen() {
        let (_dir, mut app) = app();
        log_in(&mut app, "pw1");

        assert!(app.is_authenticated());
        assert_eq!(notice_title(&app), None);
        let screen = rendered(&app);
        assert!(screen.contains("Manage Books"));
        assert!(screen.contains("Return Book"));
    }

    #[test]
    fn empty_login_is_an_input_error() {
        let (_dir, mut app) = app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(notice_title(&app), Some("Input Error"));
        assert!(!app.is_authenticated());
    }

    #[test]
    fn ctrl_r_registers_then_login_succeeds() {
        let (_dir, mut app) = app();
        type_text(&mut app, "bob");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "secret");
        app.handle_ctrl(KeyCode::Char('r'));
        assert_eq!(notice_title(&app), Some("Success"));

        app.handle_key(KeyCode::Esc);
        assert!(!app.is_authenticated());
        type_text(&mut app, "secret");
        app.handle_key(KeyCode::Enter);
        assert!(app.is_authenticated());
        assert_eq!(main_screen(&app).user.username, "bob");
    }

    #[test]
    fn duplicate_registration_is_reported() {
        let (_dir, mut app) = app();
        type_text(&mut app, "alice");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "other");
        app.handle_ctrl(KeyCode::Char('r'));

        assert_eq!(notice_title(&app), Some("Error"));
        assert!(rendered(&app).contains("Username already exists"));
    }

    #[test]
    fn book_form_adds_a_row_to_the_table() {
        let (_dir, mut app) = app();
        log_in(&mut app, "pw1");

        type_text(&mut app, "B1");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Dune");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Herbert");
        app.handle_key(KeyCode::Enter);

        assert_eq!(notice_title(&app), Some("Success"));
        app.handle_key(KeyCode::Enter);

        let main = main_screen(&app);
        assert_eq!(main.books.rows.len(), 1);
        assert!(main.book_form.fields.iter().all(|f| f.value.is_empty()));
        let screen = rendered(&app);
        assert!(screen.contains("Dune"));
        assert!(screen.contains("Available"));
    }

    #[test]
    fn incomplete_book_form_is_kept_for_correction() {
        let (_dir, mut app) = app();
        log_in(&mut app, "pw1");

        type_text(&mut app, "B1");
        app.handle_key(KeyCode::Enter);

        assert_eq!(notice_title(&app), Some("Input Error"));
        app.handle_key(KeyCode::Esc);
        assert!(app.is_authenticated(), "Esc only closes the notice");
        let main = main_screen(&app);
        assert_eq!(main.book_form.fields[0].value, "B1");
        assert!(main.books.rows.is_empty());
    }

    #[test]
    fn borrow_and_return_panels_drive_the_status() {
        let (_dir, mut app) = app();
        app.repo
            .add_book(&NewBook::new("B1", "Dune", "Herbert"))
            .unwrap();
        app.repo
            .add_borrower(&NewBorrower {
                id: "R1".into(),
                last_name: "Doe".into(),
                first_name: "Jane".into(),
                middle_name: String::new(),
                course: "CS".into(),
                contact_number: "555-1111".into(),
            })
            .unwrap();
        log_in(&mut app, "pw1");

        app.handle_key(KeyCode::F(3));
        type_text(&mut app, "B1");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "R1");
        app.handle_key(KeyCode::Enter);
        assert_eq!(notice_title(&app), Some("Success"));
        app.handle_key(KeyCode::Enter);

        let main = main_screen(&app);
        assert_eq!(main.books.rows[0].status, BookStatus::Borrowed);
        assert_eq!(main.loans.rows.len(), 1);

        app.handle_ctrl(KeyCode::Char('n'));
        assert_eq!(main_screen(&app).tab, Tab::Return);
        type_text(&mut app, "B1");
        app.handle_key(KeyCode::Enter);
        assert_eq!(notice_title(&app), Some("Success"));

        let main = main_screen(&app);
        assert_eq!(main.books.rows[0].status, BookStatus::Available);
        assert!(main.loans.rows.is_empty());
    }

    #[test]
    fn borrowing_an_unknown_book_shows_the_conflict() {
        let (_dir, mut app) = app();
        log_in(&mut app, "pw1");

        app.handle_key(KeyCode::F(3));
        type_text(&mut app, "B9");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "R9");
        app.handle_key(KeyCode::Enter);

        assert_eq!(notice_title(&app), Some("Error"));
        assert!(rendered(&app).contains("already borrowed or invalid"));
    }

    #[test]
    fn only_validation_failures_get_the_input_error_title() {
        let (_dir, mut app) = app();
        app.notify_error(&LibraryError::Validation("All fields are required".into()));
        assert_eq!(notice_title(&app), Some("Input Error"));

        app.handle_key(KeyCode::Enter);
        app.notify_error(&LibraryError::Duplicate("Book ID already exists".into()));
        assert_eq!(notice_title(&app), Some("Error"));

        app.handle_key(KeyCode::Enter);
        app.notify_error(&LibraryError::Conflict);
        assert_eq!(notice_title(&app), Some("Error"));
    }

    #[test]
    fn esc_quits_and_ctrl_c_always_quits() {
        let (_dir, mut app) = app();
        assert!(app.handle_ctrl(KeyCode::Char('c')));
        assert!(app.handle_key(KeyCode::Esc));
    }
}
