use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{BorrowRequest, Credentials, NewBook, NewBorrower, ReturnRequest};

/// One labelled text input.
#[derive(Clone)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) required: bool,
    /// Render the value as `*` characters.
    pub(crate) masked: bool,
}

impl FormField {
    fn required(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: true,
            masked: false,
        }
    }

    fn optional(label: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(label)
        }
    }

    fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

/// Field values plus focus for one panel's entry form. Each panel builds its
/// own layout through the named constructors and converts the values into a
/// request struct on submit.
#[derive(Clone)]
pub(crate) struct TextForm {
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
}

impl TextForm {
    fn new(fields: Vec<FormField>) -> Self {
        Self { fields, active: 0 }
    }

    pub(crate) fn login() -> Self {
        Self::new(vec![
            FormField::required("Username"),
            FormField::required("Password").masked(),
        ])
    }

    pub(crate) fn book() -> Self {
        Self::new(vec![
            FormField::required("Book ID"),
            FormField::required("Title"),
            FormField::required("Author"),
        ])
    }

    pub(crate) fn borrower() -> Self {
        Self::new(vec![
            FormField::required("Borrower ID"),
            FormField::required("Last Name"),
            FormField::required("First Name"),
            FormField::optional("Middle Name"),
            FormField::required("Course"),
            FormField::required("Contact Number"),
        ])
    }

    pub(crate) fn borrow() -> Self {
        Self::new(vec![
            FormField::required("Book ID"),
            FormField::required("Borrower ID"),
        ])
    }

    pub(crate) fn return_book() -> Self {
        Self::new(vec![FormField::required("Book ID")])
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn is_last_field(&self) -> bool {
        self.active + 1 >= self.fields.len()
    }

    pub(crate) fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Append a character to the focused field. Control characters are
    /// refused so stray key codes never end up in stored text.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.fields.get_mut(self.active) {
            Some(field) => {
                field.value.push(ch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    /// Empty every field and move focus back to the first one.
    pub(crate) fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.active = 0;
    }

    pub(crate) fn clear_field(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value.clear();
        }
    }

    /// Width of the longest label, used to line the values up.
    fn label_width(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.label.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Column where values start, counted from the left edge of the form.
    pub(crate) fn value_offset(&self) -> usize {
        self.label_width() + 2
    }

    /// Render one field as `Label: value`, with a placeholder when empty.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.fields.get(index) else {
            return Line::from("");
        };
        let is_active = index == self.active;

        let display = if field.value.is_empty() {
            if field.required {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else if field.masked {
            "*".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let label = format!("{:<width$}: ", field.label, width = self.label_width());
        Line::from(vec![Span::raw(label), Span::styled(display, style)])
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        (0..self.fields.len()).map(|idx| self.build_line(idx)).collect()
    }

    /// Character length of the focused field's value, for cursor placement.
    pub(crate) fn active_len(&self) -> usize {
        self.fields
            .get(self.active)
            .map(|field| field.value.chars().count())
            .unwrap_or(0)
    }

    /// Snapshot the first `N` values in field order.
    fn values<const N: usize>(&self) -> [String; N] {
        std::array::from_fn(|idx| {
            self.fields
                .get(idx)
                .map(|field| field.value.clone())
                .unwrap_or_default()
        })
    }

    pub(crate) fn to_credentials(&self) -> Credentials {
        let [username, password] = self.values();
        Credentials { username, password }
    }

    pub(crate) fn to_new_book(&self) -> NewBook {
        let [id, title, author] = self.values();
        NewBook { id, title, author }
    }

    pub(crate) fn to_new_borrower(&self) -> NewBorrower {
        let [id, last_name, first_name, middle_name, course, contact_number] = self.values();
        NewBorrower {
            id,
            last_name,
            first_name,
            middle_name,
            course,
            contact_number,
        }
    }

    pub(crate) fn to_borrow_request(&self) -> BorrowRequest {
        let [book_id, borrower_id] = self.values();
        BorrowRequest {
            book_id,
            borrower_id,
        }
    }

    pub(crate) fn to_return_request(&self) -> ReturnRequest {
        let [book_id] = self.values();
        ReturnRequest { book_id }
    }
}
