use crate::util::unicode::pop_grapheme;

/// One labelled single-line text input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

/// Text inputs with one focused field and the last validation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    pub fn new(labels: &[&'static str]) -> Self {
        Form {
            fields: labels
                .iter()
                .map(|label| Field {
                    label: *label,
                    value: String::new(),
                })
                .collect(),
            focus: 0,
            error: None,
        }
    }

    /// Pre-fill a field
    pub fn with_value(mut self, index: usize, value: impl Into<String>) -> Self {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
        self
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            pop_grapheme(&mut field.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps() {
        let mut form = Form::new(&["A", "B", "C"]);
        form.focus_prev();
        assert_eq!(form.focus, 2);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = Form::new(&["Name", "Description"]).with_value(1, "x");
        form.insert_char('h');
        form.insert_char('i');
        form.focus_next();
        form.backspace();
        assert_eq!(form.value(0), "hi");
        assert_eq!(form.value(1), "");
        assert_eq!(form.value(7), "");
    }
}
