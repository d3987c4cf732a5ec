//! Generated function stubs

/// Statement closing a stub body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalStatement {
    Pass,
    ReturnNone,
}

impl FinalStatement {
    pub fn as_str(self) -> &'static str {
        match self {
            FinalStatement::Pass => "pass",
            FinalStatement::ReturnNone => "return None",
        }
    }
}

/// A `def name(...):` stub built from a UML operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    /// Positional parameters, receiver first
    pub parameters: Vec<String>,
    /// One docstring per owned comment, already split into lines
    pub docstrings: Vec<Vec<String>>,
    pub final_statement: FinalStatement,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            docstrings: Vec::new(),
            final_statement: FinalStatement::Pass,
        }
    }

    pub fn add_parameter(&mut self, parameter: impl Into<String>) {
        self.parameters.push(parameter.into());
    }

    pub fn add_docstring(&mut self, text: &str) {
        self.docstrings.push(split_lines(text));
    }

    /// Signature, docstrings and final statement; body lines indented one level
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("def {}({}):", self.name, self.parameters.join(", "))];
        for docstring in &self.docstrings {
            lines.push("    '''".to_string());
            lines.extend(docstring.iter().map(|line| format!("    {}", line)));
            lines.push("    '''".to_string());
        }
        lines.push(format!("    {}", self.final_statement.as_str()));
        lines
    }
}

/// Split on `\n`, `\r\n`, `\n\r` and `\r`
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                lines.push(std::mem::take(&mut current));
            }
            '\n' => {
                chars.next_if_eq(&'\r');
                lines.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    lines.push(current);
    lines
}
