/// Results Grid Module
///
/// Renders search results as an aligned text table for the shell. Columns
/// follow the order of the registration form.

use crate::model::StudentRow;

/// Column headers for student results, in display order
pub const STUDENT_HEADERS: [&str; 10] = [
    "ID",
    "Nome",
    "Sobrenome",
    "CPF",
    "Data Nasc.",
    "Telefone",
    "E-mail",
    "Curso",
    "Cidade",
    "UF",
];

/// Represents the entire grid structure.
#[derive(Debug, Clone, Default)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsGrid {
    /// Creates a new, empty ResultsGrid.
    pub fn new() -> Self {
        ResultsGrid::default()
    }

    /// Builds a grid of students with the standard headers.
    pub fn from_students(students: &[StudentRow]) -> Self {
        let mut grid = ResultsGrid::new();
        grid.set_headers(STUDENT_HEADERS.iter().map(|h| h.to_string()).collect());
        for student in students {
            grid.add_row(vec![
                student.id.to_string(),
                student.nome.clone(),
                student.sobrenome.clone(),
                cell(&student.cpf),
                cell(&student.data_nascimento),
                cell(&student.telefone),
                cell(&student.email),
                student.curso.clone(),
                cell(&student.cidade),
                cell(&student.uf),
            ]);
        }
        grid
    }

    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Width of each column in characters, wide enough for header and cells.
    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        (0..columns)
            .map(|i| {
                self.headers
                    .get(i)
                    .into_iter()
                    .chain(self.rows.iter().filter_map(|row| row.get(i)))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Renders the grid with padded columns, a header underline and one line
    /// per row. An empty grid renders as an empty string.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut output = String::new();

        if !self.headers.is_empty() {
            output.push_str(&render_line(&self.headers, &widths));
            let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            output.push_str(&underline.join("-+-"));
            output.push('\n');
        }
        for row in &self.rows {
            output.push_str(&render_line(row, &widths));
        }
        output
    }
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn render_line(values: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let value = values.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(value.chars().count());
            format!("{}{}", value, " ".repeat(pad))
        })
        .collect();
    let mut line = padded.join(" | ").trim_end().to_string();
    line.push('\n');
    line
}
