//! Search and sort allow-lists and the SELECT they produce.
//!
//! Column names only ever reach the SQL text through these enums; the search
//! term is always bound as a parameter.

use crate::core::db::STUDENTS_TABLE;

/// Projection shared by search and lookup by id. The birth date leaves
/// storage already formatted for display.
pub const SELECT_COLUMNS: &str = "id, nome, sobrenome, telefone, email, cpf, \
     strftime('%d/%m/%Y', data_nascimento) AS data_nascimento_formatada, \
     cidade, uf, curso";

/// Fields a user can filter on, keyed by the name shown in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Nome,
    Sobrenome,
    Cpf,
    Email,
    Curso,
    Cidade,
    Uf,
}

impl SearchField {
    pub const ALL: [SearchField; 7] = [
        SearchField::Nome,
        SearchField::Sobrenome,
        SearchField::Cpf,
        SearchField::Email,
        SearchField::Curso,
        SearchField::Cidade,
        SearchField::Uf,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchField::Nome => "Nome",
            SearchField::Sobrenome => "Sobrenome",
            SearchField::Cpf => "CPF",
            SearchField::Email => "Email",
            SearchField::Curso => "Curso",
            SearchField::Cidade => "Cidade",
            SearchField::Uf => "UF",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Nome => "nome",
            SearchField::Sobrenome => "sobrenome",
            SearchField::Cpf => "cpf",
            SearchField::Email => "email",
            SearchField::Curso => "curso",
            SearchField::Cidade => "cidade",
            SearchField::Uf => "uf",
        }
    }

    /// Exact match on the display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        SearchField::ALL
            .iter()
            .copied()
            .find(|field| field.display_name() == name)
    }
}

/// Columns results can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Nome,
    Sobrenome,
    Telefone,
    Email,
    Cpf,
    DataNascimento,
    Cidade,
    Uf,
    Curso,
}

impl SortColumn {
    pub const ALL: [SortColumn; 10] = [
        SortColumn::Id,
        SortColumn::Nome,
        SortColumn::Sobrenome,
        SortColumn::Telefone,
        SortColumn::Email,
        SortColumn::Cpf,
        SortColumn::DataNascimento,
        SortColumn::Cidade,
        SortColumn::Uf,
        SortColumn::Curso,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Nome => "nome",
            SortColumn::Sobrenome => "sobrenome",
            SortColumn::Telefone => "telefone",
            SortColumn::Email => "email",
            SortColumn::Cpf => "cpf",
            SortColumn::DataNascimento => "data_nascimento",
            SortColumn::Cidade => "cidade",
            SortColumn::Uf => "uf",
            SortColumn::Curso => "curso",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        SortColumn::ALL.iter().copied().find(|col| col.column() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case means descending; anything else is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A filter and ordering request. The default lists every student by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub filter: Option<(SearchField, String)>,
    pub sort: Option<(SortColumn, SortDirection)>,
}

impl SearchQuery {
    pub fn all() -> Self {
        SearchQuery::default()
    }

    /// Builds a query from untyped caller input. Unknown field or column
    /// names are ignored rather than rejected.
    pub fn parse(
        field: Option<&str>,
        term: Option<&str>,
        sort_column: Option<&str>,
        sort_direction: Option<&str>,
    ) -> Self {
        let filter = match (field.and_then(SearchField::from_display_name), term) {
            (Some(field), Some(term)) if !term.trim().is_empty() => {
                Some((field, term.trim().to_string()))
            }
            _ => None,
        };
        let sort = sort_column.and_then(SortColumn::from_column).map(|col| {
            (
                col,
                sort_direction.map(SortDirection::parse).unwrap_or_default(),
            )
        });
        SearchQuery { filter, sort }
    }

    pub fn filter(mut self, field: SearchField, term: impl Into<String>) -> Self {
        self.filter = Some((field, term.into()));
        self
    }

    pub fn sort_by(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sort = Some((column, direction));
        self
    }

    /// Renders the SELECT statement and its bound parameters.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {} FROM {}", SELECT_COLUMNS, STUDENTS_TABLE);
        let mut params = Vec::new();

        if let Some((field, term)) = &self.filter {
            let term = term.trim();
            if !term.is_empty() {
                sql.push_str(&format!(" WHERE {} LIKE ?1", field.column()));
                params.push(format!("%{}%", term));
            }
        }

        let (column, direction) = self
            .sort
            .unwrap_or((SortColumn::Nome, SortDirection::Asc));
        sql.push_str(&format!(" ORDER BY {} {}", column.column(), direction.as_sql()));
        if column != SortColumn::Id {
            sql.push_str(", id ASC");
        }

        (sql, params)
    }
}
