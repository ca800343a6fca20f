//! Student record types.
//!
//! `StudentRecord` is what callers submit for create and update;
//! `StudentRow` is what search returns for display.

use crate::core::ValidationError;
use crate::dates;
use std::fmt;
use std::str::FromStr;

/// City stored when the form leaves it blank
pub const DEFAULT_CITY: &str = "Brasília";
/// State code stored when the form leaves it blank
pub const DEFAULT_UF: &str = "DF";

/// The closed set of courses a student can enroll in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Course {
    Ads,
    Gti,
    Cd,
    Ia,
    Bi,
    Si,
}

impl Course {
    pub const ALL: [Course; 6] = [
        Course::Ads,
        Course::Gti,
        Course::Cd,
        Course::Ia,
        Course::Bi,
        Course::Si,
    ];

    /// Code as stored in the `curso` column
    pub fn code(&self) -> &'static str {
        match self {
            Course::Ads => "ADS",
            Course::Gti => "GTI",
            Course::Cd => "CD",
            Course::Ia => "IA",
            Course::Bi => "BI",
            Course::Si => "SI",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Course {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Course::ALL
            .iter()
            .copied()
            .find(|course| course.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCourse {
                given: wanted.to_string(),
                expected: Course::ALL
                    .iter()
                    .map(Course::code)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// A student as submitted by the caller.
///
/// `data_nascimento` is an ISO `YYYY-MM-DD` string so that malformed input
/// reaches the validator and is reported rather than silently dropped. Blank
/// `cidade`/`uf` take the defaults on normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub nome: String,
    pub sobrenome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub data_nascimento: Option<String>,
    pub cidade: String,
    pub uf: String,
    pub curso: Course,
}

impl StudentRecord {
    pub fn new(nome: impl Into<String>, sobrenome: impl Into<String>, curso: Course) -> Self {
        StudentRecord {
            nome: nome.into(),
            sobrenome: sobrenome.into(),
            telefone: None,
            email: None,
            cpf: None,
            data_nascimento: None,
            cidade: String::new(),
            uf: String::new(),
            curso,
        }
    }

    pub fn with_phone(mut self, telefone: impl Into<String>) -> Self {
        self.telefone = Some(telefone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_cpf(mut self, cpf: impl Into<String>) -> Self {
        self.cpf = Some(cpf.into());
        self
    }

    /// Birth date in ISO `YYYY-MM-DD` form.
    pub fn with_birth_date(mut self, iso: impl Into<String>) -> Self {
        self.data_nascimento = Some(iso.into());
        self
    }

    pub fn with_city(mut self, cidade: impl Into<String>, uf: impl Into<String>) -> Self {
        self.cidade = cidade.into();
        self.uf = uf.into();
        self
    }

    /// Trims every field, turns blank optionals into `None`, zero-pads an ISO
    /// birth date, fills in the default city and state and upper-cases the
    /// state code.
    pub fn normalized(&self) -> StudentRecord {
        StudentRecord {
            nome: self.nome.trim().to_string(),
            sobrenome: self.sobrenome.trim().to_string(),
            telefone: non_blank(&self.telefone),
            email: non_blank(&self.email),
            cpf: non_blank(&self.cpf),
            data_nascimento: non_blank(&self.data_nascimento).map(|d| dates::canonical_iso(&d)),
            cidade: or_default(&self.cidade, DEFAULT_CITY),
            uf: or_default(&self.uf, DEFAULT_UF).to_uppercase(),
            curso: self.curso,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        v => v.to_string(),
    }
}

/// A stored student as returned by search, with the birth date already in
/// `DD/MM/YYYY` display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub id: i64,
    pub nome: String,
    pub sobrenome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub data_nascimento: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub curso: String,
}

impl StudentRow {
    /// Rebuilds an editable record from a displayed row.
    pub fn to_record(&self) -> Result<StudentRecord, ValidationError> {
        Ok(StudentRecord {
            nome: self.nome.clone(),
            sobrenome: self.sobrenome.clone(),
            telefone: self.telefone.clone(),
            email: self.email.clone(),
            cpf: self.cpf.clone(),
            data_nascimento: self
                .data_nascimento
                .as_deref()
                .map(|d| dates::to_storage_format(d).unwrap_or_else(|| d.to_string())),
            cidade: self.cidade.clone().unwrap_or_default(),
            uf: self.uf.clone().unwrap_or_default(),
            curso: self.curso.parse()?,
        })
    }

    /// Whether this row shows the same data as `record` once the record is
    /// normalized and its birth date formatted for display.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        let record = record.normalized();
        let birth = record
            .data_nascimento
            .as_deref()
            .and_then(dates::to_display_format);
        self.nome == record.nome
            && self.sobrenome == record.sobrenome
            && self.telefone == record.telefone
            && self.email == record.email
            && self.cpf == record.cpf
            && self.data_nascimento == birth
            && self.cidade.as_deref() == Some(record.cidade.as_str())
            && self.uf.as_deref() == Some(record.uf.as_str())
            && self.curso == record.curso.code()
    }
}
