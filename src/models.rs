use crate::constants::*;
use serde::{Serialize, Serializer};

/// Query family sent to the distribution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Everything after the last sequence number the caller has processed
    DistNsu,
    /// A single document by its 44-character access key
    ConsChNfe,
    /// A single document by its sequence number
    ConsNsu,
}

impl QueryKind {
    /// Returns the `grupo` element name.
    pub fn grupo(&self) -> &'static str {
        match self {
            Self::DistNsu => GRUPO_DIST_NSU,
            Self::ConsChNfe => GRUPO_CONS_CH_NFE,
            Self::ConsNsu => GRUPO_CONS_NSU,
        }
    }

    /// Returns the `consulta` element name nested under [`grupo`](Self::grupo).
    pub fn consulta(&self) -> &'static str {
        match self {
            Self::DistNsu => CONSULTA_ULT_NSU,
            Self::ConsChNfe => CONSULTA_CH_NFE,
            Self::ConsNsu => CONSULTA_NSU,
        }
    }

    /// Returns a human-readable name for logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DistNsu => "Distribution by last NSU",
            Self::ConsChNfe => "Lookup by access key",
            Self::ConsNsu => "Lookup by NSU",
        }
    }
}

/// Query payload (`pesquisa`).
///
/// Built only through [`Pesquisa::new`], so `grupo` and `consulta` always come from
/// the same [`QueryKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pesquisa {
    kind: QueryKind,
    valor: String,
}

impl Pesquisa {
    pub fn new(kind: QueryKind, valor: impl Into<String>) -> Self {
        Self {
            kind,
            valor: valor.into(),
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn grupo(&self) -> &'static str {
        self.kind.grupo()
    }

    pub fn consulta(&self) -> &'static str {
        self.kind.consulta()
    }

    pub fn valor(&self) -> &str {
        &self.valor
    }
}

impl Serialize for Pesquisa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Pesquisa", 3)?;
        state.serialize_field("grupo", self.grupo())?;
        state.serialize_field("consulta", self.consulta())?;
        state.serialize_field("valor", &self.valor)?;
        state.end()
    }
}

/// Sequence number argument.
///
/// Numeric zero is a distinct, valid value; an empty string or a missing value is
/// not. The string `"0"` is [`Present`](NsuInput::Present), not [`Zero`](NsuInput::Zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NsuInput {
    Present(String),
    Zero,
    Absent,
}

impl NsuInput {
    /// Returns the value only when it is present and non-empty.
    pub fn non_empty(&self) -> Option<&str> {
        match self {
            Self::Present(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

impl From<u64> for NsuInput {
    fn from(value: u64) -> Self {
        if value == 0 {
            Self::Zero
        } else {
            Self::Present(value.to_string())
        }
    }
}

impl From<&str> for NsuInput {
    fn from(value: &str) -> Self {
        Self::Present(value.to_string())
    }
}

impl From<String> for NsuInput {
    fn from(value: String) -> Self {
        Self::Present(value)
    }
}

impl<T: Into<NsuInput>> From<Option<T>> for NsuInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_kind_names_pair_up() {
        assert_eq!(QueryKind::DistNsu.grupo(), "distNSU");
        assert_eq!(QueryKind::DistNsu.consulta(), "ultNSU");
        assert_eq!(QueryKind::ConsChNfe.grupo(), "consChNFe");
        assert_eq!(QueryKind::ConsChNfe.consulta(), "chNFe");
        assert_eq!(QueryKind::ConsNsu.grupo(), "consNSU");
        assert_eq!(QueryKind::ConsNsu.consulta(), "NSU");
    }

    #[test]
    fn test_pesquisa_exposes_kind_names() {
        let pesquisa = Pesquisa::new(QueryKind::ConsNsu, "000000000000042");
        assert_eq!(pesquisa.grupo(), "consNSU");
        assert_eq!(pesquisa.consulta(), "NSU");
        assert_eq!(pesquisa.valor(), "000000000000042");
    }

    #[test]
    fn test_pesquisa_serializes_wire_names() {
        let pesquisa = Pesquisa::new(QueryKind::DistNsu, "000000000000000");
        let rendered = toml::to_string(&pesquisa).unwrap();
        assert!(rendered.contains(r#"grupo = "distNSU""#));
        assert!(rendered.contains(r#"consulta = "ultNSU""#));
        assert!(rendered.contains(r#"valor = "000000000000000""#));
    }

    #[test]
    fn test_nsu_input_numeric_zero_is_zero() {
        assert_eq!(NsuInput::from(0u64), NsuInput::Zero);
        assert_eq!(NsuInput::from(42u64), NsuInput::Present("42".to_string()));
    }

    #[test]
    fn test_nsu_input_string_zero_is_present() {
        assert_eq!(NsuInput::from("0"), NsuInput::Present("0".to_string()));
    }

    #[test]
    fn test_nsu_input_none_is_absent() {
        assert_eq!(NsuInput::from(None::<&str>), NsuInput::Absent);
        assert_eq!(NsuInput::from(None::<u64>), NsuInput::Absent);
        assert_eq!(NsuInput::from(Some(0u64)), NsuInput::Zero);
    }

    #[test]
    fn test_nsu_input_non_empty() {
        assert_eq!(NsuInput::from("").non_empty(), None);
        assert_eq!(NsuInput::Zero.non_empty(), None);
        assert_eq!(NsuInput::from("7").non_empty(), Some("7"));
    }
}
