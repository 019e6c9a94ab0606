use std::fmt;

/// Cache key of the lakehouse viewer queries: `("stats",)` or `("sales", category)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LakehouseQuery {
    Stats,
    Sales { category: Option<String> },
}

impl LakehouseQuery {
    pub fn sales(category: Option<String>) -> Self {
        LakehouseQuery::Sales { category }
    }

    /// Query name, first element of the key
    pub fn name(&self) -> &'static str {
        match self {
            LakehouseQuery::Stats => "stats",
            LakehouseQuery::Sales { .. } => "sales",
        }
    }

    /// Parameters following the name
    pub fn params(&self) -> Vec<Option<&str>> {
        match self {
            LakehouseQuery::Stats => Vec::new(),
            LakehouseQuery::Sales { category } => vec![category.as_deref()],
        }
    }
}

impl fmt::Display for LakehouseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(\"{}\"", self.name())?;
        for param in self.params() {
            match param {
                Some(value) => write!(f, ", \"{}\"", value)?,
                None => write!(f, ", null")?,
            }
        }
        if self.params().is_empty() {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}
