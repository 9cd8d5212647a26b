use std::collections::HashMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

const DELIMITER: char = ';';

/// Errors produced while loading an [`Inventory`].
///
/// Any of these is fatal: a partially loaded inventory is never returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read banner configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A record has fewer than two fields.
    #[error("line {line}: expected `identifier;budget[;category...]`")]
    Malformed { line: usize },

    /// The budget field is not a non-negative integer.
    #[error("line {line}: show budget {value:?} is not a non-negative integer")]
    InvalidBudget { line: usize, value: String },
}

/// A servable advertisement unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    id: Arc<str>,
    budget: u64,
    categories: Vec<String>,
}

impl Banner {
    pub fn new<I, C>(id: impl Into<Arc<str>>, budget: u64, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            budget,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// The banner identifier, which is also the image URL.
    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    /// The configured show budget.
    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// Every configured banner, in load order, with a category index.
///
/// Built once and never mutated. Share it with `Arc`.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    banners: Vec<Banner>,
    identifiers: Vec<Arc<str>>,
    by_category: HashMap<String, Vec<Arc<str>>>,
}

impl Inventory {
    /// Builds an inventory from banners already in memory.
    ///
    /// Duplicate identifiers are kept as separate records. Their categories
    /// accumulate in the index and the last record's budget wins in the ledger.
    pub fn new(banners: Vec<Banner>) -> Self {
        let mut identifiers = Vec::with_capacity(banners.len());
        let mut seen = HashSet::with_capacity(banners.len());
        let mut by_category: HashMap<String, Vec<Arc<str>>> = HashMap::new();
        let mut memberships: HashSet<(&str, &str)> = HashSet::new();

        for banner in &banners {
            if seen.insert(banner.id.clone()) {
                identifiers.push(banner.id.clone());
            }
            for category in &banner.categories {
                if memberships.insert((category.as_str(), banner.id.as_ref())) {
                    by_category
                        .entry(category.clone())
                        .or_default()
                        .push(banner.id.clone());
                }
            }
        }

        Self {
            banners,
            identifiers,
            by_category,
        }
    }

    /// Loads an inventory from a `;`-delimited configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_reader(File::open(path)?)
    }

    /// Loads an inventory from any `;`-delimited source, one record per line:
    ///
    /// ```text
    /// banner-identifier;show-budget;category-1;category-2;...
    /// ```
    ///
    /// Whitespace-only lines are skipped.
    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let mut banners = Vec::new();

        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if let Some(banner) = parse_record(index + 1, &line)? {
                banners.push(banner);
            }
        }

        Ok(Self::new(banners))
    }

    /// All records, in load order.
    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Distinct banner identifiers, in load order.
    pub fn identifiers(&self) -> &[Arc<str>] {
        &self.identifiers
    }

    /// The identifiers registered under `label`. Unknown labels have none.
    pub fn category(&self, label: &str) -> &[Arc<str>] {
        self.by_category
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All known category labels, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

impl FromStr for Inventory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

fn parse_record(line_no: usize, line: &str) -> Result<Option<Banner>, ConfigError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(DELIMITER);
    let (Some(id), Some(budget)) = (fields.next(), fields.next()) else {
        return Err(ConfigError::Malformed { line: line_no });
    };

    let budget = budget
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidBudget {
            line: line_no,
            value: budget.to_string(),
        })?;

    Ok(Some(Banner::new(id, budget, fields)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_loads_records_in_order() {
        let inventory: Inventory = "a.png;1;x\nb.png;2;x;y\nc.png;3\n".parse().unwrap();

        let ids: Vec<&str> = inventory.banners().iter().map(|b| b.id().as_ref()).collect();
        assert_eq!(ids, ["a.png", "b.png", "c.png"]);
        assert_eq!(inventory.banners()[1].budget(), 2);
        assert_eq!(inventory.banners()[1].categories(), ["x", "y"]);
        assert!(inventory.banners()[2].categories().is_empty());

        let x: Vec<&str> = inventory.category("x").iter().map(AsRef::as_ref).collect();
        assert_eq!(x, ["a.png", "b.png"]);
        assert_eq!(inventory.category("y").len(), 1);
        assert!(inventory.category("nope").is_empty());
    }

    #[test]
    fn test_single_field_is_fatal() {
        let err = "a.png;1;x\nbroken\n".parse::<Inventory>().unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 2 }));
    }

    #[test]
    fn test_bad_budget_is_fatal() {
        for budget in ["many", "-1", "1.5", ""] {
            let err = format!("a.png;{budget};x").parse::<Inventory>().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidBudget { line: 1, .. }),
                "budget {budget:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_budget_whitespace_and_crlf() {
        let inventory: Inventory = "a.png; 7 ;x\r\n\r\n   \nb.png;0\r\n".parse().unwrap();

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.banners()[0].budget(), 7);
        assert_eq!(inventory.banners()[0].categories(), ["x"]);
        assert_eq!(inventory.banners()[1].budget(), 0);
    }

    #[test]
    fn test_duplicates_pass_through() {
        let inventory: Inventory = "a.png;1;x\na.png;5;y\n".parse().unwrap();

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.identifiers().len(), 1);
        assert_eq!(inventory.category("x")[0].as_ref(), "a.png");
        assert_eq!(inventory.category("y")[0].as_ref(), "a.png");
    }

    #[test]
    fn test_large_single_category() {
        let banners = 20_000;
        let source: String = (0..banners)
            .map(|n| format!("banner-{n}.png;1;big\nbanner-{n}.png;1;big\n"))
            .collect();
        let inventory: Inventory = source.parse().unwrap();

        assert_eq!(inventory.len(), 2 * banners);
        assert_eq!(inventory.identifiers().len(), banners);
        assert_eq!(inventory.category("big").len(), banners);
        assert_eq!(inventory.category("big")[banners - 1].as_ref(), "banner-19999.png");
    }

    #[test]
    fn test_missing_file() {
        let err = Inventory::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_empty_source() {
        let inventory: Inventory = "".parse().unwrap();
        assert!(inventory.is_empty());
        assert_eq!(inventory.categories().count(), 0);
    }
}
