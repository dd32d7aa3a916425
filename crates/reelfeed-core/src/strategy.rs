use std::collections::BTreeMap;
use std::fmt;

/// Search strategies tried, in order, when looking a film up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// The title as written, restricted to the release year
    ExactWithYear,
    /// Punctuation removed, restricted to the release year
    StrippedWithYear,
    /// The title as written, any year
    ExactAnyYear,
    /// A known alternate title, restricted to the release year
    AlternateWithYear,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 4] = [
        SearchStrategy::ExactWithYear,
        SearchStrategy::StrippedWithYear,
        SearchStrategy::ExactAnyYear,
        SearchStrategy::AlternateWithYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchStrategy::ExactWithYear => "exact title with year",
            SearchStrategy::StrippedWithYear => "stripped title with year",
            SearchStrategy::ExactAnyYear => "exact title without year",
            SearchStrategy::AlternateWithYear => "alternate title with year",
        }
    }

    /// The query this strategy sends, or `None` when it does not apply.
    pub fn build_query(self, title: &str, year: &str, alternates: &AlternateTitles) -> Option<SearchQuery> {
        let year = Some(year.trim()).filter(|y| !y.is_empty()).map(str::to_string);
        let (query, year) = match self {
            SearchStrategy::ExactWithYear => (title.trim().to_string(), year),
            SearchStrategy::StrippedWithYear => (strip_punctuation(title), year),
            SearchStrategy::ExactAnyYear => (title.trim().to_string(), None),
            SearchStrategy::AlternateWithYear => (alternates.get(title)?.to_string(), year),
        };
        if query.is_empty() {
            return None;
        }
        Some(SearchQuery { query, year })
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub year: Option<String>,
}

/// Titles known under another name on the metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateTitles {
    titles: BTreeMap<String, String>,
}

impl AlternateTitles {
    pub fn builtin() -> Self {
        let titles = [("Your Name.", "Kimi no Na wa"), ("Perfect Blue", "パーフェクトブルー")]
            .into_iter()
            .map(|(title, alternate)| (title.to_string(), alternate.to_string()))
            .collect();
        Self { titles }
    }

    /// Built-in titles plus `extra`, which wins on conflicts.
    pub fn with_overrides<I>(extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut alternates = Self::builtin();
        alternates.titles.extend(extra);
        alternates
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.titles.get(title.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl Default for AlternateTitles {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Drop every character that is not a letter, digit, underscore or space.
pub fn strip_punctuation(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Queries for every applicable strategy, in order, without repeating a
/// query/year pair an earlier strategy already sends.
pub fn plan_queries(title: &str, year: &str, alternates: &AlternateTitles) -> Vec<(SearchStrategy, SearchQuery)> {
    let mut planned: Vec<(SearchStrategy, SearchQuery)> = Vec::new();
    for strategy in SearchStrategy::ALL {
        let Some(query) = strategy.build_query(title, year, alternates) else {
            continue;
        };
        if planned.iter().any(|(_, existing)| *existing == query) {
            continue;
        }
        planned.push((strategy, query));
    }
    planned
}
