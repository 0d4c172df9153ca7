use std::collections::HashMap;
use regex::Regex;

use super::error::ClassifierError;
use super::utils::normalize_text;

/// One row of the keyword table: a keyword and the tag it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub keyword: String,
    pub tag: String,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            tag: tag.into(),
        }
    }
}

/// One row of the department table: the department responsible for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentEntry {
    pub tag: String,
    pub department: String,
}

impl DepartmentEntry {
    pub fn new(tag: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            department: department.into(),
        }
    }
}

/// A normalized keyword with its compiled whole-word pattern.
#[derive(Debug, Clone)]
pub(crate) struct KeywordRule {
    pub keyword: String,
    pub tag: String,
    pattern: Regex,
}

impl KeywordRule {
    fn new(keyword: String, tag: String) -> Result<Self, ClassifierError> {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&keyword)))
            .map_err(|e| ClassifierError::Configuration(
                format!("Invalid keyword '{}': {}", keyword, e)
            ))?;
        Ok(Self { keyword, tag, pattern })
    }

    /// `None` unless the keyword occurs as a whole word somewhere in `text`.
    /// The returned byte offset is the keyword's first occurrence of any
    /// kind, so `pani` in `"panini ... pani"` sits at 0.
    pub fn find_in(&self, text: &str) -> Option<usize> {
        if !self.pattern.is_match(text) {
            return None;
        }
        text.find(&self.keyword)
    }
}

/// A keyword hit: the rule's position in the lexicon and where it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeywordMatch {
    pub rule_index: usize,
    pub offset: usize,
}

/// Ordered keyword rules, in source table order.
#[derive(Debug, Clone)]
pub(crate) struct Lexicon {
    rules: Vec<KeywordRule>,
}

impl Lexicon {
    pub fn from_entries(entries: &[KeywordEntry]) -> Result<Self, ClassifierError> {
        if entries.is_empty() {
            return Err(ClassifierError::Configuration("Keyword table is empty".into()));
        }

        let mut rules = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let keyword = normalize_text(&entry.keyword);
            let tag = normalize_text(&entry.tag);
            if keyword.is_empty() || tag.is_empty() {
                return Err(ClassifierError::Configuration(
                    format!("Keyword row {} has an empty Keyword or Tag", i + 1)
                ));
            }
            rules.push(KeywordRule::new(keyword, tag)?);
        }
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn rule(&self, index: usize) -> &KeywordRule {
        &self.rules[index]
    }

    /// Every rule that matches the already lower-cased `text`.
    pub fn matches(&self, text: &str) -> Vec<KeywordMatch> {
        self.rules.iter()
            .enumerate()
            .filter_map(|(rule_index, rule)| {
                rule.find_in(text).map(|offset| KeywordMatch { rule_index, offset })
            })
            .collect()
    }

    /// The leftmost match. On equal offsets the earlier rule wins.
    pub fn first_match(&self, text: &str) -> Option<&KeywordRule> {
        self.matches(text)
            .into_iter()
            .min_by_key(|m| (m.offset, m.rule_index))
            .map(|m| self.rule(m.rule_index))
    }
}

/// Tag to department lookup plus the ordered candidate label set.
#[derive(Debug, Clone)]
pub(crate) struct DepartmentMap {
    departments: HashMap<String, String>,
    categories: Vec<String>,
}

impl DepartmentMap {
    pub fn from_entries(entries: &[DepartmentEntry]) -> Result<Self, ClassifierError> {
        if entries.is_empty() {
            return Err(ClassifierError::Configuration("Department table is empty".into()));
        }

        let mut departments = HashMap::with_capacity(entries.len());
        let mut categories = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let tag = normalize_text(&entry.tag);
            let department = entry.department.trim().to_string();
            if tag.is_empty() || department.is_empty() {
                return Err(ClassifierError::Configuration(
                    format!("Department row {} has an empty Tag or Department", i + 1)
                ));
            }
            if departments.insert(tag.clone(), department).is_none() {
                categories.push(tag);
            }
        }
        Ok(Self { departments, categories })
    }

    pub fn department_of(&self, tag: &str) -> Option<&str> {
        self.departments.get(tag).map(String::as_str)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}
